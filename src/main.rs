//! CLI entry point for utrmap.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use utrmap::config::Config;
use utrmap::pipeline::{run, RunPaths};

/// UTR site to genomic interval mapper.
///
/// Maps sites given as offsets into 5' and 3' UTRs onto the genome, writing
/// BED-like intervals: 5' records first, then 3' records.
#[derive(Parser, Debug)]
#[command(name = "utrmap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 5' UTR exon reference file (required)
    #[arg(short = '5', long = "utr5")]
    utr5: PathBuf,

    /// 3' UTR exon reference file (required)
    #[arg(short = '3', long = "utr3")]
    utr3: PathBuf,

    /// Site table (required)
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Run the 5' and 3' passes concurrently
    #[arg(long = "parallel")]
    parallel: bool,

    /// Fail on sites whose transcript is missing from the reference
    #[arg(long = "strict")]
    strict: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    // Validate inputs
    for (what, path) in [
        ("5' reference", &args.utr5),
        ("3' reference", &args.utr3),
        ("Input", &args.input),
    ] {
        if !path.exists() {
            bail!("{} file not found: {}", what, path.display());
        }
    }

    let config = Config {
        parallel: args.parallel,
        strict_missing: args.strict,
    };
    let paths = RunPaths {
        utr5: args.utr5,
        utr3: args.utr3,
        input: args.input,
    };

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            info!("Writing output to: {}", path.display());
            let file = File::create(path).context("Failed to create output file")?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    run(&mut writer, &paths, &config)?;

    info!("Done!");
    Ok(())
}
