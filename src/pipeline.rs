//! The two UTR passes and their fixed-order concatenation.
//!
//! A pass sorts the sites by its offset column, maps each one against its own
//! reference index, merges duplicates, and writes the groups in arrival order.
//! The 5' pass always precedes the 3' pass in the output, whether or not the
//! passes ran concurrently.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::MapError;
use crate::mapper::{map_record, RecordAggregator};
use crate::output::write_group;
use crate::parser::{parse_input, parse_reference, sort_for_side, TranscriptAnnotation};
use crate::types::{InputRecord, Side};

/// Counters reported at the end of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub records: usize,
    pub mapped: usize,
    pub dropped: usize,
    pub groups: usize,
    pub lines: usize,
}

/// File locations for a full run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub utr5: PathBuf,
    pub utr3: PathBuf,
    pub input: PathBuf,
}

/// Run one UTR pass over `records`, writing to `writer`.
pub fn run_pass<W: Write>(
    writer: &mut W,
    records: &[InputRecord],
    annotation: &TranscriptAnnotation,
    side: Side,
    config: &Config,
) -> Result<PassSummary> {
    let mut summary = PassSummary {
        records: records.len(),
        ..PassSummary::default()
    };
    let mut aggregator = RecordAggregator::new(side);

    for record in sort_for_side(records, side) {
        let mapped = match map_record(record, annotation, side)? {
            Some(mapped) => mapped,
            None if config.strict_missing => {
                return Err(MapError::MissingTranscript {
                    line: record.line,
                    transcript: record.transcript.full.clone(),
                }
                .into());
            }
            None => {
                warn!(
                    line = record.line,
                    "{} not in {} reference, dropping", record.transcript.full, side
                );
                summary.dropped += 1;
                continue;
            }
        };
        summary.mapped += 1;

        if let Some(group) = aggregator.push(record, mapped)? {
            summary.lines += write_group(writer, &group)?;
            summary.groups += 1;
        }
    }

    if let Some(group) = aggregator.finish() {
        summary.lines += write_group(writer, &group)?;
        summary.groups += 1;
    }

    info!(
        mapped = summary.mapped,
        dropped = summary.dropped,
        groups = summary.groups,
        lines = summary.lines,
        "{} pass complete",
        side
    );
    Ok(summary)
}

/// Build the index for `side` and render its whole pass into a buffer.
fn render_side(
    reference: &Path,
    records: &[InputRecord],
    side: Side,
    config: &Config,
) -> Result<Vec<u8>> {
    let annotation = parse_reference(reference)?;
    let mut buffer = Vec::new();
    run_pass(&mut buffer, records, &annotation, side, config)
        .with_context(|| format!("{} pass failed", side))?;
    Ok(buffer)
}

/// Run both passes and write 5' output followed by 3' output.
pub fn run<W: Write>(writer: &mut W, paths: &RunPaths, config: &Config) -> Result<()> {
    let records = parse_input(&paths.input)?;

    let (utr5, utr3) = if config.parallel {
        info!("Running 5' and 3' passes concurrently");
        rayon::join(
            || render_side(&paths.utr5, &records, Side::Utr5, config),
            || render_side(&paths.utr3, &records, Side::Utr3, config),
        )
    } else {
        let utr5 = render_side(&paths.utr5, &records, Side::Utr5, config);
        // No point building the second index once the first pass has failed.
        let utr3 = if utr5.is_ok() {
            render_side(&paths.utr3, &records, Side::Utr3, config)
        } else {
            Ok(Vec::new())
        };
        (utr5, utr3)
    };

    writer.write_all(&utr5?)?;
    writer.write_all(&utr3?)?;
    writer.flush()?;
    Ok(())
}
