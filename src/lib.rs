//! utrmap - UTR site to genomic interval mapping library.
//!
//! This library converts sites given as offsets into a transcript's 5' or 3'
//! untranslated region into BED-like genomic intervals, splitting sites that
//! cross exon boundaries and merging duplicate sites.
//!
//! # Features
//!
//! - Parse six-column exon reference tables and site tables (with gzip support)
//! - Strand-aware offset mapping across spliced exons
//! - Merge sites sharing an offset and sequence, keeping the best score
//! - Run the 5' and 3' passes sequentially or concurrently
//!
//! # Example
//!
//! ```ignore
//! use utrmap::config::Config;
//! use utrmap::pipeline::{run, RunPaths};
//! use std::io::stdout;
//!
//! let paths = RunPaths {
//!     utr5: "utr5.tsv".into(),
//!     utr3: "utr3.tsv".into(),
//!     input: "sites.tsv".into(),
//! };
//! run(&mut stdout().lock(), &paths, &Config::default())?;
//! ```

pub mod config;
pub mod error;
pub mod mapper;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::MapError;
pub use parser::{TranscriptAnnotation, TranscriptExons};
pub use types::{ExonSegment, InputRecord, MappedRecord, Side, Strand, TranscriptId, Traversal};
