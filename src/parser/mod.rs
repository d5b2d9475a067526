//! Parsers for the reference exon tables and the site table.

pub mod input;
pub mod reference;
pub mod util;

pub use input::{parse_input, sort_for_side};
pub use reference::{parse_reference, TranscriptAnnotation, TranscriptExons};
