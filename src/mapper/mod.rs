//! Coordinate mapping and duplicate merging for UTR sites.

pub mod aggregate;
pub mod position;

pub use aggregate::{OutputGroup, RecordAggregator};
pub use position::{locate, map_record, Span};
