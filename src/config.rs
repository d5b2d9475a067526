//! Configuration and defaults for utrmap.
//!
//! This module contains the options that control how the two UTR passes are
//! run and how unknown transcripts are treated.

/// Configuration for a mapping run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Run the 5' and 3' passes concurrently. Output order is unaffected.
    pub parallel: bool,
    /// Treat input records whose transcript is absent from the reference as
    /// fatal instead of dropping them with a warning.
    pub strict_missing: bool,
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
