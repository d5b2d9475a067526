//! Error types for utrmap.
//!
//! Row-level problems carry the 1-based line number of the offending row so
//! the message printed by the binary points straight at the input.

use thiserror::Error;

/// Errors raised while indexing, mapping, or merging records.
#[derive(Debug, Error)]
pub enum MapError {
    /// A reference or input row does not have the expected shape.
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    /// A field could not be interpreted (transcript ID, offset, score).
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The offset and sequence length run past the end of the transcript.
    #[error(
        "{transcript}: offset {offset} with {length} bases exceeds annotated length {available}"
    )]
    OutOfRange {
        transcript: String,
        offset: i64,
        length: usize,
        available: i64,
    },

    /// Offsets are 1-based; anything below 1 lies before the transcript.
    #[error("line {line}: {transcript}: offset {offset} is before the first base (offsets start at 1)")]
    OffsetBeforeStart {
        line: usize,
        transcript: String,
        offset: i64,
    },

    /// Two groups sharing a merge key split into different exon counts.
    #[error(
        "cannot merge records for offset {offset}: {existing} buffered intervals vs {incoming} new"
    )]
    MergeMismatch {
        offset: i64,
        existing: usize,
        incoming: usize,
    },

    /// Input names a transcript the reference index does not contain.
    #[error("line {line}: transcript {transcript} not found in reference")]
    MissingTranscript { line: usize, transcript: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MapError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        MapError::Format {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        MapError::Parse {
            line,
            message: message.into(),
        }
    }
}
