//! Core data structures for utrmap.
//!
//! This module contains the fundamental types shared by the reference index,
//! the position mapper, and the record aggregator.

use indexmap::IndexSet;
use std::fmt;
use std::str::FromStr;

/// Strand orientation for genomic features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Positive,
    Negative,
}

/// Error type for parsing strand from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrandError;

impl fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid strand: expected '+' or '-'")
    }
}

impl std::error::Error for ParseStrandError {}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Positive),
            "-" => Ok(Strand::Negative),
            _ => Err(ParseStrandError),
        }
    }
}

impl Strand {
    /// Convert strand to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Positive => "+",
            Strand::Negative => "-",
        }
    }

    /// Direction in which the exon list is walked for this strand.
    pub fn traversal(&self) -> Traversal {
        match self {
            Strand::Positive => Traversal::Forward,
            Strand::Negative => Traversal::Reverse,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order in which a transcript's exons are visited when mapping an offset.
///
/// `Forward` starts at the first exon and moves up the genome; `Reverse`
/// starts at the last exon and moves down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Forward,
    Reverse,
}

/// Which untranslated region a pass works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Utr5,
    Utr3,
}

impl Side {
    /// Suffix appended to the transcript key to build the output label.
    pub fn suffix(&self) -> &'static str {
        match self {
            Side::Utr5 => "_5U",
            Side::Utr3 => "_3U",
        }
    }

    /// The offset column this side maps.
    pub fn offset(&self, record: &InputRecord) -> i64 {
        match self {
            Side::Utr5 => record.offset5,
            Side::Utr3 => record.offset3,
        }
    }

    /// The sequence placed on the genome, and used as part of the merge key.
    pub fn primary<'a>(&self, record: &'a InputRecord) -> &'a str {
        match self {
            Side::Utr5 => &record.seq5,
            Side::Utr3 => &record.seq3,
        }
    }

    /// The sequence that is unioned when records merge.
    pub fn partner<'a>(&self, record: &'a InputRecord) -> &'a str {
        match self {
            Side::Utr5 => &record.seq3,
            Side::Utr3 => &record.seq5,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Utr5 => write!(f, "5'UTR"),
            Side::Utr3 => write!(f, "3'UTR"),
        }
    }
}

/// A RefSeq-style transcript identifier.
///
/// `key` is the prefix plus the leading digit run (`NM_12345`), which is what
/// the index is keyed on. `full` keeps the identifier as it appeared in the
/// file, version suffix included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranscriptId {
    pub key: String,
    pub full: String,
}

impl TranscriptId {
    /// Parse an identifier of the form `NM_<digits>` or `NR_<digits>`.
    ///
    /// Anything after the digit run is ignored for keying. Returns `None`
    /// when the prefix is wrong or no digit follows it.
    pub fn parse(s: &str) -> Option<Self> {
        let prefix = s.get(..3)?;
        if prefix != "NM_" && prefix != "NR_" {
            return None;
        }
        let digits = s[3..].bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        Some(TranscriptId {
            key: s[..3 + digits].to_string(),
            full: s.to_string(),
        })
    }
}

impl fmt::Display for TranscriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// One exon of a transcript, in half-open genomic coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonSegment {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
}

impl ExonSegment {
    pub fn new(chrom: String, start: i64, end: i64, strand: Strand) -> Self {
        ExonSegment {
            chrom,
            start,
            end,
            strand,
        }
    }

    /// Number of bases in the exon.
    pub fn length(&self) -> i64 {
        self.end - self.start
    }
}

/// A single site from the input table.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    pub transcript: TranscriptId,
    pub offset5: i64,
    pub offset3: i64,
    pub seq5: String,
    /// Already reversed.
    pub seq3: String,
    pub extra: Vec<String>,
    /// 1-based line number in the input file.
    pub line: usize,
}

/// One genomic sub-interval of a mapped site.
///
/// A site that crosses exon boundaries produces one `MappedRecord` per exon.
/// The sequence columns are ordered sets so that merged partner sequences
/// keep first-seen order without duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub label: String,
    pub strand: Strand,
    pub seq5: IndexSet<String>,
    pub seq3: IndexSet<String>,
    pub extra: Vec<String>,
}

impl MappedRecord {
    /// The set merged into for `side`, i.e. the opposite sequence column.
    pub fn partner_set_mut(&mut self, side: Side) -> &mut IndexSet<String> {
        match side {
            Side::Utr5 => &mut self.seq3,
            Side::Utr3 => &mut self.seq5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_from_str() {
        assert_eq!("+".parse::<Strand>(), Ok(Strand::Positive));
        assert_eq!("-".parse::<Strand>(), Ok(Strand::Negative));
        assert!(".".parse::<Strand>().is_err());
    }

    #[test]
    fn test_strand_traversal() {
        assert_eq!(Strand::Positive.traversal(), Traversal::Forward);
        assert_eq!(Strand::Negative.traversal(), Traversal::Reverse);
    }

    #[test]
    fn test_transcript_id_with_version() {
        let id = TranscriptId::parse("NM_001.1").unwrap();
        assert_eq!(id.key, "NM_001");
        assert_eq!(id.full, "NM_001.1");

        let id = TranscriptId::parse("NR_46018").unwrap();
        assert_eq!(id.key, "NR_46018");
    }

    #[test]
    fn test_transcript_id_rejects_bad_grammar() {
        assert!(TranscriptId::parse("XM_12345").is_none());
        assert!(TranscriptId::parse("NM_").is_none());
        assert!(TranscriptId::parse("NM_abc").is_none());
        assert!(TranscriptId::parse("NM").is_none());
        assert!(TranscriptId::parse("").is_none());
    }

    #[test]
    fn test_exon_length_is_half_open() {
        let exon = ExonSegment::new("chr1".to_string(), 100, 110, Strand::Positive);
        assert_eq!(exon.length(), 10);
    }

    #[test]
    fn test_side_accessors() {
        let record = InputRecord {
            transcript: TranscriptId::parse("NM_1").unwrap(),
            offset5: 3,
            offset3: 7,
            seq5: "AAAA".to_string(),
            seq3: "CCGG".to_string(),
            extra: vec![],
            line: 1,
        };
        assert_eq!(Side::Utr5.offset(&record), 3);
        assert_eq!(Side::Utr3.offset(&record), 7);
        assert_eq!(Side::Utr5.primary(&record), "AAAA");
        assert_eq!(Side::Utr5.partner(&record), "CCGG");
        assert_eq!(Side::Utr3.primary(&record), "CCGG");
        assert_eq!(Side::Utr3.partner(&record), "AAAA");
        assert_eq!(Side::Utr5.suffix(), "_5U");
        assert_eq!(Side::Utr3.suffix(), "_3U");
    }
}
