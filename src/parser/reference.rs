//! Reference annotation parser.
//!
//! Reads a six-column exon table (chrom, start, end, transcript ID, unused,
//! strand) into an immutable per-transcript index of exon segments. One index
//! is built per UTR side.

use ahash::AHashMap;
use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::MapError;
use crate::parser::util::{open_reader, strip_terminator};
use crate::types::{ExonSegment, Strand, TranscriptId};

/// Number of tab-separated fields in a reference row.
pub const REFERENCE_FIELDS: usize = 6;

/// All exons of one transcript, in file order.
#[derive(Debug, Clone)]
pub struct TranscriptExons {
    /// Identifier as first seen in the file.
    pub id: TranscriptId,
    pub strand: Strand,
    pub exons: Box<[ExonSegment]>,
}

impl TranscriptExons {
    /// Total number of annotated bases.
    pub fn length(&self) -> i64 {
        self.exons.iter().map(ExonSegment::length).sum()
    }
}

/// Immutable transcript-key to exon-list index.
#[derive(Debug, Clone, Default)]
pub struct TranscriptAnnotation {
    transcripts: AHashMap<String, TranscriptExons>,
}

impl TranscriptAnnotation {
    /// Look up a transcript by its normalized key (`NM_12345`).
    pub fn get(&self, key: &str) -> Option<&TranscriptExons> {
        self.transcripts.get(key)
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

/// What to do with a single reference row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The row describes an exon of a transcript.
    Exon(TranscriptId, ExonSegment),
    /// The row is well formed but not indexed (blank, or an ID outside the
    /// `NM_`/`NR_` grammar).
    Skip(String),
}

/// Build the index from a reference file.
///
/// Supports both plain text and gzip-compressed files.
pub fn parse_reference(path: &Path) -> Result<TranscriptAnnotation> {
    info!("Parsing reference file: {}", path.display());
    let reader = open_reader(path, "reference")?;
    let annotation = parse_reference_reader(reader)
        .with_context(|| format!("Invalid reference file: {}", path.display()))?;
    info!(transcripts = annotation.len(), "Indexed {}", path.display());
    Ok(annotation)
}

/// Build the index from any line source.
///
/// Rows whose transcript ID does not match the grammar, and rows placing an
/// already indexed transcript on the other strand, are skipped; a row with
/// the wrong number of fields aborts the whole build.
pub fn parse_reference_reader<R: BufRead>(reader: R) -> Result<TranscriptAnnotation, MapError> {
    let mut building: AHashMap<String, (TranscriptId, Strand, Vec<ExonSegment>)> =
        AHashMap::new();
    let mut skipped = 0usize;

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line_no = idx + 1;

        let (id, exon) = match classify_row(&line, line_no)? {
            RowOutcome::Exon(id, exon) => (id, exon),
            RowOutcome::Skip(reason) => {
                debug!(line = line_no, "skipping reference row: {}", reason);
                skipped += 1;
                continue;
            }
        };

        let entry = building
            .entry(id.key.clone())
            .or_insert_with(|| (id, exon.strand, Vec::new()));
        if entry.1 != exon.strand {
            // The transcript keeps the strand of its first row.
            warn!(
                line = line_no,
                "skipping reference row: {} already indexed on {} strand", entry.0.key, entry.1
            );
            skipped += 1;
            continue;
        }
        entry.2.push(exon);
    }

    if skipped > 0 {
        debug!(skipped, "reference rows not indexed");
    }

    let transcripts = building
        .into_iter()
        .map(|(key, (id, strand, exons))| {
            (
                key,
                TranscriptExons {
                    id,
                    strand,
                    exons: exons.into_boxed_slice(),
                },
            )
        })
        .collect();

    Ok(TranscriptAnnotation { transcripts })
}

/// Decide whether a row is an exon to index, a row to skip, or corrupt.
pub fn classify_row(line: &str, line_no: usize) -> Result<RowOutcome, MapError> {
    if strip_terminator(line).is_empty() {
        return Ok(RowOutcome::Skip("blank line".to_string()));
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != REFERENCE_FIELDS {
        return Err(MapError::format(
            line_no,
            format!(
                "expected {} fields, found {}",
                REFERENCE_FIELDS,
                fields.len()
            ),
        ));
    }

    let id = match TranscriptId::parse(fields[3]) {
        Some(id) => id,
        None => return Ok(RowOutcome::Skip(format!("unrecognized ID {}", fields[3]))),
    };

    let start: i64 = fields[1]
        .parse()
        .map_err(|_| MapError::format(line_no, format!("invalid start: {}", fields[1])))?;
    let end: i64 = fields[2]
        .parse()
        .map_err(|_| MapError::format(line_no, format!("invalid end: {}", fields[2])))?;
    let strand_field = strip_terminator(fields[5]);
    let strand: Strand = strand_field
        .parse()
        .map_err(|_| MapError::format(line_no, format!("invalid strand: {}", strand_field)))?;

    Ok(RowOutcome::Exon(
        id,
        ExonSegment::new(fields[0].to_string(), start, end, strand),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn build(content: &str) -> Result<TranscriptAnnotation, MapError> {
        parse_reference_reader(BufReader::new(content.as_bytes()))
    }

    #[test]
    fn test_parse_reference_basic() {
        let content = "chr1\t100\t110\tNM_001.1\t0\t+\n\
                       chr1\t200\t250\tNM_001.1\t0\t+\n\
                       chr2\t500\t600\tNR_77\t0\t-\n";
        let annotation = build(content).unwrap();
        assert_eq!(annotation.len(), 2);

        let nm = annotation.get("NM_001").unwrap();
        assert_eq!(nm.id.full, "NM_001.1");
        assert_eq!(nm.strand, Strand::Positive);
        assert_eq!(nm.exons.len(), 2);
        assert_eq!(nm.exons[0].start, 100);
        assert_eq!(nm.exons[1].start, 200);
        assert_eq!(nm.length(), 60);

        let nr = annotation.get("NR_77").unwrap();
        assert_eq!(nr.strand, Strand::Negative);
        assert_eq!(nr.exons[0].chrom, "chr2");
    }

    #[test]
    fn test_keeps_file_order() {
        let content = "chr1\t300\t310\tNM_5\t0\t+\nchr1\t100\t110\tNM_5\t0\t+\n";
        let annotation = build(content).unwrap();
        let exons = &annotation.get("NM_5").unwrap().exons;
        assert_eq!(exons[0].start, 300);
        assert_eq!(exons[1].start, 100);
    }

    #[test]
    fn test_skips_unrecognized_ids() {
        let content = "chr1\t100\t110\tXM_001\t0\t+\n\
                       chr1\t100\t110\tNM_\t0\t+\n\
                       chr1\t100\t110\tNM_9\t0\t+\n";
        let annotation = build(content).unwrap();
        assert_eq!(annotation.len(), 1);
        assert!(annotation.get("NM_9").is_some());
    }

    #[test]
    fn test_wrong_field_count_is_fatal() {
        let content = "chr1\t100\t110\tNM_001\t0\t+\nchr1\t100\t110\tNM_002\t+\n";
        let err = build(content).unwrap_err();
        match err {
            MapError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_field_count_checked_before_id() {
        // A short row is corrupt even if its ID would have been skipped.
        let content = "chr1\t100\tXM_1\n";
        assert!(matches!(build(content), Err(MapError::Format { .. })));
    }

    #[test]
    fn test_strand_with_carriage_return() {
        let content = "chr1\t100\t110\tNM_3\t0\t-\r\n";
        let annotation = build(content).unwrap();
        assert_eq!(annotation.get("NM_3").unwrap().strand, Strand::Negative);
    }

    #[test]
    fn test_opposite_strand_row_skipped() {
        let content = "chr1\t100\t110\tNM_5\t0\t+\n\
                       chr1\t100\t110\tNM_9\t0\t+\n\
                       chrX\t500\t510\tNM_5.2\t0\t-\n\
                       chr1\t200\t220\tNM_5\t0\t+\n";
        let annotation = build(content).unwrap();
        assert_eq!(annotation.len(), 2);
        assert!(annotation.get("NM_9").is_some());

        let nm5 = annotation.get("NM_5").unwrap();
        assert_eq!(nm5.strand, Strand::Positive);
        assert_eq!(nm5.exons.len(), 2);
        assert!(nm5.exons.iter().all(|e| e.chrom == "chr1"));
        assert_eq!(nm5.length(), 30);
    }

    #[test]
    fn test_classify_blank_line() {
        assert_eq!(
            classify_row("", 1).unwrap(),
            RowOutcome::Skip("blank line".to_string())
        );
    }

    #[test]
    fn test_bad_coordinate() {
        let err = classify_row("chr1\tabc\t110\tNM_3\t0\t+", 4).unwrap_err();
        assert!(err.to_string().contains("invalid start"));
    }
}
