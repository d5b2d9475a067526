//! Transcript-relative to genomic coordinate mapping.
//!
//! A site is given as a 1-based offset into the spliced transcript plus a
//! sequence. Walking the exons in transcript order finds the exon holding the
//! first base; the sequence is then laid down across as many exons as it
//! needs, producing one half-open interval per exon touched.
//!
//! On the `+` strand bases run up the genome from `exon.start`; on the `-`
//! strand they run down from `exon.end`. Intervals are emitted in the order
//! the sequence visits them, so a `-` strand site spanning two exons lists
//! the higher-coordinate interval first.

use indexmap::IndexSet;

use crate::error::MapError;
use crate::parser::reference::{TranscriptAnnotation, TranscriptExons};
use crate::types::{ExonSegment, InputRecord, MappedRecord, Side, Traversal};

/// A piece of a mapped site lying in a single exon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Index of the exon in the transcript's exon list.
    pub exon: usize,
    pub start: i64,
    pub end: i64,
}

/// Place `length` bases starting at transcript `offset` onto `exons`.
///
/// Returns `None` when the offset is below 1 or the site runs past the last
/// exon visited by `traversal`.
pub fn locate(
    exons: &[ExonSegment],
    traversal: Traversal,
    offset: i64,
    length: usize,
) -> Option<Vec<Span>> {
    if offset < 1 {
        return None;
    }

    let mut order: Box<dyn Iterator<Item = usize>> = match traversal {
        Traversal::Forward => Box::new(0..exons.len()),
        Traversal::Reverse => Box::new((0..exons.len()).rev()),
    };

    let mut remaining = offset - 1;
    let mut current = loop {
        let idx = order.next()?;
        let exon_len = exons[idx].length();
        if remaining < exon_len {
            break idx;
        }
        remaining -= exon_len;
    };

    let mut spans = Vec::new();
    let mut left = length as i64;

    match traversal {
        Traversal::Forward => {
            let mut pos = exons[current].start + remaining;
            loop {
                let take = left.min(exons[current].end - pos);
                if take > 0 {
                    spans.push(Span {
                        exon: current,
                        start: pos,
                        end: pos + take,
                    });
                    left -= take;
                }
                if left <= 0 {
                    break;
                }
                current = order.next()?;
                pos = exons[current].start;
            }
        }
        Traversal::Reverse => {
            let mut pos = exons[current].end - remaining;
            loop {
                let take = left.min(pos - exons[current].start);
                if take > 0 {
                    spans.push(Span {
                        exon: current,
                        start: pos - take,
                        end: pos,
                    });
                    left -= take;
                }
                if left <= 0 {
                    break;
                }
                current = order.next()?;
                pos = exons[current].end;
            }
        }
    }

    Some(spans)
}

/// Map one site on `transcript` for `side`.
pub fn map_on_transcript(
    record: &InputRecord,
    transcript: &TranscriptExons,
    side: Side,
) -> Result<Vec<MappedRecord>, MapError> {
    let offset = side.offset(record);
    let seq = side.primary(record);
    if seq.is_empty() {
        return Err(MapError::parse(
            record.line,
            format!("empty {} sequence", side),
        ));
    }

    if offset < 1 {
        return Err(MapError::OffsetBeforeStart {
            line: record.line,
            transcript: transcript.id.key.clone(),
            offset,
        });
    }

    let length = seq.chars().count();
    let spans = locate(&transcript.exons, transcript.strand.traversal(), offset, length)
        .ok_or_else(|| MapError::OutOfRange {
            transcript: transcript.id.key.clone(),
            offset,
            length,
            available: transcript.length(),
        })?;

    let label = format!("{}{}", record.transcript.key, side.suffix());
    let seq5: IndexSet<String> = std::iter::once(record.seq5.clone()).collect();
    let seq3: IndexSet<String> = std::iter::once(record.seq3.clone()).collect();

    Ok(spans
        .into_iter()
        .map(|span| MappedRecord {
            chrom: transcript.exons[span.exon].chrom.clone(),
            start: span.start,
            end: span.end,
            label: label.clone(),
            strand: transcript.strand,
            seq5: seq5.clone(),
            seq3: seq3.clone(),
            extra: record.extra.clone(),
        })
        .collect())
}

/// Map one site using the index for `side`.
///
/// Returns `Ok(None)` when the transcript is not in the index.
pub fn map_record(
    record: &InputRecord,
    annotation: &TranscriptAnnotation,
    side: Side,
) -> Result<Option<Vec<MappedRecord>>, MapError> {
    match annotation.get(&record.transcript.key) {
        Some(transcript) => map_on_transcript(record, transcript, side).map(Some),
        None => Ok(None),
    }
}
