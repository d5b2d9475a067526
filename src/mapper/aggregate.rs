//! Merging of duplicate sites.
//!
//! Input for a pass arrives sorted by offset. Consecutive sites that share the
//! same offset and the same primary sequence describe one genomic site seen
//! with several partner sequences; they collapse into a single output group
//! whose partner column is the ordered union of partners and whose score is
//! the lowest seen.

use tracing::debug;

use crate::error::MapError;
use crate::types::{InputRecord, MappedRecord, Side};

/// A buffered run of mapped records sharing one merge key.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGroup {
    pub offset: i64,
    pub primary: String,
    /// One record per exon the site touches, in traversal order.
    pub records: Vec<MappedRecord>,
}

impl OutputGroup {
    fn matches(&self, offset: i64, primary: &str) -> bool {
        self.offset == offset && self.primary == primary
    }
}

/// Streaming merger for one UTR side.
///
/// Feed mapped sites with [`push`](RecordAggregator::push) in input order;
/// a finished group is handed back whenever the key changes, and the last one
/// by [`finish`](RecordAggregator::finish).
#[derive(Debug)]
pub struct RecordAggregator {
    side: Side,
    current: Option<OutputGroup>,
}

impl RecordAggregator {
    pub fn new(side: Side) -> Self {
        RecordAggregator {
            side,
            current: None,
        }
    }

    /// Add the mapped records of `record`.
    ///
    /// Returns the previously buffered group when `record` starts a new key.
    pub fn push(
        &mut self,
        record: &InputRecord,
        mapped: Vec<MappedRecord>,
    ) -> Result<Option<OutputGroup>, MapError> {
        let offset = self.side.offset(record);
        let primary = self.side.primary(record);

        if let Some(group) = self.current.as_mut() {
            if group.matches(offset, primary) {
                if let (Some(kept), Some(folded)) = (group.records.first(), mapped.first()) {
                    if kept.label != folded.label {
                        debug!(
                            line = record.line,
                            offset,
                            kept = %kept.label,
                            folded = %folded.label,
                            "merging across transcripts; keeping {}:{}-{}",
                            kept.chrom,
                            kept.start,
                            kept.end
                        );
                    }
                }
                merge_into(group, mapped, self.side, record.line)?;
                return Ok(None);
            }
        }

        let next = OutputGroup {
            offset,
            primary: primary.to_string(),
            records: mapped,
        };
        Ok(self.current.replace(next))
    }

    /// Hand back whatever is still buffered.
    pub fn finish(self) -> Option<OutputGroup> {
        self.current
    }
}

/// Merge `incoming` into `group` record by record.
fn merge_into(
    group: &mut OutputGroup,
    incoming: Vec<MappedRecord>,
    side: Side,
    line: usize,
) -> Result<(), MapError> {
    if group.records.len() != incoming.len() {
        return Err(MapError::MergeMismatch {
            offset: group.offset,
            existing: group.records.len(),
            incoming: incoming.len(),
        });
    }

    for (existing, mut new) in group.records.iter_mut().zip(incoming) {
        let partners = std::mem::take(new.partner_set_mut(side));
        existing.partner_set_mut(side).extend(partners);
        merge_score(&mut existing.extra, &new.extra, line)?;
    }

    Ok(())
}

/// Keep the lower of two scores held in the first extra column.
///
/// An empty or missing score is treated as absent. The winning value keeps
/// its original text.
fn merge_score(existing: &mut [String], incoming: &[String], line: usize) -> Result<(), MapError> {
    let (current, candidate) = match (existing.first_mut(), incoming.first()) {
        (Some(current), Some(candidate)) if !candidate.is_empty() => (current, candidate),
        _ => return Ok(()),
    };

    let new_score = parse_score(candidate, line)?;
    if current.is_empty() || new_score < parse_score(current, line)? {
        *current = candidate.clone();
    }
    Ok(())
}

fn parse_score(value: &str, line: usize) -> Result<f64, MapError> {
    value
        .trim()
        .parse()
        .map_err(|_| MapError::parse(line, format!("invalid score: {}", value)))
}
