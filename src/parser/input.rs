//! Site table parser.
//!
//! Each row is `transcript_id, 5'-offset, 3'-offset, 5'-seq, 3'-seq` followed
//! by any number of extra columns. The 3' sequence is stored reversed.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;
use tracing::info;

use crate::error::MapError;
use crate::parser::util::{open_reader, strip_terminator};
use crate::types::{InputRecord, Side, TranscriptId};

/// Minimum number of tab-separated fields in an input row.
pub const MIN_INPUT_FIELDS: usize = 5;

/// Read every site from an input file.
///
/// Supports both plain text and gzip-compressed files.
pub fn parse_input(path: &Path) -> Result<Vec<InputRecord>> {
    info!("Reading input file: {}", path.display());
    let reader = open_reader(path, "input")?;
    let records = parse_input_reader(reader)
        .with_context(|| format!("Invalid input file: {}", path.display()))?;
    info!(records = records.len(), "Read {}", path.display());
    Ok(records)
}

/// Parse sites from any line source, skipping blank lines.
pub fn parse_input_reader<R: BufRead>(reader: R) -> Result<Vec<InputRecord>, MapError> {
    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let trimmed = strip_terminator(&line);
        if trimmed.is_empty() {
            continue;
        }
        records.push(parse_input_line(trimmed, idx + 1)?);
    }

    Ok(records)
}

/// Parse a single input row.
pub fn parse_input_line(line: &str, line_no: usize) -> Result<InputRecord, MapError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_INPUT_FIELDS {
        return Err(MapError::format(
            line_no,
            format!(
                "expected at least {} fields, found {}",
                MIN_INPUT_FIELDS,
                fields.len()
            ),
        ));
    }

    let transcript = TranscriptId::parse(fields[0])
        .ok_or_else(|| MapError::parse(line_no, format!("invalid transcript ID: {}", fields[0])))?;
    let offset5 = parse_offset(fields[1], line_no)?;
    let offset3 = parse_offset(fields[2], line_no)?;

    // Only the last column can still carry the terminator.
    let seq3_field = if fields.len() == MIN_INPUT_FIELDS {
        strip_terminator(fields[4])
    } else {
        fields[4]
    };

    let extra = fields[MIN_INPUT_FIELDS..]
        .iter()
        .map(|s| strip_terminator(s).to_string())
        .collect();

    Ok(InputRecord {
        transcript,
        offset5,
        offset3,
        seq5: fields[3].to_string(),
        seq3: seq3_field.chars().rev().collect(),
        extra,
        line: line_no,
    })
}

fn parse_offset(field: &str, line_no: usize) -> Result<i64, MapError> {
    field
        .parse()
        .map_err(|_| MapError::parse(line_no, format!("invalid offset: {}", field)))
}

/// Order records by the offset column `side` maps.
///
/// The sort is stable, so rows sharing an offset stay in file order.
pub fn sort_for_side(records: &[InputRecord], side: Side) -> Vec<&InputRecord> {
    let mut sorted: Vec<&InputRecord> = records.iter().collect();
    sorted.sort_by_key(|record| side.offset(record));
    sorted
}
