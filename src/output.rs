//! Output formatting for utrmap results.
//!
//! Each mapped interval becomes one tab-separated line:
//! chrom, start, end, label, strand, 5' sequences, 3' sequences, extras.
//! Merged sequence sets are comma-joined in first-seen order.

use anyhow::Result;
use indexmap::IndexSet;
use std::io::Write;

use crate::mapper::OutputGroup;
use crate::types::MappedRecord;

fn join_set(set: &IndexSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Format a single output line, without the trailing newline.
pub fn format_output_line(record: &MappedRecord) -> String {
    let mut line = format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.chrom,
        record.start,
        record.end,
        record.label,
        record.strand,
        join_set(&record.seq5),
        join_set(&record.seq3)
    );

    for field in &record.extra {
        line.push('\t');
        line.push_str(field);
    }

    line
}

/// Write every interval of a group. Returns the number of lines written.
pub fn write_group<W: Write>(writer: &mut W, group: &OutputGroup) -> Result<usize> {
    for record in &group.records {
        writeln!(writer, "{}", format_output_line(record))?;
    }
    Ok(group.records.len())
}
