//! JSONL record feed.
//!
//! Reads newline-delimited JSON and wraps each line as a schemaless
//! record on the given topic, offset = line number. Blank lines are
//! skipped.

use anyhow::Context;
use connect_core::SinkRecord;
use record_types::record_value_from_json;
use std::io::BufRead;

/// Read all records from a JSONL reader.
pub fn read_records(reader: impl BufRead, topic: &str) -> anyhow::Result<Vec<SinkRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let json: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("invalid JSON on line {}", index + 1))?;
        records.push(SinkRecord::schemaless(
            topic,
            record_value_from_json(&json),
            index as i64,
        ));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_records_with_line_offsets() {
        let input = "{\"a\":1}\n\n{\"b\":2}\n";
        let records = read_records(Cursor::new(input), "orders").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].topic, "orders");
        assert_eq!(records[0].offset, 0);
        // Blank lines are skipped but still advance the offset.
        assert_eq!(records[1].offset, 2);
    }

    #[test]
    fn test_invalid_json_names_the_line() {
        let input = "{\"a\":1}\nnot json\n";
        let err = read_records(Cursor::new(input), "orders").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
