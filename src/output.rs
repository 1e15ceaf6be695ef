//! Fixture serialization: pretty JSON arrays and bulk-ingest NDJSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;
use serde_json::json;

use crate::error::Result;

/// Write `records` as an indented JSON array.
pub fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write `records` as bulk-index NDJSON: an index directive line before each
/// compact record line.
pub fn write_ndjson<T: Serialize>(path: &Path, index: &str, records: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_bulk_lines(&mut writer, index, records)?;
    writer.flush()?;
    info!("Saved NDJSON ({} documents) to {}", records.len(), path.display());
    Ok(())
}

pub fn write_bulk_lines<W: Write, T: Serialize>(writer: &mut W, index: &str, records: &[T]) -> Result<()> {
    let directive = serde_json::to_string(&json!({ "index": { "_index": index } }))?;
    for record in records {
        writer.write_all(directive.as_bytes())?;
        writer.write_all(b"\n")?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Doc {
        id: u64,
        name: &'static str,
    }

    #[test]
    fn test_bulk_lines_alternate() {
        let docs = [Doc { id: 1, name: "a" }, Doc { id: 2, name: "b" }];
        let mut buf = Vec::new();
        write_bulk_lines(&mut buf, "sui-transactions", &docs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r#"{"index":{"_index":"sui-transactions"}}"#);
        assert_eq!(lines[1], r#"{"id":1,"name":"a"}"#);
        assert_eq!(lines[2], lines[0]);
        assert_eq!(lines[3], r#"{"id":2,"name":"b"}"#);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_bulk_lines_empty() {
        let docs: [Doc; 0] = [];
        let mut buf = Vec::new();
        write_bulk_lines(&mut buf, "idx", &docs).unwrap();
        assert!(buf.is_empty());
    }
}
