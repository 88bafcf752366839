use std::path::Path;

use super::loader::read_raw;
use crate::error::{DataError, DataResult};

/// Re-read the source file and serialize its raw columns as CSV.
///
/// The file is read again on every call, so the bytes never reflect the
/// active filters or the derived columns.
pub fn raw_csv_bytes(path: &Path) -> DataResult<Vec<u8>> {
    let (columns, records) = read_raw(path)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(|e| DataError::load(path, format!("writing CSV header: {e}")))?;
    for (row_no, rec) in records.iter().enumerate() {
        let fields = columns
            .iter()
            .map(|col| rec.get(col).map(|v| v.to_csv_field()).unwrap_or_default());
        writer
            .write_record(fields)
            .map_err(|e| DataError::load(path, format!("writing CSV row {row_no}: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::load(path, format!("flushing CSV: {e}")))?;
    log::info!("Exported {} raw rows from {}", records.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::{write_csv, HEADER, ROWS};

    #[test]
    fn test_export_reproduces_raw_columns_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", HEADER, ROWS);

        let bytes = raw_csv_bytes(&path).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(lines.next(), Some(ROWS[0]));
        assert_eq!(text.lines().count(), ROWS.len() + 1);
        assert!(!text.contains("ToBePromoted"));
    }

    #[test]
    fn test_export_quotes_embedded_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", "Name,Department", &["\"Doe, Jane\",Sales"]);
        let text = String::from_utf8(raw_csv_bytes(&path).unwrap()).unwrap();
        assert!(text.contains("\"Doe, Jane\",Sales"));
    }
}
