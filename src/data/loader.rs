use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::derive::derive_columns;
use super::model::{CellValue, EmployeeRecord, HrDataset};
use super::schema;
use crate::error::{DataError, DataResult};

/// Column names in file order plus the parsed rows.
struct RawTable {
    columns: Vec<String>,
    records: Vec<EmployeeRecord>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the employee dataset from a file and derive the computed columns.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one employee per line (recommended)
/// * `.json`    – `[{ "Age": 41, "Department": "Sales", ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> DataResult<HrDataset> {
    let (mut columns, mut records) = read_raw(path)?;
    validate_schema(path, &columns, &records)?;

    let derived = derive_columns(&mut records);
    for col in derived {
        if !columns.contains(&col) {
            columns.push(col);
        }
    }

    log::info!(
        "Loaded {} employee records ({} columns) from {}",
        records.len(),
        columns.len(),
        path.display()
    );
    Ok(HrDataset::from_records(records, columns))
}

/// Read the file as-is: column names in file order and the raw rows, with
/// no schema checks and no derived columns.
pub fn read_raw(path: &Path) -> DataResult<(Vec<String>, Vec<EmployeeRecord>)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::load(path, format!("unsupported file extension: .{other}"))),
    };
    Ok((raw.columns, raw.records))
}

/// Every required column must exist; required numeric columns may only
/// hold numbers or nulls.
fn validate_schema(path: &Path, columns: &[String], records: &[EmployeeRecord]) -> DataResult<()> {
    if let Some(missing) = schema::required_columns().find(|req| !columns.iter().any(|c| c == req)) {
        return Err(DataError::MissingColumn(missing.to_string()));
    }

    for (row, rec) in records.iter().enumerate() {
        for col in schema::REQUIRED_NUMERIC {
            match rec.get(col) {
                Some(CellValue::Integer(_) | CellValue::Float(_) | CellValue::Null) | None => {}
                Some(other) => {
                    return Err(DataError::load(
                        path,
                        format!("row {row}, column '{col}': '{other}' is not a number"),
                    ));
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one employee per record.
fn load_csv(path: &Path) -> DataResult<RawTable> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataError::load(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::load(path, format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::load(path, "CSV file has no header row"));
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::load(path, format!("CSV row {row_no}: {e}")))?;

        let rec: EmployeeRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value)))
            .collect();
        records.push(rec);
    }

    Ok(RawTable {
        columns: headers,
        records,
    })
}

/// Cell texts read as missing values, the same set pandas' `read_csv` uses.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub(crate) fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return float_cell(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Age": 41, "Attrition": "Yes", "Department": "Sales", ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> DataResult<RawTable> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::load(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| DataError::load(path, format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataError::load(path, "expected top-level JSON array"))?;

    let mut columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataError::load(path, format!("row {i} is not a JSON object")))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            cells.insert(key.clone(), json_to_cell(val));
        }
        records.push(EmployeeRecord { cells });
    }

    Ok(RawTable { columns, records })
}

/// NaN is a missing value, never a number.
fn float_cell(f: f64) -> CellValue {
    if f.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(f)
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                float_cell(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> DataResult<RawTable> {
    let file = std::fs::File::open(path).map_err(|e| DataError::load(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataError::load(path, format!("reading parquet metadata: {e}")))?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| DataError::load(path, format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DataError::load(path, format!("reading parquet record batch: {e}")))?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let rec: EmployeeRecord = schema
                .fields()
                .iter()
                .enumerate()
                .map(|(i, field)| (field.name().clone(), extract_cell(batch.column(i), row)))
                .collect();
            records.push(rec);
        }
    }

    Ok(RawTable { columns, records })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::Text(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::Text(s.value(row).to_string())),
        DataType::Int8 => col
            .as_primitive_opt::<Int8Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int16 => col
            .as_primitive_opt::<Int16Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| float_cell(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| float_cell(a.value(row))),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    cell.unwrap_or_else(|| CellValue::Text(format!("{:?}", col.data_type())))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const HEADER: &str = "Age,Attrition,Department,DistanceFromHome,Gender,JobRole,JobSatisfaction,MaritalStatus,MonthlyIncome,OverTime,PercentSalaryHike,PerformanceRating,TotalWorkingYears,TrainingTimesLastYear,YearsAtCompany,YearsInCurrentRole,YearsSinceLastPromotion,YearsWithCurrManager";

    pub(crate) const ROWS: &[&str] = &[
        "41,Yes,Sales,1,Female,Sales Executive,4,Single,5993,Yes,11,3,8,0,6,4,0,5",
        "49,No,Research & Development,8,Male,Research Scientist,2,Married,5130,No,23,4,10,3,10,7,1,7",
        "37,No,Research & Development,2,Male,Laboratory Technician,3,Single,2090,Yes,15,3,7,3,0,0,0,0",
        "55,No,Sales,5,Male,Manager,1,Married,19000,No,12,3,36,2,30,15,12,10",
        "30,No,Human Resources,12,Female,Human Resources,2,Divorced,3000,No,14,1,5,2,5,4,3,2",
        "19,Yes,Sales,22,Male,Sales Representative,1,Single,1500,Yes,13,3,0,2,0,0,0,0",
    ];

    pub(crate) fn write_csv(dir: &tempfile::TempDir, name: &str, header: &str, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{header}").unwrap();
        for row in rows {
            writeln!(f, "{row}").unwrap();
        }
        path
    }

    #[test]
    fn test_load_csv_derives_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", HEADER, ROWS);
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), ROWS.len());
        for col in schema::DERIVED {
            assert!(ds.has_column(col), "missing derived column {col}");
        }
        let manager = &ds.records[3];
        assert_eq!(manager.text(schema::TO_BE_PROMOTED), Some("Yes"));
        assert_eq!(manager.text(schema::WORK_EXPERIENCE), Some("40 Yrs"));
        let hr = &ds.records[4];
        assert_eq!(hr.text(schema::TO_BE_RETRENCHED), Some("Yes"));
        let junior = &ds.records[5];
        assert_eq!(junior.number(schema::PCT_AT_COMPANY), Some(0.0));
        assert_eq!(junior.text(schema::WORK_EXPERIENCE), Some("5 Yrs"));
    }

    #[test]
    fn test_derived_invariants_hold_for_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", HEADER, ROWS);
        let ds = load_file(&path).unwrap();
        for rec in &ds.records {
            let since = rec.number(schema::YEARS_SINCE_LAST_PROMOTION).unwrap();
            let rating = rec.number(schema::PERFORMANCE_RATING).unwrap();
            let expected = if since >= 10.0 && rating > 2.0 { "Yes" } else { "No" };
            assert_eq!(rec.text(schema::TO_BE_PROMOTED), Some(expected));

            let total = rec.number(schema::TOTAL_WORKING_YEARS).unwrap();
            let at = rec.number(schema::YEARS_AT_COMPANY).unwrap();
            let pct = rec.number(schema::PCT_AT_COMPANY).unwrap();
            if total == 0.0 {
                assert_eq!(pct, 0.0);
            } else {
                assert!((pct - at / total * 100.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_reload_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", HEADER, ROWS);
        assert_eq!(load_file(&path).unwrap(), load_file(&path).unwrap());
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataError::DataLoad { .. }));
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let header = HEADER.replace(",PerformanceRating", ",Rating");
        let path = write_csv(&dir, "hr.csv", &header, ROWS);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "PerformanceRating"));
    }

    #[test]
    fn test_non_numeric_cell_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "hr.csv",
            HEADER,
            &["forty,No,Sales,1,Male,Manager,1,Single,100,No,11,3,8,0,6,4,0,5"],
        );
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Age"));
    }

    #[test]
    fn test_na_tokens_read_as_missing() {
        for token in ["", "NA", "N/A", "null", "NaN", "nan", "None", "#N/A"] {
            assert_eq!(guess_cell_type(token), CellValue::Null, "token {token:?}");
        }
        assert_eq!(guess_cell_type("NAN"), CellValue::Null);
        assert_eq!(guess_cell_type("Nancy"), CellValue::Text("Nancy".into()));
        assert_eq!(guess_cell_type("2.5"), CellValue::Float(2.5));
    }

    #[test]
    fn test_missing_markers_load_and_derive_zero_share() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "hr.csv",
            HEADER,
            &[
                "41,Yes,Sales,NA,Female,Sales Executive,4,Single,5993,Yes,11,3,NaN,0,6,4,0,5",
                "49,No,Sales,N/A,Male,Manager,2,Married,5130,No,23,4,10,3,10,7,1,null",
            ],
        );
        let ds = load_file(&path).unwrap();

        let first = &ds.records[0];
        assert_eq!(first.get(schema::DISTANCE_FROM_HOME), Some(&CellValue::Null));
        assert_eq!(first.get(schema::TOTAL_WORKING_YEARS), Some(&CellValue::Null));
        assert_eq!(first.number(schema::PCT_AT_COMPANY), Some(0.0));
        assert_eq!(first.get(schema::WORK_EXPERIENCE), Some(&CellValue::Null));
        let second = &ds.records[1];
        assert_eq!(second.get(schema::YEARS_WITH_CURR_MANAGER), Some(&CellValue::Null));
        assert_eq!(second.number(schema::PCT_AT_COMPANY), Some(100.0));
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(&dir, "hr.csv", HEADER, &ROWS[..2]);
        let from_csv = load_file(&csv_path).unwrap();

        let cols: Vec<&str> = HEADER.split(',').collect();
        let rows: Vec<JsonValue> = ROWS[..2]
            .iter()
            .map(|line| {
                let obj: serde_json::Map<String, JsonValue> = cols
                    .iter()
                    .zip(line.split(','))
                    .map(|(c, v)| {
                        let value = v
                            .parse::<i64>()
                            .map(JsonValue::from)
                            .unwrap_or_else(|_| JsonValue::from(v));
                        (c.to_string(), value)
                    })
                    .collect();
                JsonValue::Object(obj)
            })
            .collect();
        let json_path = dir.path().join("hr.json");
        std::fs::write(&json_path, serde_json::to_string(&rows).unwrap()).unwrap();

        let from_json = load_file(&json_path).unwrap();
        assert_eq!(from_json.records, from_csv.records);
    }

    #[test]
    fn test_load_parquet_matches_csv() {
        use arrow::array::{ArrayRef, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        // First row has no DistanceFromHome in either file.
        let mut lines: Vec<String> = ROWS.iter().map(|r| r.to_string()).collect();
        lines[0] = lines[0].replacen(",1,Female,", ",NA,Female,", 1);
        let dir = tempfile::tempdir().unwrap();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let csv_path = write_csv(&dir, "hr.csv", HEADER, &line_refs);
        let from_csv = load_file(&csv_path).unwrap();

        let cells: Vec<Vec<&str>> = lines.iter().map(|l| l.split(',').collect()).collect();
        let mut fields = Vec::new();
        let mut arrays: Vec<ArrayRef> = Vec::new();
        for (i, name) in HEADER.split(',').enumerate() {
            let column: Vec<Option<&str>> = cells
                .iter()
                .map(|row| Some(row[i]).filter(|v| *v != "NA"))
                .collect();
            let numeric = column.iter().flatten().all(|v| v.parse::<i64>().is_ok());
            if numeric {
                let values: Int64Array = column.iter().map(|v| v.map(|v| v.parse::<i64>().unwrap())).collect();
                fields.push(Field::new(name, DataType::Int64, true));
                arrays.push(Arc::new(values));
            } else {
                fields.push(Field::new(name, DataType::Utf8, true));
                arrays.push(Arc::new(StringArray::from(column)));
            }
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();

        let pq_path = dir.path().join("hr.parquet");
        let file = std::fs::File::create(&pq_path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let from_parquet = load_file(&pq_path).unwrap();
        assert_eq!(from_parquet.column_names, from_csv.column_names);
        assert_eq!(from_parquet.records, from_csv.records);
        assert_eq!(
            from_parquet.records[0].get(schema::DISTANCE_FROM_HOME),
            Some(&CellValue::Null)
        );
        assert_eq!(from_parquet.records[3].text(schema::TO_BE_PROMOTED), Some("Yes"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("hr.xlsx")).unwrap_err();
        assert!(err.to_string().contains("xlsx"));
    }
}
