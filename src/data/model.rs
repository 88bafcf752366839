use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the employee table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, guessed from the source file.
/// Used as a key in `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// Equality follows `Ord` so `BTreeSet` lookups, `==` and `Hash` agree
// (NaN equals itself, -0.0 and 0.0 differ).
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                // Integers and floats share a rank so mixed numeric columns sort by value.
                Integer(_) | Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(std::cmp::Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(std::cmp::Ordering::Greater),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (integers widen, everything else is `None`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text form used when writing the value back to CSV (null → empty cell).
    pub fn to_csv_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            // Whole floats keep their decimal point (`5.0`, not `5`).
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
            CellValue::Float(v) => v.to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// EmployeeRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single employee (one row of the source file).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeRecord {
    /// Raw and derived columns: column_name → value.
    pub cells: BTreeMap<String, CellValue>,
}

impl EmployeeRecord {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Numeric value of a column; `None` when absent, null or non-numeric.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.cells.get(column).and_then(CellValue::as_f64)
    }

    /// Text value of a column; `None` when absent, null or non-text.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(CellValue::as_str)
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        self.cells.insert(column.to_string(), value);
    }
}

impl FromIterator<(String, CellValue)> for EmployeeRecord {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        EmployeeRecord {
            cells: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// HrDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
#[derive(Debug, Clone, PartialEq)]
pub struct HrDataset {
    /// All employees (rows).
    pub records: Vec<EmployeeRecord>,
    /// Column names in file order, derived columns appended.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl HrDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<EmployeeRecord>, column_names: Vec<String>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.cells {
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        HrDataset {
            records,
            column_names,
            unique_values,
        }
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Borrow the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Vec<&EmployeeRecord> {
        indices
            .iter()
            .filter_map(|&i| self.records.get(i))
            .collect()
    }

    /// Observed (min, max) of a numeric column, ignoring nulls.
    pub fn numeric_bounds(&self, column: &str) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.number(column))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
