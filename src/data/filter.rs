use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::model::{CellValue, EmployeeRecord, HrDataset};
use crate::error::{FilterError, FilterResult};

// ---------------------------------------------------------------------------
// Domains and constraints
// ---------------------------------------------------------------------------

/// Values a filter field can take, observed on the full dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDomain {
    Categorical(BTreeSet<CellValue>),
    Numeric { min: f64, max: f64 },
}

/// What the user currently allows for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Allowed values. Empty means "no constraint".
    Categories(BTreeSet<CellValue>),
    /// Inclusive bounds.
    Range { min: f64, max: f64 },
}

impl FieldDomain {
    /// The constraint that lets every observed value through.
    fn full(&self) -> Constraint {
        match self {
            FieldDomain::Categorical(values) => Constraint::Categories(values.clone()),
            FieldDomain::Numeric { min, max } => Constraint::Range {
                min: *min,
                max: *max,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate: conjunction of the active clauses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    In {
        field: String,
        values: BTreeSet<CellValue>,
    },
    Between {
        field: String,
        min: f64,
        max: f64,
    },
}

impl Clause {
    pub fn matches(&self, rec: &EmployeeRecord) -> bool {
        match self {
            Clause::In { field, values } => rec.get(field).is_some_and(|v| values.contains(v)),
            Clause::Between { field, min, max } => rec
                .number(field)
                .is_some_and(|v| *min <= v && v <= *max),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::In { field, values } => {
                let list: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "({field} in [{}])", list.join(", "))
            }
            Clause::Between { field, min, max } => write!(f, "({min} <= {field} <= {max})"),
        }
    }
}

/// All active clauses, AND-ed together. An empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub clauses: Vec<Clause>,
}

impl Predicate {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, rec: &EmployeeRecord) -> bool {
        self.clauses.iter().all(|c| c.matches(rec))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" and "))
    }
}

// ---------------------------------------------------------------------------
// FilterState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    /// Every field at its full domain.
    Unconstrained,
    /// At least one field narrowed.
    Constrained,
}

/// Per-field selection state for one session.
///
/// Starts from the full domains of the dataset it was built from; a field is
/// only part of the predicate while its selection differs from that domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Field names in display order.
    fields: Vec<String>,
    domains: BTreeMap<String, FieldDomain>,
    constraints: BTreeMap<String, Constraint>,
}

impl FilterState {
    /// Initialise every configured field with its full domain (i.e., show
    /// everything). Fields absent from the dataset are skipped.
    pub fn from_dataset(dataset: &HrDataset, categorical: &[String], numeric: &[String]) -> Self {
        let mut state = FilterState::default();

        for col in categorical {
            let Some(values) = dataset.unique_values.get(col) else {
                log::warn!("Filter field '{col}' not found in dataset, skipping");
                continue;
            };
            let values: BTreeSet<CellValue> =
                values.iter().filter(|v| !v.is_null()).cloned().collect();
            state.add_field(col, FieldDomain::Categorical(values));
        }

        for col in numeric {
            if !dataset.has_column(col) {
                log::warn!("Filter field '{col}' not found in dataset, skipping");
                continue;
            }
            match dataset.numeric_bounds(col) {
                Some((min, max)) => state.add_field(col, FieldDomain::Numeric { min, max }),
                None => log::warn!("Numeric filter field '{col}' has no numeric values, skipping"),
            }
        }

        state
    }

    fn add_field(&mut self, field: &str, domain: FieldDomain) {
        if self.domains.contains_key(field) {
            return;
        }
        self.fields.push(field.to_string());
        self.constraints.insert(field.to_string(), domain.full());
        self.domains.insert(field.to_string(), domain);
    }

    /// Field names in display order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn domain(&self, field: &str) -> Option<&FieldDomain> {
        self.domains.get(field)
    }

    pub fn constraint(&self, field: &str) -> Option<&Constraint> {
        self.constraints.get(field)
    }

    /// Replace the constraint of one field.
    pub fn set_constraint(&mut self, field: &str, constraint: Constraint) -> FilterResult<()> {
        let domain = self
            .domains
            .get(field)
            .ok_or_else(|| FilterError::UnknownField(field.to_string()))?;
        let same_kind = matches!(
            (domain, &constraint),
            (FieldDomain::Categorical(_), Constraint::Categories(_))
                | (FieldDomain::Numeric { .. }, Constraint::Range { .. })
        );
        if !same_kind {
            return Err(FilterError::KindMismatch(field.to_string()));
        }
        log::debug!("Filter '{field}' set to {constraint:?}");
        self.constraints.insert(field.to_string(), constraint);
        Ok(())
    }

    /// Add or remove one value from a categorical selection.
    pub fn toggle_value(&mut self, field: &str, value: &CellValue) -> FilterResult<()> {
        let mut selected = match self.constraints.get(field) {
            Some(Constraint::Categories(selected)) => selected.clone(),
            Some(Constraint::Range { .. }) => return Err(FilterError::KindMismatch(field.to_string())),
            None => return Err(FilterError::UnknownField(field.to_string())),
        };
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.set_constraint(field, Constraint::Categories(selected))
    }

    /// Select every value of a field again.
    pub fn reset_field(&mut self, field: &str) -> FilterResult<()> {
        let full = self
            .domains
            .get(field)
            .map(FieldDomain::full)
            .ok_or_else(|| FilterError::UnknownField(field.to_string()))?;
        self.constraints.insert(field.to_string(), full);
        Ok(())
    }

    /// Reset every field to its full domain.
    pub fn clear_all(&mut self) {
        for (field, domain) in &self.domains {
            self.constraints.insert(field.clone(), domain.full());
        }
        log::info!("Filters cleared");
    }

    /// The clause for one field, or `None` while it lets its whole domain through.
    fn clause_for(&self, field: &str) -> FilterResult<Option<Clause>> {
        let (Some(domain), Some(constraint)) = (self.domains.get(field), self.constraints.get(field))
        else {
            return Ok(None);
        };
        match (domain, constraint) {
            (FieldDomain::Categorical(all), Constraint::Categories(selected)) => {
                // Compare as sets: a proper subset must never be dropped.
                if selected.is_empty() || selected == all {
                    Ok(None)
                } else {
                    Ok(Some(Clause::In {
                        field: field.to_string(),
                        values: selected.clone(),
                    }))
                }
            }
            (FieldDomain::Numeric { min: lo, max: hi }, Constraint::Range { min, max }) => {
                if min > max {
                    return Err(FilterError::InvalidRange {
                        field: field.to_string(),
                        min: *min,
                        max: *max,
                    });
                }
                if *min <= *lo && *max >= *hi {
                    Ok(None)
                } else {
                    Ok(Some(Clause::Between {
                        field: field.to_string(),
                        min: *min,
                        max: *max,
                    }))
                }
            }
            _ => Err(FilterError::KindMismatch(field.to_string())),
        }
    }

    /// Build the conjunctive predicate from every narrowed field.
    pub fn predicate(&self) -> FilterResult<Predicate> {
        let mut clauses = Vec::new();
        for field in &self.fields {
            if let Some(clause) = self.clause_for(field)? {
                clauses.push(clause);
            }
        }
        Ok(Predicate { clauses })
    }

    pub fn status(&self) -> FilterStatus {
        match self.predicate() {
            Ok(p) if p.is_empty() => FilterStatus::Unconstrained,
            _ => FilterStatus::Constrained,
        }
    }

    pub fn is_constrained(&self) -> bool {
        self.status() == FilterStatus::Constrained
    }
}

// ---------------------------------------------------------------------------
// Applying the filter
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active constraints, in table
/// order. With no active constraint every index is returned.
pub fn apply(dataset: &HrDataset, state: &FilterState) -> FilterResult<Vec<usize>> {
    let predicate = state.predicate()?;
    if predicate.is_empty() {
        return Ok((0..dataset.len()).collect());
    }
    let indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| predicate.matches(rec))
        .map(|(i, _)| i)
        .collect();
    log::debug!("Filter {predicate} kept {} of {} rows", indices.len(), dataset.len());
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn dataset() -> HrDataset {
        let rows = [
            (25, "Sales"),
            (30, "Research & Development"),
            (35, "Sales"),
            (40, "Human Resources"),
            (45, "Research & Development"),
        ];
        let records = rows
            .iter()
            .map(|&(age, dept)| {
                [
                    ("Age".to_string(), CellValue::Integer(age)),
                    ("Department".to_string(), text(dept)),
                ]
                .into_iter()
                .collect()
            })
            .collect();
        HrDataset::from_records(records, vec!["Age".into(), "Department".into()])
    }

    fn state(ds: &HrDataset) -> FilterState {
        FilterState::from_dataset(ds, &["Department".into()], &["Age".into()])
    }

    fn ages(ds: &HrDataset, idx: &[usize]) -> Vec<f64> {
        ds.select(idx).iter().filter_map(|r| r.number("Age")).collect()
    }

    #[test]
    fn test_unconstrained_returns_every_row() {
        let ds = dataset();
        let st = state(&ds);
        assert_eq!(st.status(), FilterStatus::Unconstrained);
        assert_eq!(apply(&ds, &st).unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(apply(&ds, &FilterState::default()).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_age_range_is_inclusive() {
        let ds = dataset();
        let mut st = state(&ds);
        st.set_constraint("Age", Constraint::Range { min: 30.0, max: 40.0 })
            .unwrap();
        assert!(st.is_constrained());
        let idx = apply(&ds, &st).unwrap();
        assert_eq!(ages(&ds, &idx), vec![30.0, 35.0, 40.0]);
    }

    #[test]
    fn test_clear_all_behaves_like_never_constrained() {
        let ds = dataset();
        let fresh = state(&ds);
        let mut st = fresh.clone();
        st.set_constraint("Age", Constraint::Range { min: 30.0, max: 31.0 })
            .unwrap();
        st.toggle_value("Department", &text("Sales")).unwrap();
        st.clear_all();
        assert_eq!(st, fresh);
        assert_eq!(apply(&ds, &st).unwrap(), apply(&ds, &fresh).unwrap());
    }

    #[test]
    fn test_categorical_subset_and_conjunction() {
        let ds = dataset();
        let mut st = state(&ds);
        st.set_constraint(
            "Department",
            Constraint::Categories([text("Sales"), text("Human Resources")].into()),
        )
        .unwrap();
        assert_eq!(ages(&ds, &apply(&ds, &st).unwrap()), vec![25.0, 35.0, 40.0]);

        st.set_constraint("Age", Constraint::Range { min: 30.0, max: 45.0 })
            .unwrap();
        assert_eq!(ages(&ds, &apply(&ds, &st).unwrap()), vec![35.0, 40.0]);
        assert_eq!(
            st.predicate().unwrap().to_string(),
            "(Department in [Human Resources, Sales]) and (30 <= Age <= 45)"
        );
    }

    #[test]
    fn test_proper_subset_with_full_size_is_not_dropped() {
        // Same cardinality as the domain but a different set must still filter.
        let ds = dataset();
        let mut st = state(&ds);
        st.set_constraint(
            "Department",
            Constraint::Categories([text("Sales"), text("Human Resources"), text("Marketing")].into()),
        )
        .unwrap();
        assert_eq!(apply(&ds, &st).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn test_empty_selection_means_no_constraint() {
        let ds = dataset();
        let mut st = state(&ds);
        st.set_constraint("Department", Constraint::Categories(BTreeSet::new()))
            .unwrap();
        assert_eq!(st.status(), FilterStatus::Unconstrained);
        assert_eq!(apply(&ds, &st).unwrap().len(), 5);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let ds = dataset();
        let mut st = state(&ds);
        st.set_constraint("Age", Constraint::Range { min: 41.0, max: 30.0 })
            .unwrap();
        assert_eq!(
            apply(&ds, &st).unwrap_err(),
            FilterError::InvalidRange {
                field: "Age".into(),
                min: 41.0,
                max: 30.0
            }
        );
    }

    #[test]
    fn test_unknown_field_and_kind_mismatch() {
        let ds = dataset();
        let mut st = state(&ds);
        assert_eq!(
            st.set_constraint("Salary", Constraint::Range { min: 0.0, max: 1.0 }),
            Err(FilterError::UnknownField("Salary".into()))
        );
        assert_eq!(
            st.set_constraint("Age", Constraint::Categories(BTreeSet::new())),
            Err(FilterError::KindMismatch("Age".into()))
        );
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let ds = dataset();
        let st = FilterState::from_dataset(&ds, &["JobRole".into()], &["Department".into()]);
        assert!(st.fields().is_empty());
    }

    #[test]
    fn test_toggle_and_reset_field() {
        let ds = dataset();
        let mut st = state(&ds);
        st.toggle_value("Department", &text("Sales")).unwrap();
        assert_eq!(apply(&ds, &st).unwrap(), vec![1, 3, 4]);
        st.reset_field("Department").unwrap();
        assert!(!st.is_constrained());
    }
}
