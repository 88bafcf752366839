//! Descriptive aggregates over a (filtered) slice of employee records.
//!
//! Every function is pure and tolerates an empty slice by returning
//! zero-valued results. Categories that never occur report zero instead of
//! failing.

use std::collections::BTreeMap;

use super::model::{CellValue, EmployeeRecord};
use super::schema::{self, FEMALE, MALE, NO, WORK_EXPERIENCE_LABELS, YES};

pub type Rows<'a> = [&'a EmployeeRecord];

/// Round to two decimals, the precision every table and card displays.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Department stats
// ---------------------------------------------------------------------------

/// Per-department means of pay, tenure and training, plus overtime head-count.
#[derive(Debug, Clone, PartialEq)]
pub struct DeptStats {
    pub department: String,
    pub monthly_income: f64,
    pub percent_salary_hike: f64,
    pub total_working_years: f64,
    pub years_at_company: f64,
    pub training_times_last_year: f64,
    pub overtime: usize,
}

pub fn dept_stats(rows: &Rows) -> Vec<DeptStats> {
    let mut groups: BTreeMap<&str, Vec<&EmployeeRecord>> = BTreeMap::new();
    for rec in rows {
        if let Some(dept) = rec.text(schema::DEPARTMENT) {
            groups.entry(dept).or_default().push(*rec);
        }
    }

    groups
        .into_iter()
        .map(|(dept, members)| {
            let col_mean = |col: &str| {
                let values: Vec<f64> = members.iter().filter_map(|r| r.number(col)).collect();
                round2(mean(&values))
            };
            DeptStats {
                department: dept.to_string(),
                monthly_income: col_mean(schema::MONTHLY_INCOME),
                percent_salary_hike: col_mean(schema::PERCENT_SALARY_HIKE),
                total_working_years: col_mean(schema::TOTAL_WORKING_YEARS),
                years_at_company: col_mean(schema::YEARS_AT_COMPANY),
                training_times_last_year: col_mean(schema::TRAINING_TIMES_LAST_YEAR),
                overtime: members
                    .iter()
                    .filter(|r| r.text(schema::OVER_TIME) == Some(YES))
                    .count(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Head-counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenderCount {
    pub total: usize,
    pub male: usize,
    pub female: usize,
    pub male_pct: f64,
    pub female_pct: f64,
}

/// Employees by gender. The total is male + female.
pub fn gender_count(rows: &Rows) -> GenderCount {
    let male = count_eq(rows, schema::GENDER, MALE);
    let female = count_eq(rows, schema::GENDER, FEMALE);
    let total = male + female;
    GenderCount {
        total,
        male,
        female,
        male_pct: round2(pct(male, total)),
        female_pct: round2(pct(female, total)),
    }
}

/// Yes/No split of a flag column against the total row count.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlagCount {
    pub yes: usize,
    pub no: usize,
    pub yes_pct: f64,
    pub no_pct: f64,
}

fn flag_count(rows: &Rows, column: &str) -> FlagCount {
    let yes = count_eq(rows, column, YES);
    let no = count_eq(rows, column, NO);
    FlagCount {
        yes,
        no,
        yes_pct: round2(pct(yes, rows.len())),
        no_pct: round2(pct(no, rows.len())),
    }
}

pub fn promo_count(rows: &Rows) -> FlagCount {
    flag_count(rows, schema::TO_BE_PROMOTED)
}

pub fn retrench_count(rows: &Rows) -> FlagCount {
    flag_count(rows, schema::TO_BE_RETRENCHED)
}

fn count_eq(rows: &Rows, column: &str, value: &str) -> usize {
    rows.iter().filter(|r| r.text(column) == Some(value)).count()
}

// ---------------------------------------------------------------------------
// Share of career at the company
// ---------------------------------------------------------------------------

/// Bucket labels with their inclusive upper bound on `PctAtCompany`.
pub const PCT_AT_COMPANY_BUCKETS: [(&str, f64); 4] = [
    ("between 0-25%", 25.0),
    ("between 26-50%", 50.0),
    ("between 51-75%", 75.0),
    ("between 76-100%", 100.0),
];

/// Percentage of rows per career-share bucket. Values above 100 land nowhere.
pub fn pct_at_company(rows: &Rows) -> Vec<(&'static str, f64)> {
    let mut counts = [0usize; PCT_AT_COMPANY_BUCKETS.len()];
    for rec in rows {
        let Some(v) = rec.number(schema::PCT_AT_COMPANY) else {
            continue;
        };
        if let Some(i) = PCT_AT_COMPANY_BUCKETS.iter().position(|&(_, hi)| v <= hi) {
            counts[i] += 1;
        }
    }
    PCT_AT_COMPANY_BUCKETS
        .iter()
        .zip(counts)
        .map(|(&(label, _), n)| (label, pct(n, rows.len())))
        .collect()
}

// ---------------------------------------------------------------------------
// Department breakdown of a flag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DeptFlagPct {
    pub department: String,
    /// "No" or "Yes".
    pub flag: &'static str,
    pub count: usize,
    /// Percentage within the department.
    pub pct: f64,
}

/// Within-department Yes/No percentages, ordered by department then flag
/// ("No" before "Yes"). Both flags are always reported.
fn dept_flag_pct(rows: &Rows, column: &str) -> Vec<DeptFlagPct> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for rec in rows {
        let Some(dept) = rec.text(schema::DEPARTMENT) else {
            continue;
        };
        let entry = groups.entry(dept).or_default();
        match rec.text(column) {
            Some(YES) => entry.1 += 1,
            Some(NO) => entry.0 += 1,
            _ => {}
        }
    }

    groups
        .into_iter()
        .flat_map(|(dept, (no, yes))| {
            let total = no + yes;
            [(NO, no), (YES, yes)].map(|(flag, count)| DeptFlagPct {
                department: dept.to_string(),
                flag,
                count,
                pct: pct(count, total),
            })
        })
        .collect()
}

pub fn dept_promo_pct(rows: &Rows) -> Vec<DeptFlagPct> {
    dept_flag_pct(rows, schema::TO_BE_PROMOTED)
}

pub fn dept_retrench_pct(rows: &Rows) -> Vec<DeptFlagPct> {
    dept_flag_pct(rows, schema::TO_BE_RETRENCHED)
}

// ---------------------------------------------------------------------------
// Generic group helpers used by the charts
// ---------------------------------------------------------------------------

/// Row count per value of `column`, sorted by value. Rows without the column
/// are counted under `Null`.
pub fn group_counts(rows: &Rows, column: &str) -> BTreeMap<CellValue, usize> {
    let mut counts = BTreeMap::new();
    for rec in rows {
        let key = rec.get(column).cloned().unwrap_or(CellValue::Null);
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Row count per (outer, inner) value pair, e.g. department × gender.
pub fn group_counts2(rows: &Rows, outer: &str, inner: &str) -> BTreeMap<(CellValue, CellValue), usize> {
    let mut counts = BTreeMap::new();
    for rec in rows {
        let a = rec.get(outer).cloned().unwrap_or(CellValue::Null);
        let b = rec.get(inner).cloned().unwrap_or(CellValue::Null);
        *counts.entry((a, b)).or_insert(0) += 1;
    }
    counts
}

/// Mean of a numeric column per group value.
pub fn group_mean(rows: &Rows, group: &str, value: &str) -> BTreeMap<CellValue, f64> {
    let mut groups: BTreeMap<CellValue, Vec<f64>> = BTreeMap::new();
    for rec in rows {
        if let (Some(key), Some(v)) = (rec.get(group), rec.number(value)) {
            groups.entry(key.clone()).or_default().push(v);
        }
    }
    groups.into_iter().map(|(k, vs)| (k, mean(&vs))).collect()
}

/// Five-number summary used by box plots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Linear-interpolation quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl BoxSummary {
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        values.retain(|v| !v.is_nan());
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Some(BoxSummary {
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[values.len() - 1],
        })
    }
}

pub fn box_summary(rows: &Rows, group: &str, value: &str) -> BTreeMap<CellValue, BoxSummary> {
    let mut groups: BTreeMap<CellValue, Vec<f64>> = BTreeMap::new();
    for rec in rows {
        if let (Some(key), Some(v)) = (rec.get(group), rec.number(value)) {
            groups.entry(key.clone()).or_default().push(v);
        }
    }
    groups
        .into_iter()
        .filter_map(|(k, vs)| BoxSummary::from_values(vs).map(|b| (k, b)))
        .collect()
}

/// Counts per `bin_width`-wide bin of a numeric column, keyed by bin start.
pub fn histogram(rows: &Rows, column: &str, bin_width: f64) -> BTreeMap<i64, usize> {
    let mut bins = BTreeMap::new();
    if bin_width <= 0.0 {
        return bins;
    }
    for v in rows.iter().filter_map(|r| r.number(column)) {
        let start = ((v / bin_width).floor() * bin_width) as i64;
        *bins.entry(start).or_insert(0) += 1;
    }
    bins
}

/// Percentage of rows in each work-experience bucket, in bucket order.
pub fn work_experience_distribution(rows: &Rows) -> Vec<(&'static str, f64)> {
    WORK_EXPERIENCE_LABELS
        .iter()
        .map(|&label| (label, pct(count_eq(rows, schema::WORK_EXPERIENCE, label), rows.len())))
        .collect()
}

// ---------------------------------------------------------------------------
// Attrition
// ---------------------------------------------------------------------------

/// Attrition within one group: head-count, leavers and their rate in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct AttritionRate {
    pub group: String,
    pub total: usize,
    pub attrited: usize,
    pub rate: f64,
}

impl AttritionRate {
    fn new(group: impl Into<String>, total: usize, attrited: usize) -> Self {
        AttritionRate {
            group: group.into(),
            total,
            attrited,
            rate: round2(pct(attrited, total)),
        }
    }
}

/// Company-wide attrition plus breakdowns by every dimension the attrition
/// tab charts.
#[derive(Debug, Clone, PartialEq)]
pub struct AttritionStats {
    pub company: AttritionRate,
    pub male: AttritionRate,
    pub female: AttritionRate,
    pub department: Vec<AttritionRate>,
    pub job_role: Vec<AttritionRate>,
    pub proximity: Vec<AttritionRate>,
    pub satisfaction: Vec<AttritionRate>,
    pub age: Vec<AttritionRate>,
    pub work_experience: Vec<AttritionRate>,
}

pub const PROXIMITY_BANDS: [(&str, f64); 4] = [
    ("Very Near (<=5)", 5.0),
    ("Near (6-10)", 10.0),
    ("Far (11-20)", 20.0),
    ("Very Far (>20)", f64::INFINITY),
];

pub const AGE_BANDS: [(&str, f64); 5] = [
    ("18-24", 24.0),
    ("25-34", 34.0),
    ("35-44", 44.0),
    ("45-54", 54.0),
    ("55+", f64::INFINITY),
];

pub const SATISFACTION_LEVELS: [(&str, i64); 4] =
    [("Low", 1), ("Medium", 2), ("High", 3), ("Very High", 4)];

fn band_of(bands: &[(&'static str, f64)], v: f64) -> Option<&'static str> {
    bands.iter().find(|&&(_, hi)| v <= hi).map(|&(label, _)| label)
}

fn satisfaction_label(v: f64) -> Option<&'static str> {
    SATISFACTION_LEVELS
        .iter()
        .find(|&&(_, level)| level as f64 == v)
        .map(|&(label, _)| label)
}

fn has_left(rec: &EmployeeRecord) -> bool {
    rec.text(schema::ATTRITION) == Some(YES)
}

/// Attrition per group with a fixed label order; every label is reported.
fn attrition_by_labels<F>(rows: &Rows, labels: &[&'static str], key: F) -> Vec<AttritionRate>
where
    F: Fn(&EmployeeRecord) -> Option<&'static str>,
{
    let mut tally: BTreeMap<&str, (usize, usize)> = labels.iter().map(|&l| (l, (0, 0))).collect();
    for rec in rows {
        if let Some(entry) = key(*rec).and_then(|l| tally.get_mut(l)) {
            entry.0 += 1;
            entry.1 += usize::from(has_left(*rec));
        }
    }
    labels
        .iter()
        .map(|&l| {
            let (total, left) = tally.get(l).copied().unwrap_or_default();
            AttritionRate::new(l, total, left)
        })
        .collect()
}

/// Attrition per observed value of a text column, sorted by value.
fn attrition_by_column(rows: &Rows, column: &str) -> Vec<AttritionRate> {
    let mut tally: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for rec in rows {
        if let Some(value) = rec.text(column) {
            let entry = tally.entry(value).or_default();
            entry.0 += 1;
            entry.1 += usize::from(has_left(rec));
        }
    }
    tally
        .into_iter()
        .map(|(group, (total, left))| AttritionRate::new(group, total, left))
        .collect()
}

pub fn attrition_stats(rows: &Rows) -> AttritionStats {
    let left = rows.iter().filter(|r| has_left(**r)).count();
    let gender = attrition_by_labels(rows, &[MALE, FEMALE], |r| match r.text(schema::GENDER) {
        Some(MALE) => Some(MALE),
        Some(FEMALE) => Some(FEMALE),
        _ => None,
    });
    let [male, female]: [AttritionRate; 2] = match gender.try_into() {
        Ok(pair) => pair,
        Err(_) => [AttritionRate::new(MALE, 0, 0), AttritionRate::new(FEMALE, 0, 0)],
    };

    let proximity_labels: Vec<_> = PROXIMITY_BANDS.iter().map(|&(l, _)| l).collect();
    let age_labels: Vec<_> = AGE_BANDS.iter().map(|&(l, _)| l).collect();
    let satisfaction_labels: Vec<_> = SATISFACTION_LEVELS.iter().map(|&(l, _)| l).collect();

    AttritionStats {
        company: AttritionRate::new("Company", rows.len(), left),
        male,
        female,
        department: attrition_by_column(rows, schema::DEPARTMENT),
        job_role: attrition_by_column(rows, schema::JOB_ROLE),
        proximity: attrition_by_labels(rows, &proximity_labels, |r| {
            r.number(schema::DISTANCE_FROM_HOME)
                .and_then(|v| band_of(&PROXIMITY_BANDS, v))
        }),
        satisfaction: attrition_by_labels(rows, &satisfaction_labels, |r| {
            r.number(schema::JOB_SATISFACTION).and_then(satisfaction_label)
        }),
        age: attrition_by_labels(rows, &age_labels, |r| {
            r.number(schema::AGE).and_then(|v| band_of(&AGE_BANDS, v))
        }),
        work_experience: attrition_by_labels(rows, &WORK_EXPERIENCE_LABELS, |r| {
            r.text(schema::WORK_EXPERIENCE)
                .and_then(|l| WORK_EXPERIENCE_LABELS.iter().copied().find(|&w| w == l))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, &str)]) -> EmployeeRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), crate::data::loader::guess_cell_type(v)))
            .collect()
    }

    fn people(n: usize, pairs: &[(&str, &str)]) -> Vec<EmployeeRecord> {
        (0..n).map(|_| rec(pairs)).collect()
    }

    #[test]
    fn test_gender_count_sixty_forty() {
        let mut all = people(60, &[("Gender", "Male")]);
        all.extend(people(40, &[("Gender", "Female")]));
        let rows: Vec<&EmployeeRecord> = all.iter().collect();

        let g = gender_count(&rows);
        assert_eq!(g.total, 100);
        assert_eq!(g.male, 60);
        assert_eq!(g.female, 40);
        assert_eq!(g.male_pct, 60.0);
        assert_eq!(g.female_pct, 40.0);
    }

    #[test]
    fn test_gender_count_missing_category_is_zero() {
        let all = people(3, &[("Gender", "Male")]);
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let g = gender_count(&rows);
        assert_eq!(g.female, 0);
        assert_eq!(g.female_pct, 0.0);
        assert_eq!(g.male_pct, 100.0);
    }

    #[test]
    fn test_empty_rows_give_zeroes() {
        let rows: Vec<&EmployeeRecord> = Vec::new();
        assert_eq!(gender_count(&rows), GenderCount::default());
        assert_eq!(promo_count(&rows), FlagCount::default());
        assert!(dept_stats(&rows).is_empty());
        assert!(pct_at_company(&rows).iter().all(|&(_, v)| v == 0.0));
        assert_eq!(attrition_stats(&rows).company.rate, 0.0);
    }

    #[test]
    fn test_promo_percentages_sum_to_hundred() {
        let mut all = people(7, &[("ToBePromoted", "Yes")]);
        all.extend(people(93, &[("ToBePromoted", "No")]));
        all.extend(people(3, &[("ToBePromoted", "No")]));
        let rows: Vec<&EmployeeRecord> = all.iter().collect();

        let p = promo_count(&rows);
        assert_eq!(p.yes, 7);
        assert_eq!(p.no, 96);
        assert!((p.yes_pct + p.no_pct - 100.0).abs() <= 0.011);
    }

    #[test]
    fn test_retrench_denominator_is_row_count() {
        let mut all = people(1, &[("ToBeRetrenched", "Yes")]);
        all.extend(people(3, &[("ToBeRetrenched", "No")]));
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let r = retrench_count(&rows);
        assert_eq!(r.yes_pct, 25.0);
        assert_eq!(r.no_pct, 75.0);
    }

    #[test]
    fn test_dept_promo_pct_sums_per_department() {
        let mut all = people(3, &[("Department", "Sales"), ("ToBePromoted", "Yes")]);
        all.extend(people(4, &[("Department", "Sales"), ("ToBePromoted", "No")]));
        all.extend(people(5, &[("Department", "Human Resources"), ("ToBePromoted", "No")]));
        let rows: Vec<&EmployeeRecord> = all.iter().collect();

        let out = dept_promo_pct(&rows);
        let order: Vec<(&str, &str)> = out.iter().map(|d| (d.department.as_str(), d.flag)).collect();
        assert_eq!(
            order,
            vec![
                ("Human Resources", "No"),
                ("Human Resources", "Yes"),
                ("Sales", "No"),
                ("Sales", "Yes"),
            ]
        );
        for pair in out.chunks(2) {
            assert!((pair[0].pct + pair[1].pct - 100.0).abs() <= 0.01);
        }
        assert_eq!(out[1].pct, 0.0);
    }

    #[test]
    fn test_pct_at_company_boundaries_go_low() {
        let all: Vec<_> = ["25", "25.5", "50", "75", "100", "120"]
            .iter()
            .map(|v| rec(&[("PctAtCompany", v)]))
            .collect();
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let buckets = pct_at_company(&rows);
        let shares: Vec<f64> = buckets.iter().map(|&(_, v)| round2(v)).collect();
        // 25 → first, 25.5 & 50 → second, 75 → third, 100 → fourth, 120 → none
        assert_eq!(shares, vec![16.67, 33.33, 16.67, 16.67]);
    }

    #[test]
    fn test_dept_stats_means_and_overtime() {
        let all = vec![
            rec(&[("Department", "Sales"), ("MonthlyIncome", "1000"), ("OverTime", "Yes")]),
            rec(&[("Department", "Sales"), ("MonthlyIncome", "2001"), ("OverTime", "No")]),
            rec(&[("Department", "HR"), ("MonthlyIncome", "500"), ("OverTime", "No")]),
        ];
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let stats = dept_stats(&rows);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].department, "HR");
        assert_eq!(stats[0].overtime, 0);
        assert_eq!(stats[1].monthly_income, 1500.5);
        assert_eq!(stats[1].overtime, 1);
    }

    #[test]
    fn test_box_summary_quartiles() {
        let b = BoxSummary::from_values(vec![5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!((b.min, b.q1, b.median, b.q3, b.max), (1.0, 2.0, 3.0, 4.0, 5.0));
        assert!(BoxSummary::from_values(Vec::new()).is_none());
    }

    #[test]
    fn test_histogram_bins() {
        let all: Vec<_> = ["18", "19", "23", "41"].iter().map(|v| rec(&[("Age", v)])).collect();
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let h = histogram(&rows, "Age", 5.0);
        assert_eq!(h.get(&15), Some(&2));
        assert_eq!(h.get(&20), Some(&1));
        assert_eq!(h.get(&40), Some(&1));
    }

    #[test]
    fn test_attrition_breakdowns() {
        let all = vec![
            rec(&[("Attrition", "Yes"), ("Gender", "Male"), ("Department", "Sales"), ("DistanceFromHome", "25"), ("JobSatisfaction", "1"), ("Age", "22")]),
            rec(&[("Attrition", "No"), ("Gender", "Male"), ("Department", "Sales"), ("DistanceFromHome", "3"), ("JobSatisfaction", "4"), ("Age", "40")]),
            rec(&[("Attrition", "No"), ("Gender", "Female"), ("Department", "HR"), ("DistanceFromHome", "8"), ("JobSatisfaction", "3"), ("Age", "58")]),
            rec(&[("Attrition", "Yes"), ("Gender", "Female"), ("Department", "HR"), ("DistanceFromHome", "30"), ("JobSatisfaction", "1"), ("Age", "30")]),
        ];
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let s = attrition_stats(&rows);

        assert_eq!(s.company.attrited, 2);
        assert_eq!(s.company.rate, 50.0);
        assert_eq!(s.male.rate, 50.0);
        assert_eq!(s.female.total, 2);
        assert_eq!(s.proximity[3].attrited, 2);
        assert_eq!(s.proximity[3].rate, 100.0);
        assert_eq!(s.satisfaction[0].group, "Low");
        assert_eq!(s.satisfaction[0].rate, 100.0);
        assert_eq!(s.satisfaction[1].total, 0);
        assert_eq!(s.age.iter().map(|a| a.total).sum::<usize>(), 4);
        assert_eq!(s.department.len(), 2);
        assert_eq!(s.work_experience.len(), 8);
    }
}
