//! Plain-language findings drawn from the current (filtered) rows.
//!
//! Each function returns the bullet lines of one "View insights..." panel.
//! Rates are judged against the configured [`RateTargets`].

use super::model::CellValue;
use super::schema;
use super::stats::{self, AttritionRate, AttritionStats, BoxSummary, DeptFlagPct, FlagCount, GenderCount, Rows};
use crate::config::RateTargets;

const NO_ROWS: &str = "No employees match the current filters.";

/// Gap between the two genders (in points) still counted as balanced.
const BALANCED_GAP: f64 = 20.0;

fn top_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    items.into_iter().max_by(|a, b| key(a).total_cmp(&key(b)))
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Executive summary
// ---------------------------------------------------------------------------

pub fn gender(g: &GenderCount) -> Vec<String> {
    if g.total == 0 {
        return vec![NO_ROWS.to_string()];
    }
    let gap = (g.male_pct - g.female_pct).abs();
    let split = format!(
        "{} employees: {:.2}% male and {:.2}% female.",
        g.total, g.male_pct, g.female_pct
    );
    let verdict = if gap == 0.0 {
        "The workforce is evenly balanced by gender.".to_string()
    } else {
        let fewer = if g.male < g.female { "male" } else { "female" };
        if gap <= BALANCED_GAP {
            format!("No vast disparity exists ({gap:.2} points); there is scope to hire more {fewer} employees.")
        } else {
            format!("The workforce is unbalanced ({gap:.2} points); hiring more {fewer} employees is advisable.")
        }
    };
    vec![split, verdict]
}

pub fn age_and_marital(rows: &Rows) -> Vec<String> {
    let ages: Vec<f64> = rows.iter().filter_map(|r| r.number(schema::AGE)).collect();
    let young = ages.iter().filter(|&&a| a < 30.0).count();
    let total = ages.len();
    let Some(b) = BoxSummary::from_values(ages) else {
        return vec![NO_ROWS.to_string()];
    };

    let mut out = vec![format!(
        "The median employee age is {:.0} yrs (min {:.0}, max {:.0}). 25% are below {:.0} yrs, \
         50% are between {:.0} and {:.0} yrs, the remaining 25% are above {:.0} yrs.",
        b.median, b.min, b.max, b.q1, b.q1, b.q3, b.q3
    )];
    out.push(format!(
        "{:.2}% of employees are younger than 30 yrs.",
        share(young, total)
    ));

    let by_gender: Vec<String> = stats::box_summary(rows, schema::GENDER, schema::AGE)
        .iter()
        .map(|(g, s)| format!("{g} {:.0} yrs (middle 50%: {:.0}-{:.0})", s.median, s.q1, s.q3))
        .collect();
    if !by_gender.is_empty() {
        out.push(format!("Median age by gender: {}.", by_gender.join(", ")));
    }

    let marital = stats::group_counts(rows, schema::MARITAL_STATUS);
    let mut shares: Vec<(&CellValue, usize)> = marital.iter().filter(|(k, _)| !k.is_null()).map(|(k, n)| (k, *n)).collect();
    shares.sort_by(|a, b| b.1.cmp(&a.1));
    if !shares.is_empty() {
        let parts: Vec<String> = shares
            .iter()
            .map(|(k, n)| format!("{k} {:.2}%", share(*n, rows.len())))
            .collect();
        out.push(format!("Marital status: {}.", parts.join(", ")));
    }
    out
}

pub fn departments(rows: &Rows) -> Vec<String> {
    if rows.is_empty() {
        return vec![NO_ROWS.to_string()];
    }
    let mut out = Vec::new();

    let counts = stats::group_counts(rows, schema::DEPARTMENT);
    if let Some((dept, n)) = top_by(counts.iter().filter(|(k, _)| !k.is_null()), |(_, n)| **n as f64) {
        out.push(format!(
            "{dept} is the largest department, employing {:.2}% of the workforce.",
            share(*n, rows.len())
        ));
    }

    let manager = stats::group_mean(rows, schema::DEPARTMENT, schema::YEARS_WITH_CURR_MANAGER);
    if let Some((dept, yrs)) = top_by(manager.iter(), |(_, v)| **v) {
        out.push(format!(
            "In {dept} employees stick to their manager longest ({yrs:.2} yrs on average)."
        ));
    }

    let dept_stats = stats::dept_stats(rows);
    if let Some(d) = top_by(dept_stats.iter(), |d| d.overtime as f64) {
        out.push(format!(
            "{} has the most employees doing overtime ({}).",
            d.department, d.overtime
        ));
    }
    if let Some(d) = top_by(dept_stats.iter(), |d| d.monthly_income) {
        out.push(format!(
            "{} is the best paymaster (average monthly income {:.2}).",
            d.department, d.monthly_income
        ));
    }
    out
}

pub fn experience(rows: &Rows) -> Vec<String> {
    if rows.is_empty() {
        return vec![NO_ROWS.to_string()];
    }
    let up_to_15 = rows
        .iter()
        .filter(|r| r.number(schema::TOTAL_WORKING_YEARS).is_some_and(|y| y <= 15.0))
        .count();
    let mut out = vec![format!(
        "{:.2}% of the workforce has 15 years of experience or less.",
        share(up_to_15, rows.len())
    )];
    if let Some((label, pct)) = stats::pct_at_company(rows).last() {
        out.push(format!(
            "{pct:.2}% of employees have spent {label} of their career at the company."
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Capacity planning
// ---------------------------------------------------------------------------

pub fn capacity(promo: &FlagCount, retrench: &FlagCount, targets: &RateTargets) -> Vec<String> {
    let promo_line = if promo.yes_pct < targets.min_promotion_pct {
        format!(
            "Promotion rate ({:.2}%) is short of the minimum target of {}%; corrective action is needed.",
            promo.yes_pct, targets.min_promotion_pct
        )
    } else {
        format!(
            "Promotion rate ({:.2}%) meets the minimum target of {}%.",
            promo.yes_pct, targets.min_promotion_pct
        )
    };
    let retrench_line = if retrench.yes_pct > targets.max_retrenchment_pct {
        format!(
            "Retrenchment rate ({:.2}%) exceeds the maximum of {}%; this is alarming.",
            retrench.yes_pct, targets.max_retrenchment_pct
        )
    } else {
        format!(
            "Retrenchment rate ({:.2}%) is within the maximum of {}%.",
            retrench.yes_pct, targets.max_retrenchment_pct
        )
    };
    vec![promo_line, retrench_line]
}

/// Departments whose "Yes" share falls on the wrong side of `limit`.
fn dept_outliers(rows: &[DeptFlagPct], off_target: impl Fn(f64) -> bool) -> Vec<String> {
    rows.iter()
        .filter(|r| r.flag == schema::YES && off_target(r.pct))
        .map(|r| format!("{} ({:.2}%)", r.department, r.pct))
        .collect()
}

pub fn dept_capacity(promo: &[DeptFlagPct], retrench: &[DeptFlagPct], targets: &RateTargets) -> Vec<String> {
    if promo.is_empty() && retrench.is_empty() {
        return vec![NO_ROWS.to_string()];
    }
    let min = targets.min_promotion_pct;
    let max = targets.max_retrenchment_pct;

    let short = dept_outliers(promo, |p| p < min);
    let promo_line = if short.is_empty() {
        format!("Every department meets the promotion target (min {min}%).")
    } else {
        format!("Below the promotion target (min {min}%): {}.", short.join(", "))
    };
    let over = dept_outliers(retrench, |p| p > max);
    let retrench_line = if over.is_empty() {
        format!("Every department is within the retrenchment target (max {max}%).")
    } else {
        format!("Above the retrenchment target (max {max}%): {}.", over.join(", "))
    };
    vec![promo_line, retrench_line]
}

// ---------------------------------------------------------------------------
// Attrition
// ---------------------------------------------------------------------------

fn highest(dimension: &str, groups: &[AttritionRate]) -> Option<String> {
    let top = top_by(groups.iter().filter(|g| g.total > 0), |g| g.rate)?;
    Some(format!(
        "Highest attrition by {dimension}: {} at {:.2}% ({} of {}).",
        top.group, top.rate, top.attrited, top.total
    ))
}

pub fn attrition(s: &AttritionStats, targets: &RateTargets) -> Vec<String> {
    if s.company.total == 0 {
        return vec![NO_ROWS.to_string()];
    }
    let max = targets.max_attrition_pct;
    let mut out = vec![if s.company.rate > max {
        format!(
            "Overall attrition rate is {:.2}%, above the stipulated maximum of {max}%; the company needs to act quickly.",
            s.company.rate
        )
    } else {
        format!(
            "Overall attrition rate is {:.2}%, within the stipulated maximum of {max}%.",
            s.company.rate
        )
    }];
    out.push(format!(
        "Male attrition {:.2}%, female attrition {:.2}%.",
        s.male.rate, s.female.rate
    ));
    let dimensions = [
        ("department", &s.department),
        ("job role", &s.job_role),
        ("distance from home", &s.proximity),
        ("job satisfaction", &s.satisfaction),
        ("age group", &s.age),
        ("work experience", &s.work_experience),
    ];
    out.extend(dimensions.iter().filter_map(|(dim, groups)| highest(dim, groups)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::guess_cell_type;
    use crate::data::model::EmployeeRecord;

    fn rec(pairs: &[(&str, &str)]) -> EmployeeRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), guess_cell_type(v)))
            .collect()
    }

    fn flag(department: &str, flag: &'static str, pct: f64) -> DeptFlagPct {
        DeptFlagPct {
            department: department.to_string(),
            flag,
            count: 0,
            pct,
        }
    }

    fn counts(yes_pct: f64) -> FlagCount {
        FlagCount {
            yes_pct,
            no_pct: 100.0 - yes_pct,
            ..FlagCount::default()
        }
    }

    #[test]
    fn test_capacity_judged_against_targets() {
        let targets = RateTargets::default();
        let lines = capacity(&counts(4.0), &counts(12.0), &targets);
        assert!(lines[0].contains("short of the minimum target of 10%"));
        assert!(lines[1].contains("exceeds the maximum of 5%"));

        let lines = capacity(&counts(10.0), &counts(5.0), &targets);
        assert!(lines[0].contains("meets"));
        assert!(lines[1].contains("within"));
    }

    #[test]
    fn test_dept_capacity_lists_off_target_departments() {
        let promo = [
            flag("HR", schema::NO, 95.0),
            flag("HR", schema::YES, 5.0),
            flag("Sales", schema::NO, 80.0),
            flag("Sales", schema::YES, 20.0),
        ];
        let retrench = [
            flag("HR", schema::NO, 90.0),
            flag("HR", schema::YES, 10.0),
            flag("Sales", schema::NO, 98.0),
            flag("Sales", schema::YES, 2.0),
        ];
        let lines = dept_capacity(&promo, &retrench, &RateTargets::default());
        assert_eq!(lines[0], "Below the promotion target (min 10%): HR (5.00%).");
        assert_eq!(lines[1], "Above the retrenchment target (max 5%): HR (10.00%).");
    }

    #[test]
    fn test_attrition_flags_rate_above_target_and_worst_groups() {
        let all = [
            rec(&[("Attrition", "Yes"), ("Department", "Sales"), ("Gender", "Male")]),
            rec(&[("Attrition", "No"), ("Department", "Sales"), ("Gender", "Female")]),
            rec(&[("Attrition", "No"), ("Department", "HR"), ("Gender", "Male")]),
            rec(&[("Attrition", "No"), ("Department", "HR"), ("Gender", "Female")]),
        ];
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let lines = attrition(&stats::attrition_stats(&rows), &RateTargets::default());
        assert!(lines[0].contains("25.00%"));
        assert!(lines[0].contains("above the stipulated maximum of 10%"));
        assert!(lines
            .iter()
            .any(|l| l == "Highest attrition by department: Sales at 50.00% (1 of 2)."));
    }

    #[test]
    fn test_departments_name_largest_and_best_paid() {
        let all = [
            rec(&[("Department", "R&D"), ("MonthlyIncome", "3000"), ("OverTime", "Yes"), ("YearsWithCurrManager", "2")]),
            rec(&[("Department", "R&D"), ("MonthlyIncome", "4000"), ("OverTime", "Yes"), ("YearsWithCurrManager", "3")]),
            rec(&[("Department", "Sales"), ("MonthlyIncome", "9000"), ("OverTime", "No"), ("YearsWithCurrManager", "8")]),
        ];
        let rows: Vec<&EmployeeRecord> = all.iter().collect();
        let lines = departments(&rows);
        assert_eq!(lines[0], "R&D is the largest department, employing 66.67% of the workforce.");
        assert!(lines[1].starts_with("In Sales employees stick to their manager longest"));
        assert!(lines[2].starts_with("R&D has the most employees doing overtime (2)"));
        assert!(lines[3].starts_with("Sales is the best paymaster"));
    }

    #[test]
    fn test_gender_balance() {
        let g = stats::GenderCount {
            total: 100,
            male: 60,
            female: 40,
            male_pct: 60.0,
            female_pct: 40.0,
        };
        let lines = gender(&g);
        assert!(lines[1].starts_with("No vast disparity"));
        assert!(lines[1].contains("more female employees"));
    }

    #[test]
    fn test_empty_rows_report_no_match() {
        let rows: Vec<&EmployeeRecord> = Vec::new();
        assert_eq!(age_and_marital(&rows), vec![NO_ROWS.to_string()]);
        assert_eq!(departments(&rows), vec![NO_ROWS.to_string()]);
        assert_eq!(experience(&rows), vec![NO_ROWS.to_string()]);
        assert_eq!(
            attrition(&stats::attrition_stats(&rows), &RateTargets::default()),
            vec![NO_ROWS.to_string()]
        );
        assert_eq!(gender(&GenderCount::default()), vec![NO_ROWS.to_string()]);
    }
}
