use super::model::{CellValue, EmployeeRecord};
use super::schema::{self, NO, WORK_EXPERIENCE_LABELS, YES};

// ---------------------------------------------------------------------------
// Business flags
// ---------------------------------------------------------------------------

/// Promotion is due after ten years without one, for anyone rated above 2.
pub fn is_to_be_promoted(rec: &EmployeeRecord) -> bool {
    match (
        rec.number(schema::YEARS_SINCE_LAST_PROMOTION),
        rec.number(schema::PERFORMANCE_RATING),
    ) {
        (Some(since_promo), Some(rating)) => since_promo >= 10.0 && rating > 2.0,
        _ => false,
    }
}

/// Retrenchment candidates: long stagnation with a rating below 3, or a mid-length
/// stint with the lowest rating. Employees who already left or are due for
/// promotion are never flagged.
pub fn is_to_be_retrenched(rec: &EmployeeRecord, to_be_promoted: bool) -> bool {
    let (Some(in_role), Some(rating)) = (
        rec.number(schema::YEARS_IN_CURRENT_ROLE),
        rec.number(schema::PERFORMANCE_RATING),
    ) else {
        return false;
    };
    let stagnant = in_role >= 10.0 && rating < 3.0;
    let underperforming = in_role > 2.0 && in_role < 10.0 && rating == 1.0;
    let still_employed = rec.text(schema::ATTRITION) == Some(NO);

    (stagnant || underperforming) && still_employed && !to_be_promoted
}

/// Share of the career spent at this company, in percent. Zero when the
/// employee has no working years on record or the ratio is undefined.
pub fn pct_at_company(rec: &EmployeeRecord) -> f64 {
    let pct = match (
        rec.number(schema::YEARS_AT_COMPANY),
        rec.number(schema::TOTAL_WORKING_YEARS),
    ) {
        (Some(at_company), Some(total)) if total != 0.0 => at_company / total * 100.0,
        _ => 0.0,
    };
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Work experience buckets
// ---------------------------------------------------------------------------

/// Eight equal-width, right-inclusive intervals over the observed
/// `[min, max]` of total working years. The minimum lands in the first bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceBins {
    min: f64,
    max: f64,
}

impl ExperienceBins {
    pub const COUNT: usize = WORK_EXPERIENCE_LABELS.len();

    pub fn new(min: f64, max: f64) -> Self {
        ExperienceBins { min, max }
    }

    /// Build the bins from the observed total working years of `records`.
    pub fn observe(records: &[EmployeeRecord]) -> Option<Self> {
        records
            .iter()
            .filter_map(|r| r.number(schema::TOTAL_WORKING_YEARS))
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .map(|(lo, hi)| ExperienceBins::new(lo, hi))
    }

    /// Upper edge of bucket `i` (0-based); the last edge is exactly `max`.
    fn upper_edge(&self, i: usize) -> f64 {
        if i + 1 == Self::COUNT {
            self.max
        } else {
            self.min + (self.max - self.min) * (i + 1) as f64 / Self::COUNT as f64
        }
    }

    /// Bucket index of `years`, `None` when outside the observed domain.
    pub fn index_of(&self, years: f64) -> Option<usize> {
        if years.is_nan() || years < self.min || years > self.max {
            return None;
        }
        if self.max == self.min {
            return Some(0);
        }
        (0..Self::COUNT).find(|&i| years <= self.upper_edge(i))
    }

    pub fn label_of(&self, years: f64) -> Option<&'static str> {
        self.index_of(years).map(|i| WORK_EXPERIENCE_LABELS[i])
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Append the derived columns to every record. Returns their names in the
/// order they were added.
pub fn derive_columns(records: &mut [EmployeeRecord]) -> Vec<String> {
    let bins = ExperienceBins::observe(records);

    for rec in records.iter_mut() {
        let promote = is_to_be_promoted(rec);
        let retrench = is_to_be_retrenched(rec, promote);
        let experience = rec
            .number(schema::TOTAL_WORKING_YEARS)
            .and_then(|years| bins.and_then(|b| b.label_of(years)))
            .map(|label| CellValue::Text(label.to_string()))
            .unwrap_or(CellValue::Null);
        let pct = pct_at_company(rec);

        rec.set(schema::TO_BE_PROMOTED, yes_no(promote));
        rec.set(schema::TO_BE_RETRENCHED, yes_no(retrench));
        rec.set(schema::WORK_EXPERIENCE, experience);
        rec.set(schema::PCT_AT_COMPANY, CellValue::Float(pct));
    }

    log::debug!("Derived columns for {} records ({bins:?})", records.len());
    schema::DERIVED.iter().map(|c| c.to_string()).collect()
}

fn yes_no(flag: bool) -> CellValue {
    CellValue::Text(if flag { YES } else { NO }.to_string())
}
