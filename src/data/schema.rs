//! Column names of the employee table.

pub const AGE: &str = "Age";
pub const ATTRITION: &str = "Attrition";
pub const DEPARTMENT: &str = "Department";
pub const DISTANCE_FROM_HOME: &str = "DistanceFromHome";
pub const GENDER: &str = "Gender";
pub const JOB_ROLE: &str = "JobRole";
pub const JOB_SATISFACTION: &str = "JobSatisfaction";
pub const MARITAL_STATUS: &str = "MaritalStatus";
pub const MONTHLY_INCOME: &str = "MonthlyIncome";
pub const OVER_TIME: &str = "OverTime";
pub const PERCENT_SALARY_HIKE: &str = "PercentSalaryHike";
pub const PERFORMANCE_RATING: &str = "PerformanceRating";
pub const TOTAL_WORKING_YEARS: &str = "TotalWorkingYears";
pub const TRAINING_TIMES_LAST_YEAR: &str = "TrainingTimesLastYear";
pub const YEARS_AT_COMPANY: &str = "YearsAtCompany";
pub const YEARS_IN_CURRENT_ROLE: &str = "YearsInCurrentRole";
pub const YEARS_SINCE_LAST_PROMOTION: &str = "YearsSinceLastPromotion";
pub const YEARS_WITH_CURR_MANAGER: &str = "YearsWithCurrManager";

// Derived at load time.
pub const TO_BE_PROMOTED: &str = "ToBePromoted";
pub const TO_BE_RETRENCHED: &str = "ToBeRetrenched";
pub const WORK_EXPERIENCE: &str = "WorkExperience";
pub const PCT_AT_COMPANY: &str = "PctAtCompany";

pub const YES: &str = "Yes";
pub const NO: &str = "No";
pub const MALE: &str = "Male";
pub const FEMALE: &str = "Female";

/// Text columns that must be present.
pub const REQUIRED_TEXT: &[&str] = &[
    ATTRITION,
    DEPARTMENT,
    GENDER,
    JOB_ROLE,
    MARITAL_STATUS,
    OVER_TIME,
];

/// Numeric columns that must be present and hold numbers (or be empty).
pub const REQUIRED_NUMERIC: &[&str] = &[
    AGE,
    DISTANCE_FROM_HOME,
    JOB_SATISFACTION,
    MONTHLY_INCOME,
    PERCENT_SALARY_HIKE,
    PERFORMANCE_RATING,
    TOTAL_WORKING_YEARS,
    TRAINING_TIMES_LAST_YEAR,
    YEARS_AT_COMPANY,
    YEARS_IN_CURRENT_ROLE,
    YEARS_SINCE_LAST_PROMOTION,
    YEARS_WITH_CURR_MANAGER,
];

pub const DERIVED: &[&str] = &[TO_BE_PROMOTED, TO_BE_RETRENCHED, WORK_EXPERIENCE, PCT_AT_COMPANY];

/// Labels of the eight `WorkExperience` buckets, lowest first.
pub const WORK_EXPERIENCE_LABELS: [&str; 8] = [
    "5 Yrs", "10 Yrs", "15 Yrs", "20 Yrs", "25 Yrs", "30 Yrs", "35 Yrs", "40 Yrs",
];

/// Iterate over every required raw column.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    REQUIRED_TEXT.iter().chain(REQUIRED_NUMERIC.iter()).copied()
}
