use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::schema;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// App-wide settings. Every field has a default, so a config file only
/// needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_title: String,
    /// Dataset opened at start-up.
    pub data_file: PathBuf,
    /// Suggested file name for "Download As CSV".
    pub download_file_name: String,
    pub dark_mode: bool,
    pub filters: FilterFields,
    /// Seconds between checks of the data file's modification time.
    pub reload_poll_secs: f64,
    pub targets: RateTargets,
}

/// Company targets the capacity and attrition insights are judged against,
/// in percent of head-count.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateTargets {
    pub min_promotion_pct: f64,
    pub max_retrenchment_pct: f64,
    pub max_attrition_pct: f64,
}

impl Default for RateTargets {
    fn default() -> Self {
        Self {
            min_promotion_pct: 10.0,
            max_retrenchment_pct: 5.0,
            max_attrition_pct: 10.0,
        }
    }
}

/// Columns offered in the filter sidebar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterFields {
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_title: "Dashboard - Capacity Management".to_string(),
            data_file: PathBuf::from("input_data/raw_hr_data.csv"),
            download_file_name: "hr_data_downloaded.csv".to_string(),
            dark_mode: true,
            filters: FilterFields::default(),
            reload_poll_secs: 1.0,
            targets: RateTargets::default(),
        }
    }
}

impl Default for FilterFields {
    fn default() -> Self {
        let owned = |cols: &[&str]| -> Vec<String> { cols.iter().map(|c| c.to_string()).collect() };
        Self {
            categorical: owned(&[
                schema::DEPARTMENT,
                schema::JOB_ROLE,
                schema::GENDER,
                schema::MARITAL_STATUS,
                schema::ATTRITION,
                schema::OVER_TIME,
            ]),
            numeric: owned(&[
                schema::AGE,
                schema::TOTAL_WORKING_YEARS,
                schema::YEARS_AT_COMPANY,
                schema::MONTHLY_INCOME,
            ]),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Defaults, overlaid by `config` when given, then by an explicit data file.
    pub fn resolve(config: Option<&Path>, data_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut cfg = match config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(data) = data_file {
            cfg.data_file = data;
        }
        Ok(cfg)
    }
}
