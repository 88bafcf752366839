use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use anyhow::Context;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::cache::DatasetCache;
use crate::data::export::raw_csv_bytes;
use crate::data::filter::{apply, Constraint, FilterState};
use crate::data::model::{CellValue, EmployeeRecord, HrDataset};
use crate::data::schema;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Summary,
    Capacity,
    Attrition,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Summary, Tab::Capacity, Tab::Attrition];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Summary => "Executive Summary",
            Tab::Capacity => "Capacity Planning",
            Tab::Attrition => "Attrition",
        }
    }
}

/// The full session state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    cache: DatasetCache,

    /// File the dataset was loaded from.
    pub data_path: Option<PathBuf>,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<HrDataset>>,

    /// Per-field filter selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub active_tab: Tab,

    /// Colours per department, stable across filter changes.
    pub department_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    last_poll: Option<Instant>,

    /// Modification time of the data file when its last load failed.
    failed_mtime: Option<SystemTime>,
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            data_path: None,
            dataset: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            active_tab: Tab::default(),
            department_colors: None,
            status_message: None,
            last_poll: None,
            failed_mtime: None,
        }
    }

    /// Load (or fetch from cache) the dataset at `path` and make it current.
    /// Failures clear the dashboard and surface as the status message.
    pub fn open(&mut self, path: &Path) {
        // Only the current file stays cached.
        if self.data_path.as_deref().is_some_and(|p| p != path) {
            self.cache.clear();
        }
        self.data_path = Some(path.to_path_buf());
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} employees with columns {:?} ({} file(s) cached)",
                    dataset.len(),
                    dataset.column_names,
                    self.cache.len()
                );
                self.failed_mtime = None;
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.failed_mtime = file_mtime(path);
                self.dataset = None;
                self.visible_indices.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached copy and read the current file again.
    pub fn reload(&mut self) {
        if let Some(path) = self.data_path.clone() {
            self.cache.invalidate(&path);
            self.open(&path);
        }
    }

    /// Re-open the data file when it changed on disk. Checks at most once per
    /// `reload_poll_secs`; keeps the filter state when the dataset is unchanged.
    /// After a failed load the file is retried once its modification time
    /// moves on (or once it appears).
    pub fn poll_data_file(&mut self, now: Instant) {
        let interval = Duration::try_from_secs_f64(self.config.reload_poll_secs.max(0.0))
            .unwrap_or(Duration::MAX);
        if self.last_poll.is_some_and(|t| now.duration_since(t) < interval) {
            return;
        }
        self.last_poll = Some(now);

        let Some(path) = self.data_path.clone() else {
            return;
        };
        let changed = if self.dataset.is_some() {
            self.cache.is_stale(&path)
        } else {
            file_mtime(&path).is_some_and(|m| self.failed_mtime != Some(m))
        };
        if changed {
            self.open(&path);
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    /// A dataset identical to the current one keeps the user's filters.
    pub fn set_dataset(&mut self, dataset: Arc<HrDataset>) {
        if self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset))
        {
            return;
        }
        self.filters = FilterState::from_dataset(
            &dataset,
            &self.config.filters.categorical,
            &self.config.filters.numeric,
        );
        self.visible_indices = (0..dataset.len()).collect();
        self.department_colors = dataset
            .unique_values
            .get(schema::DEPARTMENT)
            .map(ColorMap::new);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change. An invalid filter
    /// keeps the previous rows and reports the problem.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match apply(ds, &self.filters) {
            Ok(indices) => {
                self.visible_indices = indices;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Filter rejected: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_constraint(&mut self, field: &str, constraint: Constraint) {
        if let Err(e) = self.filters.set_constraint(field, constraint) {
            self.status_message = Some(format!("Error: {e}"));
            return;
        }
        self.refilter();
    }

    pub fn toggle_filter_value(&mut self, field: &str, value: &CellValue) {
        if let Err(e) = self.filters.toggle_value(field, value) {
            self.status_message = Some(format!("Error: {e}"));
            return;
        }
        self.refilter();
    }

    /// Select every value of one field again.
    pub fn reset_filter(&mut self, field: &str) {
        if let Err(e) = self.filters.reset_field(field) {
            self.status_message = Some(format!("Error: {e}"));
            return;
        }
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
        self.refilter();
    }

    /// Records passing the current filters, in table order.
    pub fn visible_rows(&self) -> Vec<&EmployeeRecord> {
        match &self.dataset {
            Some(ds) => ds.select(&self.visible_indices),
            None => Vec::new(),
        }
    }

    /// Write the raw source file, re-read from disk, to `dest` as CSV.
    pub fn export_raw_csv(&self, dest: &Path) -> anyhow::Result<()> {
        let source = self.data_path.as_deref().context("no dataset loaded")?;
        let bytes = raw_csv_bytes(source)?;
        std::fs::write(dest, bytes).with_context(|| format!("writing {}", dest.display()))?;
        log::info!("Saved raw data to {}", dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::{write_csv, HEADER, ROWS};

    fn loaded(dir: &tempfile::TempDir) -> AppState {
        let path = write_csv(dir, "hr.csv", HEADER, ROWS);
        let mut state = AppState::new(AppConfig::default());
        state.open(&path);
        state
    }

    #[test]
    fn test_open_initialises_filters_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let state = loaded(&dir);
        assert!(state.status_message.is_none());
        assert_eq!(state.visible_indices.len(), ROWS.len());
        assert!(state.filters.fields().iter().any(|f| f == "Department"));
        assert!(!state.filters.is_constrained());
    }

    #[test]
    fn test_filter_then_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        state.set_constraint("Age", Constraint::Range { min: 30.0, max: 45.0 });
        assert_eq!(state.visible_rows().len(), 3);

        state.clear_filters();
        assert_eq!(state.visible_indices, (0..ROWS.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_range_keeps_rows_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        state.set_constraint("Age", Constraint::Range { min: 50.0, max: 20.0 });
        assert_eq!(state.visible_indices.len(), ROWS.len());
        assert!(state.status_message.as_deref().unwrap_or("").contains("Invalid range"));
    }

    #[test]
    fn test_load_failure_halts_dashboard() {
        let mut state = AppState::new(AppConfig::default());
        state.open(Path::new("/no/such/hr.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
        assert!(state.visible_rows().is_empty());
    }

    #[test]
    fn test_reload_resets_filters_for_new_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        state.toggle_filter_value("Gender", &CellValue::Text("Male".into()));
        assert!(state.filters.is_constrained());

        state.reload();
        assert!(!state.filters.is_constrained());
        assert_eq!(state.visible_indices.len(), ROWS.len());
    }

    #[test]
    fn test_export_ignores_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        state.set_constraint("Age", Constraint::Range { min: 30.0, max: 40.0 });
        let dest = dir.path().join("out.csv");
        state.export_raw_csv(&dest).unwrap();
        let text = std::fs::read_to_string(dest).unwrap();
        assert_eq!(text.lines().count(), ROWS.len() + 1);
    }

    #[test]
    fn test_opening_other_file_drops_previous_cache_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        let other = write_csv(&dir, "other.csv", HEADER, &ROWS[..2]);
        state.open(&other);
        assert_eq!(state.cache.len(), 1);
        assert_eq!(state.visible_indices.len(), 2);
    }

    fn touch(path: &Path, secs_ahead: u64) {
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(secs_ahead))
            .unwrap();
    }

    #[test]
    fn test_poll_recovers_after_broken_file_is_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        let path = state.data_path.clone().unwrap();
        let t0 = Instant::now();
        state.poll_data_file(t0);
        assert!(state.dataset.is_some());

        write_csv(&dir, "hr.csv", "Age,Attrition", &["41,Yes"]);
        touch(&path, 5);
        state.poll_data_file(t0 + Duration::from_secs(2));
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());

        // Unchanged broken file is not retried.
        state.poll_data_file(t0 + Duration::from_secs(4));
        assert!(state.dataset.is_none());

        write_csv(&dir, "hr.csv", HEADER, ROWS);
        touch(&path, 10);
        state.poll_data_file(t0 + Duration::from_secs(6));
        assert!(state.dataset.is_some());
        assert_eq!(state.visible_indices.len(), ROWS.len());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_poll_picks_up_file_created_after_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let mut state = AppState::new(AppConfig::default());
        state.open(&path);
        assert!(state.dataset.is_none());

        let t0 = Instant::now();
        state.poll_data_file(t0);
        assert!(state.dataset.is_none());

        write_csv(&dir, "late.csv", HEADER, ROWS);
        state.poll_data_file(t0 + Duration::from_secs(2));
        assert!(state.dataset.is_some());
    }

    #[test]
    fn test_poll_interval_respected_and_huge_interval_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = loaded(&dir);
        state.config.reload_poll_secs = 1e20;
        let t0 = Instant::now();
        state.poll_data_file(t0);
        state.poll_data_file(t0 + Duration::from_secs(3600));
        assert!(state.dataset.is_some());

        state.config.reload_poll_secs = f64::NAN;
        state.last_poll = None;
        state.poll_data_file(t0);
        assert!(state.dataset.is_some());
    }
}
