//! Dataset cache - reuse a loaded dataset until its file changes.
//!
//! Entries are keyed by canonical path and remember the file's modification
//! time. A lookup re-reads storage only when that time differs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::load_file;
use super::model::HrDataset;
use crate::error::{DataError, DataResult};

struct CacheEntry {
    modified: SystemTime,
    dataset: Arc<HrDataset>,
}

/// In-memory cache of loaded datasets.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_and_mtime(path: &Path) -> DataResult<(PathBuf, SystemTime)> {
        let key = path.canonicalize().map_err(|e| DataError::load(path, e))?;
        let modified = std::fs::metadata(&key)
            .and_then(|m| m.modified())
            .map_err(|e| DataError::load(path, e))?;
        Ok((key, modified))
    }

    /// Return the cached dataset for `path`, loading it when absent or when
    /// the file was modified since it was cached. Failures are not cached.
    pub fn get_or_load(&mut self, path: &Path) -> DataResult<Arc<HrDataset>> {
        let (key, modified) = match Self::key_and_mtime(path) {
            Ok(found) => found,
            Err(e) => {
                self.invalidate(path);
                return Err(e);
            }
        };

        if let Some(entry) = self.entries.get(&key) {
            if entry.modified == modified {
                log::debug!("Cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::info!("{} changed on disk, reloading", key.display());
        }

        let dataset = Arc::new(load_file(&key)?);
        self.entries.insert(
            key,
            CacheEntry {
                modified,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Whether the cached copy of `path` is missing or out of date.
    pub fn is_stale(&self, path: &Path) -> bool {
        match Self::key_and_mtime(path) {
            Ok((key, modified)) => self
                .entries
                .get(&key)
                .map_or(true, |entry| entry.modified != modified),
            Err(_) => true,
        }
    }

    /// Drop the entry for `path`, if any.
    pub fn invalidate(&mut self, path: &Path) {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if self.entries.remove(&key).is_some() {
            log::debug!("Invalidated cache entry for {}", key.display());
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::{write_csv, HEADER, ROWS};
    use std::time::Duration;

    #[test]
    fn test_second_lookup_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", HEADER, ROWS);
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!cache.is_stale(&path));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_modified_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", HEADER, ROWS);
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();

        write_csv(&dir, "hr.csv", HEADER, &ROWS[..2]);
        let later = SystemTime::now() + Duration::from_secs(5);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert!(cache.is_stale(&path));
        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "hr.csv", HEADER, ROWS);
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();
        cache.invalidate(&path);
        assert_eq!(cache.len(), 0);
        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut cache = DatasetCache::new();
        assert!(cache.get_or_load(Path::new("/no/such/hr.csv")).is_err());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_clear_drops_everything() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_csv(&dir, "a.csv", HEADER, ROWS);
        let b = write_csv(&dir, "b.csv", HEADER, &ROWS[..3]);
        let mut cache = DatasetCache::new();
        cache.get_or_load(&a).unwrap();
        cache.get_or_load(&b).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_stale(&a));
    }
}
