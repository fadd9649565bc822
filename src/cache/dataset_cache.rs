use crate::error::Result;
use crate::models::Dataset;
use crate::readers::SourceFiles;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Identity of a normalized dataset: a hash of both source files' contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetKey(pub u64);

type SourcePair = (PathBuf, PathBuf);

#[derive(Default)]
struct CacheState {
    entries: HashMap<DatasetKey, Arc<Dataset>>,
    sources: HashMap<SourcePair, DatasetKey>,
}

/// Memoizes normalized datasets by source content.
///
/// Reloading the same file pair after either file changed evicts the entry
/// built from the previous contents.
#[derive(Default)]
pub struct DatasetCache {
    state: RwLock<CacheState>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for these contents or build and store it
    pub fn get_or_insert_with<F>(&self, sources: &SourceFiles, build: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce(&SourceFiles) -> Result<Dataset>,
    {
        let key = DatasetKey(sources.content_key());
        let pair = (sources.day_path.clone(), sources.hour_path.clone());

        if let Some(dataset) = self.lookup(key) {
            debug!(key = key.0, "dataset cache hit");
            self.write_state().sources.insert(pair, key);
            return Ok(dataset);
        }

        debug!(key = key.0, "dataset cache miss");
        let dataset = Arc::new(build(sources)?);

        let mut state = self.write_state();
        if let Some(previous) = state.sources.insert(pair, key) {
            if previous != key && !state.sources.values().any(|k| *k == previous) {
                debug!(key = previous.0, "evicting stale dataset");
                state.entries.remove(&previous);
            }
        }
        state.entries.insert(key, Arc::clone(&dataset));

        Ok(dataset)
    }

    pub fn get(&self, key: DatasetKey) -> Option<Arc<Dataset>> {
        self.lookup(key)
    }

    pub fn contains(&self, key: DatasetKey) -> bool {
        self.read_state().entries.contains_key(&key)
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&self, key: DatasetKey) -> bool {
        let mut state = self.write_state();
        state.sources.retain(|_, k| *k != key);
        state.entries.remove(&key).is_some()
    }

    pub fn clear(&self) {
        let mut state = self.write_state();
        state.entries.clear();
        state.sources.clear();
    }

    pub fn len(&self) -> usize {
        self.read_state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: DatasetKey) -> Option<Arc<Dataset>> {
        self.read_state().entries.get(&key).cloned()
    }

    // A panic while holding the lock leaves the maps consistent, so poisoning is ignored.
    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::processors::Normalizer;

    const DAY_CSV: &str = "\
dteday,season,yr,mnth,holiday,weekday,weathersit,temp,hum,casual,registered,cnt
2011-01-01,1,0,1,0,6,2,0.34,0.80,331,654,985
";

    const HOUR_CSV: &str = "\
dteday,season,yr,mnth,hr,holiday,weekday,weathersit,temp,hum,casual,registered,cnt
2011-01-01,1,0,1,0,0,6,1,0.24,0.81,3,13,16
";

    fn sources(day: &str) -> SourceFiles {
        SourceFiles {
            day_path: PathBuf::from("day.csv"),
            hour_path: PathBuf::from("hour.csv"),
            day: day.as_bytes().to_vec(),
            hour: HOUR_CSV.as_bytes().to_vec(),
        }
    }

    fn build(sources: &SourceFiles) -> Result<Dataset> {
        Normalizer::new().normalize_dataset(&sources.parse()?)
    }

    #[test]
    fn test_second_load_is_a_hit() -> Result<()> {
        let cache = DatasetCache::new();
        let src = sources(DAY_CSV);
        let mut builds = 0;

        let first = cache.get_or_insert_with(&src, |s| {
            builds += 1;
            build(s)
        })?;
        let second = cache.get_or_insert_with(&src, |s| {
            builds += 1;
            build(s)
        })?;

        assert_eq!(builds, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        Ok(())
    }

    #[test]
    fn test_changed_source_evicts_previous_entry() -> Result<()> {
        let cache = DatasetCache::new();
        let original = sources(DAY_CSV);
        let edited = sources(&DAY_CSV.replace(",985", ",986").replace(",654,", ",655,"));

        cache.get_or_insert_with(&original, build)?;
        let old_key = DatasetKey(original.content_key());
        assert!(cache.contains(old_key));

        let updated = cache.get_or_insert_with(&edited, build)?;

        assert!(!cache.contains(old_key));
        assert!(cache.contains(DatasetKey(edited.content_key())));
        assert_eq!(updated.day[0].total(), 986);
        assert_eq!(cache.len(), 1);

        Ok(())
    }

    #[test]
    fn test_build_error_is_not_cached() {
        let cache = DatasetCache::new();
        let src = sources(&DAY_CSV.replace(",6,2,", ",9,2,"));

        let result = cache.get_or_insert_with(&src, build);

        assert!(matches!(result, Err(ProcessingError::InvalidRecord { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() -> Result<()> {
        let cache = DatasetCache::new();
        let src = sources(DAY_CSV);
        let key = DatasetKey(src.content_key());

        cache.get_or_insert_with(&src, build)?;
        assert!(cache.get(key).is_some());
        assert!(cache.invalidate(key));
        assert!(!cache.invalidate(key));

        cache.get_or_insert_with(&src, build)?;
        cache.clear();
        assert!(cache.is_empty());

        Ok(())
    }
}
