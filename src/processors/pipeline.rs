use crate::cache::{DatasetCache, DatasetKey};
use crate::error::{ProcessingError, Result};
use crate::models::{Dataset, RawDataset};
use crate::processors::{IntegrityChecker, IntegrityReport, Normalizer};
use crate::readers::{DatasetReader, SourceFiles};
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Load-and-normalize pipeline over the day and hour rental files.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    max_workers: usize,
    parallel: bool,
    use_mmap: bool,
}

impl Pipeline {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            parallel: true,
            use_mmap: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read both files and normalize them
    pub async fn load(
        &self,
        day_path: &Path,
        hour_path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<Dataset> {
        if let Some(p) = progress {
            p.set_message("Reading rental data...");
        }

        let reader = DatasetReader::new().with_mmap(self.use_mmap);
        let raw = reader.read_dataset(day_path, hour_path).await?;

        if let Some(p) = progress {
            p.set_message("Normalizing records...");
        }

        let pipeline = *self;
        let dataset = tokio::task::spawn_blocking(move || pipeline.normalize(&raw)).await??;

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Normalized {} records",
                dataset.total_records()
            ));
        }

        Ok(dataset)
    }

    /// Like `load`, but reuses a dataset already built from identical file contents
    pub async fn load_cached(
        &self,
        cache: &DatasetCache,
        day_path: &Path,
        hour_path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<Arc<Dataset>> {
        if let Some(p) = progress {
            p.set_message("Reading rental data...");
        }

        let sources = DatasetReader::new()
            .with_mmap(self.use_mmap)
            .read_sources(day_path, hour_path)
            .await?;

        // Parse and normalize off the async worker on a miss
        let (sources, built) = if cache.contains(DatasetKey(sources.content_key())) {
            (sources, None)
        } else {
            if let Some(p) = progress {
                p.set_message("Normalizing records...");
            }
            let pipeline = *self;
            tokio::task::spawn_blocking(move || -> Result<(SourceFiles, Option<Dataset>)> {
                let dataset = pipeline.normalize(&sources.parse()?)?;
                Ok((sources, Some(dataset)))
            })
            .await??
        };

        let dataset = cache.get_or_insert_with(&sources, |sources| match built {
            Some(dataset) => Ok(dataset),
            None => self.normalize(&sources.parse()?),
        })?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Loaded {} records", dataset.total_records()));
        }

        Ok(dataset)
    }

    /// Read both files and report every invalid record
    pub async fn audit(
        &self,
        day_path: &Path,
        hour_path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<IntegrityReport> {
        if let Some(p) = progress {
            p.set_message("Reading rental data...");
        }

        let reader = DatasetReader::new().with_mmap(self.use_mmap);
        let raw = reader.read_dataset(day_path, hour_path).await?;

        if let Some(p) = progress {
            p.set_message("Checking data integrity...");
        }

        let report = IntegrityChecker::new().check_dataset(&raw);

        if let Some(p) = progress {
            p.finish_with_message("Integrity check complete");
        }

        Ok(report)
    }

    fn normalize(&self, raw: &RawDataset) -> Result<Dataset> {
        let normalizer = Normalizer::new().with_parallel(self.parallel);

        let dataset = if self.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.max_workers)
                .build()
                .map_err(|e| ProcessingError::Config(e.to_string()))?;
            pool.install(|| normalizer.normalize_dataset(raw))?
        } else {
            normalizer.normalize_dataset(raw)?
        };

        info!(
            day_records = dataset.day.len(),
            hour_records = dataset.hour.len(),
            parallel = self.parallel,
            workers = self.max_workers,
            "normalized dataset"
        );

        Ok(dataset)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
