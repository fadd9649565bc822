use crate::error::Result;
use crate::models::{Granularity, RawDataset, RawRecord};
use crate::readers::RentalReader;
use memmap2::Mmap;
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::info;

/// Reads the day-level and hour-level files concurrently.
pub struct DatasetReader {
    use_mmap: bool,
}

impl DatasetReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Parse both rental files on blocking worker threads
    pub async fn read_dataset(&self, day_path: &Path, hour_path: &Path) -> Result<RawDataset> {
        let day_handle = self.spawn_read(day_path.to_path_buf(), Granularity::Daily);
        let hour_handle = self.spawn_read(hour_path.to_path_buf(), Granularity::Hourly);

        let (day, hour) = tokio::try_join!(day_handle, hour_handle)?;
        let dataset = RawDataset::new(day?, hour?);

        info!(
            day_records = dataset.day.len(),
            hour_records = dataset.hour.len(),
            records = dataset.total_records(),
            "loaded rental dataset"
        );

        Ok(dataset)
    }

    /// Read the raw bytes of both files, for content-addressed caching
    pub async fn read_sources(&self, day_path: &Path, hour_path: &Path) -> Result<SourceFiles> {
        let (day, hour) = if self.use_mmap {
            let (day, hour) = tokio::try_join!(
                spawn_map(day_path.to_path_buf()),
                spawn_map(hour_path.to_path_buf())
            )?;
            (day?, hour?)
        } else {
            tokio::try_join!(tokio::fs::read(day_path), tokio::fs::read(hour_path))?
        };

        Ok(SourceFiles {
            day_path: day_path.to_path_buf(),
            hour_path: hour_path.to_path_buf(),
            day,
            hour,
        })
    }

    fn spawn_read(&self, path: PathBuf, granularity: Granularity) -> JoinHandle<Result<Vec<RawRecord>>> {
        let use_mmap = self.use_mmap;
        tokio::task::spawn_blocking(move || {
            RentalReader::new(granularity)
                .with_mmap(use_mmap)
                .read_records(&path)
        })
    }
}

fn spawn_map(path: PathBuf) -> JoinHandle<Result<Vec<u8>>> {
    tokio::task::spawn_blocking(move || {
        let file = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(mmap.to_vec())
    })
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Contents of both source files, held in memory
#[derive(Debug, Clone)]
pub struct SourceFiles {
    pub day_path: PathBuf,
    pub hour_path: PathBuf,
    pub day: Vec<u8>,
    pub hour: Vec<u8>,
}

impl SourceFiles {
    /// Hash of both file contents; a change to either file changes the key
    pub fn content_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.day.len().hash(&mut hasher);
        self.day.hash(&mut hasher);
        self.hour.len().hash(&mut hasher);
        self.hour.hash(&mut hasher);
        hasher.finish()
    }

    pub fn parse(&self) -> Result<RawDataset> {
        let day = RentalReader::new(Granularity::Daily).read_from_slice(&self.day)?;
        let hour = RentalReader::new(Granularity::Hourly).read_from_slice(&self.hour)?;
        Ok(RawDataset::new(day, hour))
    }
}
