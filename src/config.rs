use crate::error::Result;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DAY_FILE, DEFAULT_CHUNK_SIZE, DEFAULT_MOVING_AVERAGE_WINDOW, ENV_PREFIX,
    HOUR_FILE, SETTINGS_FILE,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Runtime settings: built-in defaults, then an optional settings file,
/// then `BIKESHARE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub data_dir: PathBuf,

    #[validate(length(min = 1))]
    pub day_file: String,

    #[validate(length(min = 1))]
    pub hour_file: String,

    pub output_dir: PathBuf,

    #[validate(length(min = 1))]
    pub compression: String,

    #[validate(range(min = 1))]
    pub chunk_size: usize,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    #[validate(range(min = 1))]
    pub moving_average_window: usize,

    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            day_file: DAY_FILE.to_string(),
            hour_file: HOUR_FILE.to_string(),
            output_dir: PathBuf::from("output"),
            compression: COMPRESSION_SNAPPY.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_workers: num_cpus::get(),
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
            parallel: true,
        }
    }
}

impl Settings {
    /// Load settings. Without an explicit path, `bikeshare.toml` (or any
    /// format `config` recognises) in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = Self::default();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(SETTINGS_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("day_file", defaults.day_file.as_str())?
            .set_default("hour_file", defaults.hour_file.as_str())?
            .set_default("output_dir", defaults.output_dir.to_string_lossy().to_string())?
            .set_default("compression", defaults.compression.as_str())?
            .set_default("chunk_size", defaults.chunk_size as i64)?
            .set_default("max_workers", defaults.max_workers as i64)?
            .set_default(
                "moving_average_window",
                defaults.moving_average_window as i64,
            )?
            .set_default("parallel", defaults.parallel)?
            .add_source(file)
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }

    pub fn day_path(&self) -> PathBuf {
        self.data_dir.join(&self.day_file)
    }

    pub fn hour_path(&self) -> PathBuf {
        self.data_dir.join(&self.hour_file)
    }
}
