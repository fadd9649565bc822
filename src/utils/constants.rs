/// Default input file names
pub const DAY_FILE: &str = "day_df.csv";
pub const HOUR_FILE: &str = "hour_df.csv";

/// Optional settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "bikeshare";
pub const ENV_PREFIX: &str = "BIKESHARE";

/// Source temperatures were divided by this maximum (°C)
pub const TEMPERATURE_SCALE: f64 = 41.0;
pub const HUMIDITY_SCALE: f64 = 100.0;

/// Calendar year for year code 0
pub const BASE_YEAR: u16 = 2011;

/// Category thresholds, lower bound inclusive
pub const IDEAL_HUMIDITY_MIN_PERCENT: f64 = 45.0;
pub const HUMID_MIN_PERCENT: f64 = 65.0;
pub const COMFORTABLE_MIN_CELSIUS: f64 = 15.0;
pub const HOT_MIN_CELSIUS: f64 = 25.0;

/// Hour-of-day codes
pub const HOURS_PER_DAY: u8 = 24;

/// Analysis defaults
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 7;
pub const MIN_DAYS_FOR_TREND: usize = 10;

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
