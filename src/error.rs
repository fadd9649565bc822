use crate::models::Granularity;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Field-level domain violation found while normalizing a single record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} code {code} has no label")]
    UnknownCode { field: &'static str, code: u8 },

    #[error("{field} value {value} is outside [0, 1]")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{field} value is not a finite number")]
    NonFinite { field: &'static str },

    #[error("'{label}' is not a known {field} label")]
    UnknownLabel { field: &'static str, label: String },
}

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record in {file} file at row {row}{}: {source}", instant_suffix(.instant))]
    InvalidRecord {
        file: Granularity,
        row: usize,
        instant: Option<u32>,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Domain(#[from] ValidationError),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Integrity check failed: {violations} violations in {invalid_records} invalid records and {count_mismatches} count mismatches")]
    IntegrityFailed {
        violations: usize,
        invalid_records: usize,
        count_mismatches: usize,
    },

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

fn instant_suffix(instant: &Option<u32>) -> String {
    instant
        .map(|i| format!(" (instant {})", i))
        .unwrap_or_default()
}

impl ProcessingError {
    pub fn invalid_record(
        file: Granularity,
        row: usize,
        instant: Option<u32>,
        source: ValidationError,
    ) -> Self {
        ProcessingError::InvalidRecord {
            file,
            row,
            instant,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_message_names_row() {
        let err = ProcessingError::invalid_record(
            Granularity::Daily,
            4,
            Some(5),
            ValidationError::UnknownCode {
                field: "weekday",
                code: 9,
            },
        );

        assert_eq!(
            err.to_string(),
            "Invalid record in day file at row 4 (instant 5): weekday code 9 has no label"
        );
    }

    #[test]
    fn test_invalid_record_without_instant() {
        let err = ProcessingError::invalid_record(
            Granularity::Hourly,
            0,
            None,
            ValidationError::NonFinite { field: "humidity" },
        );

        assert_eq!(
            err.to_string(),
            "Invalid record in hour file at row 0: humidity value is not a finite number"
        );
    }
}
