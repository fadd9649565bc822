use crate::error::{ProcessingError, Result};
use crate::models::{EnrichedRecord, Labeled};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write enriched records to a Parquet file
    pub fn write_records(&self, records: &[EnrichedRecord], path: &Path) -> Result<()> {
        self.write_records_batched(records, path, records.len().max(1))
    }

    /// Write records in batches for memory efficiency
    pub fn write_records_batched(
        &self,
        records: &[EnrichedRecord],
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let schema = Self::schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in records.chunks(batch_size.max(1)) {
            let batch = Self::records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;

        info!(path = %path.display(), records = records.len(), "wrote parquet file");
        Ok(())
    }

    /// Arrow schema: raw columns followed by labels and derived features
    pub fn schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("instant", DataType::UInt32, true),
            Field::new("date", DataType::Date32, false),
            Field::new("hour", DataType::UInt8, true),
            Field::new("year", DataType::UInt16, false),
            Field::new("season", DataType::UInt8, false),
            Field::new("season_label", DataType::Utf8, false),
            Field::new("month", DataType::UInt8, false),
            Field::new("month_label", DataType::Utf8, false),
            Field::new("holiday", DataType::UInt8, false),
            Field::new("holiday_label", DataType::Utf8, false),
            Field::new("weekday", DataType::UInt8, false),
            Field::new("weekday_label", DataType::Utf8, false),
            Field::new("day_category", DataType::Utf8, false),
            Field::new("weather", DataType::UInt8, false),
            Field::new("weather_label", DataType::Utf8, false),
            Field::new("temperature", DataType::Float64, false),
            Field::new("temperature_celsius", DataType::Float64, false),
            Field::new("temperature_category", DataType::Utf8, false),
            Field::new("feeling_temperature", DataType::Float64, true),
            Field::new("humidity", DataType::Float64, false),
            Field::new("humidity_pct", DataType::Float64, false),
            Field::new("humidity_category", DataType::Utf8, false),
            Field::new("wind_speed", DataType::Float64, true),
            Field::new("casual", DataType::UInt32, false),
            Field::new("registered", DataType::UInt32, false),
            Field::new("total", DataType::UInt32, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(records: &[EnrichedRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        fn labels<T, F>(records: &[EnrichedRecord], field: F) -> ArrayRef
        where
            T: Labeled,
            F: Fn(&EnrichedRecord) -> T,
        {
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| field(r).label()),
            ))
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt32Array::from_iter(records.iter().map(|r| r.raw.instant))),
            Arc::new(Date32Array::from_iter_values(
                records.iter().map(|r| days_since_epoch(r.date())),
            )),
            Arc::new(UInt8Array::from_iter(records.iter().map(|r| r.raw.hour))),
            Arc::new(UInt16Array::from_iter_values(records.iter().map(|r| r.year))),
            Arc::new(UInt8Array::from_iter_values(records.iter().map(|r| r.raw.season))),
            labels(records, |r| r.season),
            Arc::new(UInt8Array::from_iter_values(records.iter().map(|r| r.raw.month))),
            labels(records, |r| r.month),
            Arc::new(UInt8Array::from_iter_values(records.iter().map(|r| r.raw.holiday))),
            labels(records, |r| r.holiday),
            Arc::new(UInt8Array::from_iter_values(records.iter().map(|r| r.raw.weekday))),
            labels(records, |r| r.weekday),
            labels(records, |r| r.day_category),
            Arc::new(UInt8Array::from_iter_values(records.iter().map(|r| r.raw.weather))),
            labels(records, |r| r.weather),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.raw.temperature),
            )),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.temperature_celsius),
            )),
            labels(records, |r| r.temperature_category),
            Arc::new(Float64Array::from_iter(
                records.iter().map(|r| r.raw.feeling_temperature),
            )),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.raw.humidity))),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.humidity_pct))),
            labels(records, |r| r.humidity_category),
            Arc::new(Float64Array::from_iter(records.iter().map(|r| r.raw.wind_speed))),
            Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.raw.casual))),
            Arc::new(UInt32Array::from_iter_values(
                records.iter().map(|r| r.raw.registered),
            )),
            Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.raw.total))),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            row_group_sizes.push(metadata.row_group(i).num_rows());
        }

        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            self.compression
        };

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
    pub columns: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}\n\
            - Columns ({}): {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
            self.total_rows as f64 / self.row_groups.max(1) as f64,
            self.columns.len(),
            self.columns.join(", ")
        )
    }
}
