use crate::error::{ProcessingError, Result};
use crate::models::{Granularity, RawRecord};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Reads one rental CSV file (day-level or hour-level) into raw records.
pub struct RentalReader {
    granularity: Granularity,
    use_mmap: bool,
}

impl RentalReader {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            use_mmap: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read all records from a CSV file
    pub fn read_records(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let records = if self.use_mmap {
            self.read_records_mmap(path)?
        } else {
            self.read_records_buffered(path)?
        };

        debug!(
            path = %path.display(),
            granularity = %self.granularity,
            records = records.len(),
            "read rental file"
        );

        Ok(records)
    }

    /// Parse records from CSV content already held in memory
    pub fn read_from_slice(&self, content: &[u8]) -> Result<Vec<RawRecord>> {
        self.parse(content)
    }

    fn read_records_buffered(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        self.parse(reader)
    }

    /// Read records using memory-mapped I/O for large files
    fn read_records_mmap(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        self.parse(&mmap[..])
    }

    fn parse<R: Read>(&self, source: R) -> Result<Vec<RawRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<RawRecord>().enumerate() {
            let record = result?;
            self.check_shape(row, &record)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Day files must not carry an hour, hour files must carry one on every row
    fn check_shape(&self, row: usize, record: &RawRecord) -> Result<()> {
        match (self.granularity, record.hour) {
            (Granularity::Hourly, None) => Err(ProcessingError::MissingData(format!(
                "hour file row {} has no hour value",
                row
            ))),
            (Granularity::Daily, Some(_)) => Err(ProcessingError::InvalidFormat(format!(
                "day file row {} has an hour value; is this an hour-level file?",
                row
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985
2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801
";

    const HOUR_CSV: &str = "\
instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.2879,0.81,0,3,13,16
2,2011-01-01,1,0,1,1,0,6,0,1,0.22,0.2727,0.8,0,8,32,40
";

    #[test]
    fn test_read_day_records() -> Result<()> {
        let reader = RentalReader::new(Granularity::Daily);
        let records = reader.read_from_slice(DAY_CSV.as_bytes())?;

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.instant, Some(1));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(first.weekday, 6);
        assert_eq!(first.weather, 2);
        assert_eq!(first.hour, None);
        assert!((first.temperature - 0.344167).abs() < 1e-9);
        assert_eq!(first.feeling_temperature, Some(0.363625));
        assert_eq!(first.total, 985);

        Ok(())
    }

    #[test]
    fn test_read_hour_records_from_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", HOUR_CSV)?;

        for use_mmap in [false, true] {
            let reader = RentalReader::new(Granularity::Hourly).with_mmap(use_mmap);
            let records = reader.read_records(temp_file.path())?;

            assert_eq!(records.len(), 2);
            assert_eq!(records[0].hour, Some(0));
            assert_eq!(records[1].hour, Some(1));
            assert_eq!(records[1].total, 40);
        }

        Ok(())
    }

    #[test]
    fn test_readable_column_aliases() -> Result<()> {
        let csv = "\
date,season,year,month,holiday,day_of_week,weather_situation,temperature,humidity,casual_users,registered_users,total_rentals
2012-06-01,2,1,6,0,5,1,0.7,0.55,900,4100,5000
";
        let records = RentalReader::new(Granularity::Daily).read_from_slice(csv.as_bytes())?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 1);
        assert_eq!(records[0].instant, None);
        assert_eq!(records[0].wind_speed, None);
        assert_eq!(records[0].registered, 4100);

        Ok(())
    }

    #[test]
    fn test_hour_file_requires_hour_column() {
        let reader = RentalReader::new(Granularity::Hourly);
        let result = reader.read_from_slice(DAY_CSV.as_bytes());

        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }

    #[test]
    fn test_day_reader_rejects_hour_file() {
        let reader = RentalReader::new(Granularity::Daily);
        let result = reader.read_from_slice(HOUR_CSV.as_bytes());

        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_number_is_csv_error() {
        let csv = "\
dteday,season,yr,mnth,holiday,weekday,weathersit,temp,hum,casual,registered,cnt
2011-01-01,1,0,1,0,6,2,warm,0.8,1,2,3
";
        let result = RentalReader::new(Granularity::Daily).read_from_slice(csv.as_bytes());

        assert!(matches!(result, Err(ProcessingError::Csv(_))));
    }
}
