use crate::error::{ProcessingError, Result};
use crate::models::{Dataset, EnrichedRecord, Granularity, RawDataset, RawRecord};
use rayon::prelude::*;
use tracing::debug;

/// Turns raw records into enriched records.
///
/// Each record is enriched independently, so the parallel mode yields the
/// same output, in the same order, as the sequential one. The first invalid
/// record (by position) aborts the whole batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    parallel: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self { parallel: false }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Normalize a batch; each record's file is inferred from whether it carries an hour.
    pub fn normalize(&self, records: &[RawRecord]) -> Result<Vec<EnrichedRecord>> {
        self.normalize_with(records, RawRecord::granularity)
    }

    /// Normalize the records of one file; errors name that file.
    pub fn normalize_file(
        &self,
        file: Granularity,
        records: &[RawRecord],
    ) -> Result<Vec<EnrichedRecord>> {
        self.normalize_with(records, |_| file)
    }

    pub fn normalize_dataset(&self, raw: &RawDataset) -> Result<Dataset> {
        Ok(Dataset::new(
            self.normalize_file(Granularity::Daily, &raw.day)?,
            self.normalize_file(Granularity::Hourly, &raw.hour)?,
        ))
    }

    fn normalize_with<F>(&self, records: &[RawRecord], file_of: F) -> Result<Vec<EnrichedRecord>>
    where
        F: Fn(&RawRecord) -> Granularity + Sync,
    {
        let enrich = |(row, record): (usize, &RawRecord)| {
            EnrichedRecord::from_raw(record).map_err(|source| {
                ProcessingError::invalid_record(file_of(record), row, record.instant, source)
            })
        };

        let enriched = if self.parallel {
            records
                .par_iter()
                .enumerate()
                .map(enrich)
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Result<Vec<_>>>()?
        } else {
            records
                .iter()
                .enumerate()
                .map(enrich)
                .collect::<Result<Vec<_>>>()?
        };

        debug!(records = enriched.len(), parallel = self.parallel, "normalized records");
        Ok(enriched)
    }
}

/// Normalize a batch sequentially.
pub fn normalize(records: &[RawRecord]) -> Result<Vec<EnrichedRecord>> {
    Normalizer::new().normalize(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::{Duration, NaiveDate};

    fn sample_records(count: usize) -> Vec<RawRecord> {
        let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        (0..count)
            .map(|i| {
                RawRecord::new(
                    start + Duration::days(i as i64),
                    (i % 4) as u8 + 1,
                    (i % 2) as u8,
                    (i % 12) as u8 + 1,
                    (i % 2) as u8,
                    (i % 7) as u8,
                    (i % 4) as u8 + 1,
                    (i % 101) as f64 / 100.0,
                    ((i * 7) % 101) as f64 / 100.0,
                    i as u32,
                    2 * i as u32,
                )
                .with_instant(i as u32 + 1)
            })
            .collect()
    }

    #[test]
    fn test_preserves_length_and_order() -> Result<()> {
        let records = sample_records(50);
        let enriched = normalize(&records)?;

        assert_eq!(enriched.len(), records.len());
        for (input, output) in records.iter().zip(&enriched) {
            assert_eq!(&output.raw, input);
        }

        Ok(())
    }

    #[test]
    fn test_idempotent() -> Result<()> {
        let records = sample_records(30);

        assert_eq!(normalize(&records)?, normalize(&records)?);

        Ok(())
    }

    #[test]
    fn test_parallel_matches_sequential() -> Result<()> {
        let records = sample_records(500);

        let sequential = Normalizer::new().normalize(&records)?;
        let parallel = Normalizer::new().with_parallel(true).normalize(&records)?;

        assert_eq!(sequential, parallel);

        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<()> {
        assert!(normalize(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_first_invalid_record_aborts_batch() {
        let mut records = sample_records(20);
        records[12].weekday = 9;
        records[15].temperature = 1.5;

        for parallel in [false, true] {
            let err = Normalizer::new()
                .with_parallel(parallel)
                .normalize(&records)
                .unwrap_err();

            match err {
                ProcessingError::InvalidRecord {
                    file,
                    row,
                    instant,
                    source,
                } => {
                    assert_eq!(file, Granularity::Daily);
                    assert_eq!(row, 12);
                    assert_eq!(instant, Some(13));
                    assert_eq!(
                        source,
                        ValidationError::UnknownCode {
                            field: "weekday",
                            code: 9
                        }
                    );
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_normalize_dataset() -> Result<()> {
        let day = sample_records(3);
        let hour: Vec<RawRecord> = sample_records(2)
            .into_iter()
            .enumerate()
            .map(|(h, r)| r.with_hour(h as u8))
            .collect();

        let dataset = Normalizer::new().normalize_dataset(&RawDataset::new(day, hour))?;

        assert_eq!(dataset.day.len(), 3);
        assert_eq!(dataset.hour.len(), 2);
        assert_eq!(dataset.hour[1].hour(), Some(1));

        Ok(())
    }

    #[test]
    fn test_invalid_hour_row_names_hour_file() {
        let day = sample_records(2);
        let mut hour: Vec<RawRecord> = sample_records(2)
            .into_iter()
            .enumerate()
            .map(|(h, r)| r.with_hour(h as u8))
            .collect();
        hour[0].weekday = 9;

        for parallel in [false, true] {
            let err = Normalizer::new()
                .with_parallel(parallel)
                .normalize_dataset(&RawDataset::new(day.clone(), hour.clone()))
                .unwrap_err();

            assert!(err.to_string().starts_with("Invalid record in hour file at row 0"));
            match err {
                ProcessingError::InvalidRecord { file, row, .. } => {
                    assert_eq!(file, Granularity::Hourly);
                    assert_eq!(row, 0);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
