use crate::models::Granularity;
use chrono::{Datelike, Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Default Parquet filename: `<output_dir>/bikeshare-{day|hour}-{YYMMDD}.parquet`
pub fn generate_default_output_filename(output_dir: &Path, granularity: Granularity) -> PathBuf {
    output_filename_for_date(output_dir, granularity, Local::now().date_naive())
}

fn output_filename_for_date(output_dir: &Path, granularity: Granularity, date: NaiveDate) -> PathBuf {
    let filename = format!(
        "bikeshare-{}-{:02}{:02}{:02}.parquet",
        granularity,
        date.year() % 100, // Last 2 digits of year
        date.month(),
        date.day()
    );
    output_dir.join(filename)
}
