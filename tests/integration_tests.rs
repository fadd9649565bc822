use bikeshare_processor::analyzers::{CorrelationStrength, RecordFilter, RentalAnalyzer, TrendDirection};
use bikeshare_processor::cache::DatasetCache;
use bikeshare_processor::models::{
    DayCategory, Granularity, HumidityCategory, Season, TemperatureCategory, WeatherSituation,
    Weekday,
};
use bikeshare_processor::processors::{Pipeline, ViolationType};
use bikeshare_processor::utils::generate_default_output_filename;
use bikeshare_processor::writers::{JsonReportWriter, ParquetWriter};
use bikeshare_processor::ProcessingError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const DAY_HEADER: &str =
    "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";
const HOUR_HEADER: &str =
    "instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt";

/// Fourteen January days starting Saturday 2011-01-01, rentals and
/// temperature both rising day by day.
fn day_csv() -> String {
    let mut lines = vec![DAY_HEADER.to_string()];
    for i in 0..14u32 {
        let weekday = (6 + i) % 7;
        let working = u32::from(weekday != 0 && weekday != 6);
        let casual = 10 * i + 5;
        let registered = 100 + 20 * i;
        lines.push(format!(
            "{},2011-01-{:02},1,0,1,0,{},{},{},{:.2},{:.2},0.5,0.1,{},{},{}",
            i + 1,
            i + 1,
            weekday,
            working,
            1 + i % 3,
            0.2 + 0.02 * i as f64,
            0.2 + 0.02 * i as f64,
            casual,
            registered,
            casual + registered
        ));
    }
    lines.join("\n") + "\n"
}

/// Two days of hourly rows with the busiest hour at 17:00.
fn hour_csv() -> String {
    let mut lines = vec![HOUR_HEADER.to_string()];
    let mut instant = 1;
    for (day, weekday) in [(1u32, 6u32), (2, 0)] {
        for hr in 0..24u32 {
            let registered = if hr == 17 { 200 } else { 10 + hr };
            lines.push(format!(
                "{},2011-01-{:02},1,0,1,{},0,{},0,1,0.24,0.2879,0.81,0.0,2,{},{}",
                instant,
                day,
                hr,
                weekday,
                registered,
                registered + 2
            ));
            instant += 1;
        }
    }
    lines.join("\n") + "\n"
}

struct Fixture {
    dir: TempDir,
    day: PathBuf,
    hour: PathBuf,
}

fn fixture(day: &str, hour: &str) -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let day_path = dir.path().join("day_df.csv");
    let hour_path = dir.path().join("hour_df.csv");
    fs::write(&day_path, day).unwrap();
    fs::write(&hour_path, hour).unwrap();
    Fixture {
        dir,
        day: day_path,
        hour: hour_path,
    }
}

#[tokio::test]
async fn test_normalize_and_write_parquet() {
    let fx = fixture(&day_csv(), &hour_csv());

    let dataset = Pipeline::new(2).load(&fx.day, &fx.hour, None).await.unwrap();
    assert_eq!(dataset.day.len(), 14);
    assert_eq!(dataset.hour.len(), 48);

    let first = &dataset.day[0];
    assert_eq!(first.year, 2011);
    assert_eq!(first.season, Season::Spring);
    assert_eq!(first.weekday, Weekday::Saturday);
    assert_eq!(first.day_category, DayCategory::Weekend);
    assert_eq!(first.weather, WeatherSituation::Clear);
    assert_eq!(first.humidity_category, HumidityCategory::Ideal);
    assert_eq!(first.temperature_category, TemperatureCategory::Cold);
    assert_eq!(first.raw.instant, Some(1));

    let output_dir = fx.dir.path().join("output");
    fs::create_dir_all(&output_dir).unwrap();
    let writer = ParquetWriter::new().with_compression("zstd").unwrap();

    let day_output = generate_default_output_filename(&output_dir, Granularity::Daily);
    let hour_output = generate_default_output_filename(&output_dir, Granularity::Hourly);
    writer
        .write_records_batched(&dataset.day, &day_output, 5)
        .unwrap();
    writer
        .write_records_batched(&dataset.hour, &hour_output, 10)
        .unwrap();

    let day_info = writer.get_file_info(&day_output).unwrap();
    let hour_info = writer.get_file_info(&hour_output).unwrap();
    assert_eq!(day_info.total_rows, 14);
    assert_eq!(hour_info.total_rows, 48);
    assert!(day_info.columns.contains(&"weekday_label".to_string()));
    assert!(day_info.columns.contains(&"humidity_category".to_string()));
}

#[tokio::test]
async fn test_invalid_record_aborts_load() {
    let broken = day_csv().replacen("2011-01-06,1,0,1,0,4,", "2011-01-06,1,0,1,0,7,", 1);
    let fx = fixture(&broken, &hour_csv());

    let err = Pipeline::new(2)
        .load(&fx.day, &fx.hour, None)
        .await
        .unwrap_err();

    match err {
        ProcessingError::InvalidRecord {
            file, row, instant, ..
        } => {
            assert_eq!(file, Granularity::Daily);
            assert_eq!(row, 5);
            assert_eq!(instant, Some(6));
        }
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[tokio::test]
async fn test_audit_lists_every_violation() {
    let broken_day = day_csv().replacen("2011-01-06,1,0,1,0,4,", "2011-01-06,1,0,1,0,7,", 1);
    let broken_hour = hour_csv().replacen(",2,15,17\n", ",2,15,18\n", 1);
    let fx = fixture(&broken_day, &broken_hour);

    let report = Pipeline::new(1)
        .audit(&fx.day, &fx.hour, None)
        .await
        .unwrap();

    assert_eq!(report.total_records, 62);
    assert_eq!(report.invalid_records, 1);
    assert_eq!(report.count_mismatches, 1);

    let kinds: Vec<ViolationType> = report.violations.iter().map(|v| v.violation_type).collect();
    assert_eq!(kinds, vec![ViolationType::UnknownCode, ViolationType::CountMismatch]);
    assert_eq!(report.violations[0].file, Granularity::Daily);
    assert_eq!(report.violations[1].file, Granularity::Hourly);
}

#[tokio::test]
async fn test_report_over_normalized_data() {
    let fx = fixture(&day_csv(), &hour_csv());
    let dataset = Pipeline::new(2).load(&fx.day, &fx.hour, None).await.unwrap();

    let report = RentalAnalyzer::new().analyze(&dataset, &RecordFilter::new());

    let overview = report.overview.as_ref().unwrap();
    assert_eq!(overview.days, 14);
    assert_eq!(overview.busiest_day.total, 135 + 360);
    assert_eq!(report.hourly.as_ref().unwrap().peak.hour, 17);
    assert_eq!(report.weekdays.len(), 7);
    assert_eq!(report.weekdays[0].key, Weekday::Monday);

    let trend = report.daily_trend.as_ref().unwrap();
    assert_eq!(trend.window, Some(7));
    assert_eq!(
        trend.summary.as_ref().unwrap().direction,
        TrendDirection::Increasing
    );

    let correlation = report.temperature_correlation.as_ref().unwrap();
    assert_eq!(correlation.strength, CorrelationStrength::StrongPositive);
    assert!(report.year_over_year.is_none());

    let weekend = RentalAnalyzer::new().analyze(
        &dataset,
        &RecordFilter::new().with_day_category(DayCategory::Weekend),
    );
    assert_eq!(weekend.overview.as_ref().unwrap().days, 4);

    let json_path = fx.dir.path().join("report.json");
    JsonReportWriter::new().write(&report, &json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["overview"]["days"], 14);
    assert_eq!(value["weekdays"][0]["key"], "Monday");
}

#[tokio::test]
async fn test_empty_filter_yields_empty_report() {
    let fx = fixture(&day_csv(), &hour_csv());
    let dataset = Pipeline::new(1).load(&fx.day, &fx.hour, None).await.unwrap();

    let report = RentalAnalyzer::new().analyze(&dataset, &RecordFilter::new().with_year(2012));

    assert!(report.overview.is_none());
    assert!(report.hourly.is_none());
    assert!(report.weekdays.is_empty());
    assert!(report.summary().starts_with("=== Bike Rental Report ==="));
}

#[tokio::test]
async fn test_cache_reuses_until_file_changes() {
    let fx = fixture(&day_csv(), &hour_csv());
    let cache = DatasetCache::new();
    let pipeline = Pipeline::new(2);

    let first = pipeline
        .load_cached(&cache, &fx.day, &fx.hour, None)
        .await
        .unwrap();
    let second = pipeline
        .load_cached(&cache, &fx.day, &fx.hour, None)
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    let shorter: String = hour_csv().lines().take(25).collect::<Vec<_>>().join("\n") + "\n";
    fs::write(&fx.hour, shorter).unwrap();

    let third = pipeline
        .load_cached(&cache, &fx.day, &fx.hour, None)
        .await
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.hour.len(), 24);
    assert_eq!(cache.len(), 1);
}
