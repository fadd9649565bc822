use bikeshare_processor::analyzers::{RecordFilter, RentalAnalyzer};
use bikeshare_processor::models::{Dataset, Granularity, RawDataset, RawRecord};
use bikeshare_processor::processors::{IntegrityChecker, Normalizer};
use bikeshare_processor::readers::RentalReader;
use chrono::{Datelike, Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Hourly records shaped like the two-year source data
fn create_hourly_records(days: usize) -> Vec<RawRecord> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
    let mut records = Vec::with_capacity(days * 24);

    for day in 0..days {
        let date = start + Duration::days(day as i64);
        let month = date.month() as u8;
        let season = (month - 1) / 3 + 1;
        let year = (date.year() - 2011) as u8;
        let weekday = date.weekday().num_days_from_sunday() as u8;

        for hour in 0..24u8 {
            let temperature = 0.2 + 0.6 * (month as f64 / 12.0);
            let humidity = 0.3 + 0.05 * (hour % 10) as f64;
            let casual = (hour as u32 * 3) % 50;
            let registered = 20 + (hour as u32 * 17) % 300;

            records.push(
                RawRecord::new(
                    date,
                    season,
                    year,
                    month,
                    0,
                    weekday,
                    1 + (day % 3) as u8,
                    temperature,
                    humidity,
                    casual,
                    registered,
                )
                .with_hour(hour)
                .with_instant((day * 24 + hour as usize + 1) as u32),
            );
        }
    }

    records
}

fn to_csv(records: &[RawRecord]) -> Vec<u8> {
    let mut out = String::from(
        "instant,dteday,season,yr,mnth,hr,holiday,weekday,weathersit,temp,hum,casual,registered,cnt\n",
    );
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            r.instant.unwrap_or_default(),
            r.date,
            r.season,
            r.year,
            r.month,
            r.hour.unwrap_or_default(),
            r.holiday,
            r.weekday,
            r.weather,
            r.temperature,
            r.humidity,
            r.casual,
            r.registered,
            r.total
        ));
    }
    out.into_bytes()
}

fn benchmark_normalize_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_by_size");

    for &days in &[30, 365, 731] {
        let records = create_hourly_records(days);

        group.bench_with_input(BenchmarkId::new("sequential", days), &records, |b, records| {
            let normalizer = Normalizer::new();
            b.iter(|| black_box(normalizer.normalize(records).map(|r| r.len()).unwrap_or(0)))
        });

        group.bench_with_input(BenchmarkId::new("parallel", days), &records, |b, records| {
            let normalizer = Normalizer::new().with_parallel(true);
            b.iter(|| black_box(normalizer.normalize(records).map(|r| r.len()).unwrap_or(0)))
        });
    }

    group.finish();
}

fn benchmark_csv_parsing(c: &mut Criterion) {
    let content = to_csv(&create_hourly_records(365));
    let reader = RentalReader::new(Granularity::Hourly);

    c.bench_function("parse_hourly_csv", |b| {
        b.iter(|| black_box(reader.read_from_slice(&content).map(|r| r.len()).unwrap_or(0)))
    });
}

fn benchmark_integrity_checker(c: &mut Criterion) {
    let raw = RawDataset::new(Vec::new(), create_hourly_records(731));

    c.bench_function("integrity_checker", |b| {
        b.iter(|| {
            let checker = IntegrityChecker::new();
            black_box(checker.check_dataset(&raw).valid_records)
        })
    });
}

fn benchmark_report(c: &mut Criterion) {
    let hour = Normalizer::new()
        .normalize(&create_hourly_records(731))
        .unwrap();
    let dataset = Dataset::new(Vec::new(), hour);
    let analyzer = RentalAnalyzer::new();

    c.bench_function("hourly_report", |b| {
        b.iter(|| {
            let report = analyzer.analyze(&dataset, &RecordFilter::new());
            black_box(report.heatmap.is_some())
        })
    });
}

criterion_group!(
    benches,
    benchmark_normalize_modes,
    benchmark_csv_parsing,
    benchmark_integrity_checker,
    benchmark_report
);
criterion_main!(benches);
