use crate::analyzers::{RecordFilter, RentalAnalyzer};
use crate::cache::DatasetCache;
use crate::cli::args::{Cli, Commands, InputArgs};
use crate::config::Settings;
use crate::error::{ProcessingError, Result};
use crate::models::{EnrichedRecord, Granularity};
use crate::processors::{IntegrityChecker, IntegrityReport, Pipeline};
use crate::utils::filename::generate_default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonReportWriter, ParquetWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize {
            input,
            output_dir,
            day_output,
            hour_output,
            compression,
            chunk_size,
            validate_only,
        } => {
            let (day_path, hour_path) = apply_input_overrides(&mut settings, &input);
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if let Some(compression) = compression {
                settings.compression = compression;
            }
            if let Some(size) = chunk_size {
                settings.chunk_size = size.max(1);
            }

            println!("Normalizing bike rental data...");
            println!("Daily file: {}", day_path.display());
            println!("Hourly file: {}", hour_path.display());
            println!(
                "Workers: {}, Chunk size: {}",
                settings.max_workers, settings.chunk_size
            );

            // Fail on a bad compression name before doing any work
            let writer = ParquetWriter::new().with_compression(&settings.compression)?;

            let progress = ProgressReporter::new_spinner("Loading rental data...", cli.quiet);
            let dataset = pipeline(&settings, &input)
                .load(&day_path, &hour_path, Some(&progress))
                .await?;

            if validate_only {
                println!(
                    "Validation complete - {} records normalized, no output file written",
                    dataset.total_records()
                );
                return Ok(());
            }

            std::fs::create_dir_all(&settings.output_dir)?;

            let day_output = day_output.unwrap_or_else(|| {
                generate_default_output_filename(&settings.output_dir, Granularity::Daily)
            });
            let hour_output = hour_output.unwrap_or_else(|| {
                generate_default_output_filename(&settings.output_dir, Granularity::Hourly)
            });

            write_parquet(&writer, &dataset.day, &day_output, settings.chunk_size)?;
            write_parquet(&writer, &dataset.hour, &hour_output, settings.chunk_size)?;

            println!("Normalization complete!");
        }

        Commands::Validate { input, json } => {
            let (day_path, hour_path) = apply_input_overrides(&mut settings, &input);

            println!("Validating bike rental data...");
            println!("Daily file: {}", day_path.display());
            println!("Hourly file: {}", hour_path.display());

            let progress = ProgressReporter::new_spinner("Validating data...", cli.quiet);
            let report = pipeline(&settings, &input)
                .audit(&day_path, &hour_path, Some(&progress))
                .await?;

            let checker = IntegrityChecker::new();
            println!("\n{}", checker.generate_summary(&report));

            if let Some(path) = json {
                JsonReportWriter::new().write(&report, &path)?;
                println!("Integrity report written to {}", path.display());
            }

            audit_outcome(&report)?;
        }

        Commands::Report {
            input,
            year,
            season,
            day_type,
            weather,
            month,
            window,
            json,
        } => {
            let (day_path, hour_path) = apply_input_overrides(&mut settings, &input);
            if let Some(window) = window {
                settings.moving_average_window = window.max(1);
            }

            let filter = RecordFilter {
                year,
                season,
                day_category: day_type,
                weather,
                month,
            };

            let cache = DatasetCache::new();
            let progress = ProgressReporter::new_spinner("Loading rental data...", cli.quiet);
            let dataset = pipeline(&settings, &input)
                .load_cached(&cache, &day_path, &hour_path, Some(&progress))
                .await?;

            let analyzer =
                RentalAnalyzer::new().with_moving_average_window(settings.moving_average_window);
            let report = analyzer.analyze(&dataset, &filter);

            info!(filter = %filter.describe(), "report computed");
            println!("\n{}", report.summary());

            if let Some(path) = json {
                JsonReportWriter::new().write(&report, &path)?;
                println!("Report written to {}", path.display());
            }
        }

        Commands::Info { file } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;

            println!("\n{}", file_info.summary());
        }
    }

    Ok(())
}

/// Apply the shared input flags on top of the loaded settings and resolve
/// the two input paths.
fn apply_input_overrides(settings: &mut Settings, input: &InputArgs) -> (PathBuf, PathBuf) {
    if let Some(ref dir) = input.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(workers) = input.max_workers {
        settings.max_workers = workers.max(1);
    }
    if input.sequential {
        settings.parallel = false;
    }

    let day_path = input.day_file.clone().unwrap_or_else(|| settings.day_path());
    let hour_path = input.hour_file.clone().unwrap_or_else(|| settings.hour_path());
    (day_path, hour_path)
}

/// Print the audit verdict; a dirty report fails the command.
fn audit_outcome(report: &IntegrityReport) -> Result<()> {
    if report.is_clean() {
        println!("✅ All records passed validation checks");
        return Ok(());
    }

    warn!(violations = report.violations.len(), "validation issues found");
    println!("⚠️  Found {} validation issues", report.violations.len());
    Err(ProcessingError::IntegrityFailed {
        violations: report.violations.len(),
        invalid_records: report.invalid_records,
        count_mismatches: report.count_mismatches,
    })
}

fn pipeline(settings: &Settings, input: &InputArgs) -> Pipeline {
    Pipeline::new(settings.max_workers)
        .with_parallel(settings.parallel)
        .with_mmap(input.mmap)
}

fn write_parquet(
    writer: &ParquetWriter,
    records: &[EnrichedRecord],
    path: &Path,
    chunk_size: usize,
) -> Result<()> {
    if records.is_empty() {
        println!("No records to write for {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    println!(
        "Writing {} records to {}...",
        records.len(),
        path.display()
    );
    writer.write_records_batched(records, path, chunk_size)?;

    let file_info = writer.get_file_info(path)?;
    println!("\n{}", file_info.summary());
    Ok(())
}
