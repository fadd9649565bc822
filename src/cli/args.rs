use crate::models::{DayCategory, Month, Season, WeatherSituation};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bikeshare-processor")]
#[command(about = "Normalize and analyze daily and hourly bike-sharing rental data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress spinners")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: bikeshare.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

/// Input file selection shared by every command that reads the CSV sources
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    #[arg(short, long, help = "Directory containing the rental CSV files")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Daily rentals CSV [default: <data-dir>/day_df.csv]")]
    pub day_file: Option<PathBuf>,

    #[arg(long, help = "Hourly rentals CSV [default: <data-dir>/hour_df.csv]")]
    pub hour_file: Option<PathBuf>,

    #[arg(long, help = "Read input files through a memory map")]
    pub mmap: bool,

    #[arg(long, help = "Normalize on a single thread")]
    pub sequential: bool,

    #[arg(long)]
    pub max_workers: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize both rental files and write them as Parquet
    Normalize {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, help = "Output directory [default: output]")]
        output_dir: Option<PathBuf>,

        #[arg(
            long,
            help = "Daily Parquet output [default: <output-dir>/bikeshare-day-{YYMMDD}.parquet]"
        )]
        day_output: Option<PathBuf>,

        #[arg(
            long,
            help = "Hourly Parquet output [default: <output-dir>/bikeshare-hour-{YYMMDD}.parquet]"
        )]
        hour_output: Option<PathBuf>,

        #[arg(short, long, help = "snappy, gzip, lz4, zstd or none")]
        compression: Option<String>,

        #[arg(long)]
        chunk_size: Option<usize>,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },

    /// Audit both rental files and list every invalid record
    Validate {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Write the integrity report as JSON")]
        json: Option<PathBuf>,
    },

    /// Print descriptive statistics for a filtered view of the data
    Report {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Calendar year, e.g. 2012")]
        year: Option<u16>,

        #[arg(long, help = "Spring, Summer, Fall or Winter")]
        season: Option<Season>,

        #[arg(long, help = "Weekday or Weekend")]
        day_type: Option<DayCategory>,

        #[arg(long, help = "Clear, Misty/Cloudy, Light Rain/Snow or Heavy Rain/Snow")]
        weather: Option<WeatherSituation>,

        #[arg(long, help = "Month label, e.g. Jan")]
        month: Option<Month>,

        #[arg(long, help = "Moving average window in days")]
        window: Option<usize>,

        #[arg(long, help = "Write the report as JSON")]
        json: Option<PathBuf>,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}
