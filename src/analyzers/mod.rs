pub mod filter;
pub mod rental_analyzer;
pub mod report;
pub mod stats;

pub use filter::RecordFilter;
pub use rental_analyzer::RentalAnalyzer;
pub use report::{
    CorrelationStrength, GroupStats, HourWeekdayHeatmap, RentalReport, TrendDirection,
};
