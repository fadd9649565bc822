pub mod categories;
pub mod dataset;
pub mod derived;
pub mod enriched;
pub mod raw;

pub use categories::{
    CodeTable, Coded, Holiday, Labeled, Month, Season, WeatherSituation, Weekday,
};
pub use dataset::{Dataset, RawDataset};
pub use derived::{DayCategory, HumidityCategory, TemperatureCategory};
pub use enriched::EnrichedRecord;
pub use raw::{Granularity, RawRecord};
