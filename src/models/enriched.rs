use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ValidationError;
use crate::models::categories::{Coded, Holiday, Month, Season, WeatherSituation, Weekday};
use crate::models::derived::{DayCategory, HumidityCategory, TemperatureCategory};
use crate::models::raw::RawRecord;
use crate::utils::constants::{BASE_YEAR, HOURS_PER_DAY, HUMIDITY_SCALE, TEMPERATURE_SCALE};

/// A raw record plus its labels and derived features.
///
/// The raw record is kept untouched in `raw`; every other field is a pure
/// function of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,

    #[serde(rename = "year_label")]
    pub year: u16,

    #[serde(rename = "season_label")]
    pub season: Season,

    #[serde(rename = "month_label")]
    pub month: Month,

    #[serde(rename = "weather_label")]
    pub weather: WeatherSituation,

    #[serde(rename = "weekday_label")]
    pub weekday: Weekday,

    #[serde(rename = "holiday_label")]
    pub holiday: Holiday,

    pub day_category: DayCategory,

    pub humidity_pct: f64,
    pub humidity_category: HumidityCategory,

    pub temperature_celsius: f64,
    pub temperature_category: TemperatureCategory,
}

impl EnrichedRecord {
    /// Validate and enrich a single record.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ValidationError> {
        let season = Season::from_code(raw.season)?;
        let month = Month::from_code(raw.month)?;
        let holiday = Holiday::from_code(raw.holiday)?;
        let weekday = Weekday::from_code(raw.weekday)?;
        let weather = WeatherSituation::from_code(raw.weather)?;

        check_hour(raw.hour)?;

        let temperature = unit_interval("temperature", raw.temperature)?;
        let humidity = unit_interval("humidity", raw.humidity)?;

        let temperature_celsius = temperature * TEMPERATURE_SCALE;
        let humidity_pct = humidity * HUMIDITY_SCALE;

        Ok(Self {
            raw: raw.clone(),
            year: BASE_YEAR + raw.year as u16,
            season,
            month,
            weather,
            weekday,
            holiday,
            day_category: DayCategory::from_weekday(weekday),
            humidity_pct,
            humidity_category: HumidityCategory::from_percent(humidity_pct),
            temperature_celsius,
            temperature_category: TemperatureCategory::from_celsius(temperature_celsius),
        })
    }

    /// Every validation failure of a record, one per offending field, in
    /// the order `from_raw` checks them. Empty when `from_raw` succeeds.
    pub fn violations(raw: &RawRecord) -> Vec<ValidationError> {
        [
            Season::from_code(raw.season).err(),
            Month::from_code(raw.month).err(),
            Holiday::from_code(raw.holiday).err(),
            Weekday::from_code(raw.weekday).err(),
            WeatherSituation::from_code(raw.weather).err(),
            check_hour(raw.hour).err(),
            unit_interval("temperature", raw.temperature).err(),
            unit_interval("humidity", raw.humidity).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn date(&self) -> NaiveDate {
        self.raw.date
    }

    pub fn hour(&self) -> Option<u8> {
        self.raw.hour
    }

    pub fn total(&self) -> u32 {
        self.raw.total
    }
}

fn check_hour(hour: Option<u8>) -> Result<(), ValidationError> {
    match hour {
        Some(code) if code >= HOURS_PER_DAY => Err(ValidationError::UnknownCode {
            field: "hour",
            code,
        }),
        _ => Ok(()),
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange { field, value });
    }
    Ok(value)
}
