use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregation level of a rental file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Daily,
    Hourly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => f.write_str("day"),
            Granularity::Hourly => f.write_str("hour"),
        }
    }
}

/// One row of the day-level or hour-level rental file, as coded in the source.
///
/// Column names follow the published dataset (`dteday`, `yr`, `mnth`, `hr`,
/// `weathersit`, `temp`, `hum`, `cnt`, ...); the readable names produced by
/// earlier cleaning steps (`year`, `month`, `hour`, `total_rentals`, ...) are
/// accepted as aliases. Unknown columns such as `workingday` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub instant: Option<u32>,

    #[serde(rename = "dteday", alias = "date")]
    pub date: NaiveDate,

    pub season: u8,

    #[serde(rename = "yr", alias = "year")]
    pub year: u8,

    #[serde(rename = "mnth", alias = "month")]
    pub month: u8,

    /// Present only in hour-level files.
    #[serde(rename = "hr", alias = "hour", default)]
    pub hour: Option<u8>,

    pub holiday: u8,

    #[serde(alias = "day_of_week")]
    pub weekday: u8,

    #[serde(rename = "weathersit", alias = "weather_situation")]
    pub weather: u8,

    /// Normalized temperature in [0, 1].
    #[serde(rename = "temp", alias = "temperature")]
    pub temperature: f64,

    #[serde(rename = "atemp", alias = "feeling_temperature", default)]
    pub feeling_temperature: Option<f64>,

    /// Normalized relative humidity in [0, 1].
    #[serde(rename = "hum", alias = "humidity")]
    pub humidity: f64,

    #[serde(rename = "windspeed", alias = "wind_speed", default)]
    pub wind_speed: Option<f64>,

    #[serde(alias = "casual_users")]
    pub casual: u32,

    #[serde(alias = "registered_users")]
    pub registered: u32,

    #[serde(rename = "cnt", alias = "total_rentals")]
    pub total: u32,
}

impl RawRecord {
    /// Day-level record with the pass-through fields left empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        season: u8,
        year: u8,
        month: u8,
        holiday: u8,
        weekday: u8,
        weather: u8,
        temperature: f64,
        humidity: f64,
        casual: u32,
        registered: u32,
    ) -> Self {
        Self {
            instant: None,
            date,
            season,
            year,
            month,
            hour: None,
            holiday,
            weekday,
            weather,
            temperature,
            feeling_temperature: None,
            humidity,
            wind_speed: None,
            casual,
            registered,
            total: casual + registered,
        }
    }

    pub fn with_hour(mut self, hour: u8) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn with_instant(mut self, instant: u32) -> Self {
        self.instant = Some(instant);
        self
    }

    pub fn granularity(&self) -> Granularity {
        if self.hour.is_some() {
            Granularity::Hourly
        } else {
            Granularity::Daily
        }
    }

    pub fn has_consistent_total(&self) -> bool {
        self.casual as u64 + self.registered as u64 == self.total as u64
    }
}
