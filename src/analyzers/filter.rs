use crate::models::{DayCategory, EnrichedRecord, Month, Season, WeatherSituation};
use serde::Serialize;

/// Equality filters over enriched records. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RecordFilter {
    pub year: Option<u16>,
    pub season: Option<Season>,
    pub day_category: Option<DayCategory>,
    pub weather: Option<WeatherSituation>,
    pub month: Option<Month>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_day_category(mut self, day_category: DayCategory) -> Self {
        self.day_category = Some(day_category);
        self
    }

    pub fn with_weather(mut self, weather: WeatherSituation) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        self.year.map_or(true, |y| record.year == y)
            && self.season.map_or(true, |s| record.season == s)
            && self.day_category.map_or(true, |d| record.day_category == d)
            && self.weather.map_or(true, |w| record.weather == w)
            && self.month.map_or(true, |m| record.month == m)
    }

    pub fn apply<'a>(&self, records: &'a [EnrichedRecord]) -> Vec<&'a EnrichedRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn describe(&self) -> String {
        if self.is_unfiltered() {
            return "all records".to_string();
        }

        let mut parts = Vec::new();
        if let Some(year) = self.year {
            parts.push(format!("year={}", year));
        }
        if let Some(season) = self.season {
            parts.push(format!("season={}", season));
        }
        if let Some(day_category) = self.day_category {
            parts.push(format!("day type={}", day_category));
        }
        if let Some(weather) = self.weather {
            parts.push(format!("weather={}", weather));
        }
        if let Some(month) = self.month {
            parts.push(format!("month={}", month));
        }
        parts.join(", ")
    }
}
