use crate::analyzers::RecordFilter;
use crate::models::{DayCategory, HumidityCategory, Month, Season, WeatherSituation, Weekday};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Descriptive statistics over one filtered view of the dataset.
///
/// Sections that have no data under the filter are `None` or empty.
#[derive(Debug, Clone, Serialize)]
pub struct RentalReport {
    pub filter: RecordFilter,
    pub overview: Option<Overview>,
    pub user_split: Option<UserSplit>,
    pub hourly: Option<HourlyTrend>,
    pub day_categories: Vec<GroupStats<DayCategory>>,
    pub seasons: Vec<GroupStats<Season>>,
    /// Sorted by mean rentals, highest first
    pub weather: Vec<GroupStats<WeatherSituation>>,
    pub humidity: Vec<GroupStats<HumidityCategory>>,
    pub daily_trend: Option<DailyTrend>,
    /// Monday first
    pub weekdays: Vec<GroupStats<Weekday>>,
    pub heatmap: Option<HourWeekdayHeatmap>,
    pub temperature_correlation: Option<TemperatureCorrelation>,
    pub year_over_year: Option<YearComparison>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_rentals: u64,
    pub days: usize,
    pub mean_per_day: f64,
    pub busiest_day: DayTotal,
    pub quietest_day: DayTotal,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSplit {
    pub registered: u64,
    pub casual: u64,
    pub registered_share: f64,
    pub casual_share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourTotal {
    pub hour: u8,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyTrend {
    pub totals: Vec<HourTotal>,
    pub peak: HourTotal,
}

/// Sum, record count and mean of total rentals for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupStats<K> {
    pub key: K,
    pub total: u64,
    pub count: usize,
    pub mean: f64,
}

impl<K> GroupStats<K> {
    pub fn new(key: K, total: u64, count: usize) -> Self {
        let mean = if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        };
        Self {
            key,
            total,
            count,
            mean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total: u64,
    pub moving_average: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub direction: TrendDirection,
    pub first_half_mean: f64,
    pub second_half_mean: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyTrend {
    pub points: Vec<DailyPoint>,
    /// `None` when there are too few days for a moving average
    pub window: Option<usize>,
    pub summary: Option<TrendSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusiestHour {
    pub weekday: Weekday,
    pub hour: u8,
    pub mean: f64,
}

/// Mean rentals per (hour, weekday) cell; rows follow `hours`, columns `weekdays`.
#[derive(Debug, Clone, Serialize)]
pub struct HourWeekdayHeatmap {
    pub hours: Vec<u8>,
    pub weekdays: Vec<Weekday>,
    pub cells: Vec<Vec<Option<f64>>>,
    pub busiest_hours: Vec<BusiestHour>,
}

impl HourWeekdayHeatmap {
    pub fn cell(&self, hour: u8, weekday: Weekday) -> Option<f64> {
        let row = self.hours.iter().position(|h| *h == hour)?;
        let col = self.weekdays.iter().position(|d| *d == weekday)?;
        self.cells[row][col]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    WeakPositive,
    WeakNegative,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> Self {
        if r > 0.5 {
            CorrelationStrength::StrongPositive
        } else if r > 0.3 {
            CorrelationStrength::ModeratePositive
        } else if r > 0.0 {
            CorrelationStrength::WeakPositive
        } else if r > -0.3 {
            CorrelationStrength::WeakNegative
        } else if r > -0.5 {
            CorrelationStrength::ModerateNegative
        } else {
            CorrelationStrength::StrongNegative
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CorrelationStrength::StrongPositive => "strong positive",
            CorrelationStrength::ModeratePositive => "moderate positive",
            CorrelationStrength::WeakPositive => "weak positive",
            CorrelationStrength::WeakNegative => "weak negative",
            CorrelationStrength::ModerateNegative => "moderate negative",
            CorrelationStrength::StrongNegative => "strong negative",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemperatureCorrelation {
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTotals {
    pub month: Month,
    /// One entry per year in `YearComparison::years`
    pub totals: Vec<Option<u64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearGrowth {
    pub from_year: u16,
    pub to_year: u16,
    pub rate_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearComparison {
    pub years: Vec<u16>,
    pub monthly: Vec<MonthlyTotals>,
    pub growth: Option<YearGrowth>,
}

impl RentalReport {
    pub fn empty(filter: RecordFilter) -> Self {
        Self {
            filter,
            overview: None,
            user_split: None,
            hourly: None,
            day_categories: Vec::new(),
            seasons: Vec::new(),
            weather: Vec::new(),
            humidity: Vec::new(),
            daily_trend: None,
            weekdays: Vec::new(),
            heatmap: None,
            temperature_correlation: None,
            year_over_year: None,
        }
    }

    pub fn top_season_by_total(&self) -> Option<&GroupStats<Season>> {
        top_by(&self.seasons, |g| g.total as f64)
    }

    pub fn top_season_by_mean(&self) -> Option<&GroupStats<Season>> {
        top_by(&self.seasons, |g| g.mean)
    }

    pub fn best_weather(&self) -> Option<&GroupStats<WeatherSituation>> {
        self.weather.first()
    }

    pub fn worst_weather(&self) -> Option<&GroupStats<WeatherSituation>> {
        self.weather.last()
    }

    pub fn best_humidity(&self) -> Option<&GroupStats<HumidityCategory>> {
        top_by(&self.humidity, |g| g.mean)
    }

    pub fn top_weekday(&self) -> Option<&GroupStats<Weekday>> {
        top_by(&self.weekdays, |g| g.mean)
    }

    pub fn bottom_weekday(&self) -> Option<&GroupStats<Weekday>> {
        crate::analyzers::stats::first_min_by(&self.weekdays, |g| g.mean).map(|i| &self.weekdays[i])
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Bike Rental Report ===\n");
        out.push_str(&format!("Filter: {}\n", self.filter.describe()));

        match &self.overview {
            Some(overview) => out.push_str(&format!(
                "Period: {} to {} ({} days)\n\
                Total rentals: {}\n\
                Mean per day: {:.0}\n\
                Busiest day: {} ({})\n\
                Quietest day: {} ({})\n",
                overview.first_date,
                overview.last_date,
                overview.days,
                overview.total_rentals,
                overview.mean_per_day,
                overview.busiest_day.date,
                overview.busiest_day.total,
                overview.quietest_day.date,
                overview.quietest_day.total
            )),
            None => out.push_str("No day records match the filter\n"),
        }

        if let Some(split) = &self.user_split {
            out.push_str(&format!(
                "Registered users: {} ({:.1}%), casual users: {} ({:.1}%)\n",
                split.registered,
                split.registered_share * 100.0,
                split.casual,
                split.casual_share * 100.0
            ));
        }

        if let Some(hourly) = &self.hourly {
            out.push_str(&format!(
                "\nPeak hour: {}:00 ({} rentals)\n",
                hourly.peak.hour, hourly.peak.total
            ));
        }

        if !self.day_categories.is_empty() {
            out.push_str("\nDay type:\n");
            for group in &self.day_categories {
                out.push_str(&format!(
                    "  - {}: total {}, mean {:.0} over {} days\n",
                    group.key, group.total, group.mean, group.count
                ));
            }
        }

        push_groups(&mut out, "Season", &self.seasons);
        if let (Some(total), Some(mean)) = (self.top_season_by_total(), self.top_season_by_mean()) {
            out.push_str(&format!(
                "  Highest total: {}, highest daily mean: {}\n",
                total.key, mean.key
            ));
        }

        push_groups(&mut out, "Weather (mean per day)", &self.weather);
        push_groups(&mut out, "Humidity (mean per day)", &self.humidity);
        push_groups(&mut out, "Weekday (mean per day)", &self.weekdays);
        if let (Some(top), Some(bottom)) = (self.top_weekday(), self.bottom_weekday()) {
            out.push_str(&format!("  Busiest: {}, quietest: {}\n", top.key, bottom.key));
        }

        if let Some(trend) = &self.daily_trend {
            if let Some(window) = trend.window {
                out.push_str(&format!("\nMoving average window: {} days\n", window));
            }
            if let Some(summary) = &trend.summary {
                let direction = match summary.direction {
                    TrendDirection::Increasing => "increasing",
                    TrendDirection::Decreasing => "decreasing",
                };
                out.push_str(&format!(
                    "Trend: {} by {:.1}% (first half mean {:.0}, second half mean {:.0})\n",
                    direction, summary.change_pct, summary.first_half_mean, summary.second_half_mean
                ));
            }
        }

        if let Some(heatmap) = &self.heatmap {
            out.push_str("\nBusiest hour per weekday:\n");
            for busiest in &heatmap.busiest_hours {
                out.push_str(&format!(
                    "  - {}: {}:00 (mean {:.0})\n",
                    busiest.weekday, busiest.hour, busiest.mean
                ));
            }
        }

        if let Some(correlation) = &self.temperature_correlation {
            out.push_str(&format!(
                "\nTemperature vs rentals: {} correlation (r = {:.2})\n",
                correlation.strength, correlation.coefficient
            ));
        }

        if let Some(yoy) = &self.year_over_year {
            if let Some(growth) = &yoy.growth {
                let direction = if growth.rate_pct > 0.0 { "growth" } else { "decline" };
                out.push_str(&format!(
                    "\nYear over year: {} of {:.1}% from {} to {}\n",
                    direction,
                    growth.rate_pct.abs(),
                    growth.from_year,
                    growth.to_year
                ));
            }
        }

        out
    }
}

fn top_by<K, F>(groups: &[GroupStats<K>], score: F) -> Option<&GroupStats<K>>
where
    F: Fn(&GroupStats<K>) -> f64,
{
    crate::analyzers::stats::first_max_by(groups, score).map(|i| &groups[i])
}

fn push_groups<K: fmt::Display>(out: &mut String, title: &str, groups: &[GroupStats<K>]) {
    if groups.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}:\n", title));
    for group in groups {
        out.push_str(&format!(
            "  - {}: mean {:.0}, total {}\n",
            group.key, group.mean, group.total
        ));
    }
}
