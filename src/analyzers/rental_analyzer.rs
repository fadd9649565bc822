use crate::analyzers::report::{
    BusiestHour, CorrelationStrength, DailyPoint, DailyTrend, DayTotal, GroupStats,
    HourTotal, HourWeekdayHeatmap, HourlyTrend, MonthlyTotals, Overview, RentalReport,
    TemperatureCorrelation, TrendDirection, TrendSummary, UserSplit, YearComparison, YearGrowth,
};
use crate::analyzers::stats::{
    first_max_by, first_min_by, group_totals, half_means, moving_average, pearson,
};
use crate::analyzers::RecordFilter;
use crate::models::{Dataset, EnrichedRecord, WeatherSituation, Weekday};
use crate::utils::constants::{DEFAULT_MOVING_AVERAGE_WINDOW, MIN_DAYS_FOR_TREND};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

type Records<'a> = [&'a EnrichedRecord];

/// Computes a [`RentalReport`] for a filtered view of a normalized dataset.
///
/// Day-level records feed the daily statistics, hour-level records the
/// hourly trend and the hour-by-weekday heatmap.
pub struct RentalAnalyzer {
    moving_average_window: usize,
}

impl RentalAnalyzer {
    pub fn new() -> Self {
        Self {
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
        }
    }

    pub fn with_moving_average_window(mut self, window: usize) -> Self {
        self.moving_average_window = window.max(1);
        self
    }

    pub fn analyze(&self, dataset: &Dataset, filter: &RecordFilter) -> RentalReport {
        let days = filter.apply(&dataset.day);
        let hours = filter.apply(&dataset.hour);

        debug!(
            filter = %filter.describe(),
            day_records = days.len(),
            hour_records = hours.len(),
            "analyzing filtered view"
        );

        let mut report = RentalReport::empty(*filter);

        report.hourly = self.hourly_trend(&hours);
        report.heatmap = self.hour_weekday_heatmap(&hours);

        if days.is_empty() {
            return report;
        }

        report.overview = self.overview(&days);
        report.user_split = Some(self.user_split(&days));
        report.day_categories = self.group_by(&days, |r| r.day_category);
        report.seasons = self.group_by(&days, |r| r.season);
        report.weather = self.weather_effect(&days);
        report.humidity = self.group_by(&days, |r| r.humidity_category);
        report.daily_trend = Some(self.daily_trend(&days));
        report.weekdays = self.weekday_pattern(&days);
        report.temperature_correlation = self.temperature_correlation(&days);
        report.year_over_year = self.year_over_year(&days);

        report
    }

    fn overview(&self, days: &Records) -> Option<Overview> {
        let busiest = &days[first_max_by(days, |r| r.total() as f64)?];
        let quietest = &days[first_min_by(days, |r| r.total() as f64)?];
        let total_rentals: u64 = days.iter().map(|r| r.total() as u64).sum();

        Some(Overview {
            total_rentals,
            days: days.len(),
            mean_per_day: total_rentals as f64 / days.len() as f64,
            busiest_day: DayTotal {
                date: busiest.date(),
                total: busiest.total() as u64,
            },
            quietest_day: DayTotal {
                date: quietest.date(),
                total: quietest.total() as u64,
            },
            first_date: days.iter().map(|r| r.date()).min()?,
            last_date: days.iter().map(|r| r.date()).max()?,
        })
    }

    fn user_split(&self, days: &Records) -> UserSplit {
        let registered: u64 = days.iter().map(|r| r.raw.registered as u64).sum();
        let casual: u64 = days.iter().map(|r| r.raw.casual as u64).sum();
        let users = registered + casual;
        let share = |n: u64| if users == 0 { 0.0 } else { n as f64 / users as f64 };

        UserSplit {
            registered,
            casual,
            registered_share: share(registered),
            casual_share: share(casual),
        }
    }

    fn hourly_trend(&self, hours: &Records) -> Option<HourlyTrend> {
        let totals: Vec<HourTotal> = group_totals(hours, |r| r.hour(), |r| r.total() as u64)
            .into_iter()
            .filter_map(|(hour, (total, _))| hour.map(|hour| HourTotal { hour, total }))
            .collect();

        let peak = totals[first_max_by(&totals, |h| h.total as f64)?];
        Some(HourlyTrend { totals, peak })
    }

    fn group_by<K, F>(&self, days: &Records, key: F) -> Vec<GroupStats<K>>
    where
        K: Ord,
        F: Fn(&EnrichedRecord) -> K,
    {
        group_totals(days, |r| key(*r), |r| r.total() as u64)
            .into_iter()
            .map(|(k, (total, count))| GroupStats::new(k, total, count))
            .collect()
    }

    fn weather_effect(&self, days: &Records) -> Vec<GroupStats<WeatherSituation>> {
        let mut groups = self.group_by(days, |r| r.weather);
        // stable: equal means keep table order
        groups.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        groups
    }

    fn weekday_pattern(&self, days: &Records) -> Vec<GroupStats<Weekday>> {
        let groups = group_totals(days, |r| r.weekday, |r| r.total() as u64);
        Weekday::MONDAY_FIRST
            .iter()
            .filter_map(|day| {
                groups
                    .get(day)
                    .map(|(total, count)| GroupStats::new(*day, *total, *count))
            })
            .collect()
    }

    fn daily_trend(&self, days: &Records) -> DailyTrend {
        let per_date = group_totals(days, |r| r.date(), |r| r.total() as u64);
        let totals: Vec<f64> = per_date.values().map(|(total, _)| *total as f64).collect();

        let window = self.moving_average_window.min(totals.len());
        let (window, averages) = if window > 1 {
            (Some(window), moving_average(&totals, window))
        } else {
            (None, vec![None; totals.len()])
        };

        let points = per_date
            .iter()
            .zip(averages)
            .map(|((date, (total, _)), moving_average)| DailyPoint {
                date: *date,
                total: *total,
                moving_average,
            })
            .collect();

        let summary = if totals.len() > MIN_DAYS_FOR_TREND {
            half_means(&totals).and_then(|(first, second)| {
                if first == 0.0 {
                    return None;
                }
                Some(TrendSummary {
                    direction: if second > first {
                        TrendDirection::Increasing
                    } else {
                        TrendDirection::Decreasing
                    },
                    first_half_mean: first,
                    second_half_mean: second,
                    change_pct: (second - first).abs() / first * 100.0,
                })
            })
        } else {
            None
        };

        DailyTrend {
            points,
            window,
            summary,
        }
    }

    fn hour_weekday_heatmap(&self, hours: &Records) -> Option<HourWeekdayHeatmap> {
        let groups = group_totals(
            hours,
            |r| (r.hour().unwrap_or_default(), r.weekday),
            |r| r.total() as u64,
        );
        if groups.is_empty() {
            return None;
        }

        let hour_set: BTreeSet<u8> = groups.keys().map(|(hour, _)| *hour).collect();
        let hours: Vec<u8> = hour_set.into_iter().collect();
        let weekdays = Weekday::MONDAY_FIRST.to_vec();

        let cells: Vec<Vec<Option<f64>>> = hours
            .iter()
            .map(|hour| {
                weekdays
                    .iter()
                    .map(|day| {
                        groups
                            .get(&(*hour, *day))
                            .map(|(total, count)| *total as f64 / *count as f64)
                    })
                    .collect()
            })
            .collect();

        let busiest_hours = weekdays
            .iter()
            .enumerate()
            .filter_map(|(col, day)| {
                let column: Vec<f64> = cells
                    .iter()
                    .map(|row| row[col].unwrap_or(f64::NEG_INFINITY))
                    .collect();
                let row = first_max_by(&column, |v| *v)?;
                cells[row][col].map(|mean| BusiestHour {
                    weekday: *day,
                    hour: hours[row],
                    mean,
                })
            })
            .collect();

        Some(HourWeekdayHeatmap {
            hours,
            weekdays,
            cells,
            busiest_hours,
        })
    }

    fn temperature_correlation(&self, days: &Records) -> Option<TemperatureCorrelation> {
        let temperatures: Vec<f64> = days.iter().map(|r| r.temperature_celsius).collect();
        let totals: Vec<f64> = days.iter().map(|r| r.total() as f64).collect();

        pearson(&temperatures, &totals).map(|coefficient| TemperatureCorrelation {
            coefficient,
            strength: CorrelationStrength::classify(coefficient),
        })
    }

    fn year_over_year(&self, days: &Records) -> Option<YearComparison> {
        let per_year = group_totals(days, |r| r.year, |r| r.total() as u64);
        if per_year.len() < 2 {
            return None;
        }

        let years: Vec<u16> = per_year.keys().copied().collect();
        let per_month = group_totals(days, |r| (r.month, r.year), |r| r.total() as u64);

        let mut by_month: BTreeMap<_, Vec<Option<u64>>> = BTreeMap::new();
        for ((month, year), (total, _)) in &per_month {
            let column = years.iter().position(|y| y == year)?;
            by_month.entry(*month).or_insert_with(|| vec![None; years.len()])[column] = Some(*total);
        }

        let monthly = by_month
            .into_iter()
            .map(|(month, totals)| MonthlyTotals { month, totals })
            .collect();

        let from = per_year.get(&years[0]).map(|(total, _)| *total)?;
        let to = per_year.get(&years[1]).map(|(total, _)| *total)?;
        let growth = (from > 0).then(|| YearGrowth {
            from_year: years[0],
            to_year: years[1],
            rate_pct: (to as f64 - from as f64) / from as f64 * 100.0,
        });

        Some(YearComparison {
            years,
            monthly,
            growth,
        })
    }
}

impl Default for RentalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
