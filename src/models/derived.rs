use crate::models::categories::{label_impls, Labeled, Weekday};
use crate::utils::constants::{
    COMFORTABLE_MIN_CELSIUS, HOT_MIN_CELSIUS, HUMID_MIN_PERCENT, IDEAL_HUMIDITY_MIN_PERCENT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayCategory {
    Weekday,
    Weekend,
}

impl DayCategory {
    pub fn from_weekday(day: Weekday) -> Self {
        if day.is_weekend() {
            DayCategory::Weekend
        } else {
            DayCategory::Weekday
        }
    }
}

impl Labeled for DayCategory {
    const FIELD: &'static str = "day category";

    fn variants() -> &'static [Self] {
        &[DayCategory::Weekday, DayCategory::Weekend]
    }

    fn label(&self) -> &'static str {
        match self {
            DayCategory::Weekday => "Weekday",
            DayCategory::Weekend => "Weekend",
        }
    }
}

/// Humidity band on the 0-100 percentage scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HumidityCategory {
    Dry,
    Ideal,
    Humid,
}

impl HumidityCategory {
    pub fn from_percent(humidity_pct: f64) -> Self {
        if humidity_pct < IDEAL_HUMIDITY_MIN_PERCENT {
            HumidityCategory::Dry
        } else if humidity_pct < HUMID_MIN_PERCENT {
            HumidityCategory::Ideal
        } else {
            HumidityCategory::Humid
        }
    }
}

impl Labeled for HumidityCategory {
    const FIELD: &'static str = "humidity category";

    fn variants() -> &'static [Self] {
        &[
            HumidityCategory::Dry,
            HumidityCategory::Ideal,
            HumidityCategory::Humid,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            HumidityCategory::Dry => "Dry",
            HumidityCategory::Ideal => "Ideal",
            HumidityCategory::Humid => "Humid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemperatureCategory {
    Cold,
    Comfortable,
    Hot,
}

impl TemperatureCategory {
    pub fn from_celsius(celsius: f64) -> Self {
        if celsius < COMFORTABLE_MIN_CELSIUS {
            TemperatureCategory::Cold
        } else if celsius < HOT_MIN_CELSIUS {
            TemperatureCategory::Comfortable
        } else {
            TemperatureCategory::Hot
        }
    }
}

impl Labeled for TemperatureCategory {
    const FIELD: &'static str = "temperature category";

    fn variants() -> &'static [Self] {
        &[
            TemperatureCategory::Cold,
            TemperatureCategory::Comfortable,
            TemperatureCategory::Hot,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            TemperatureCategory::Cold => "Cold",
            TemperatureCategory::Comfortable => "Comfortable",
            TemperatureCategory::Hot => "Hot",
        }
    }
}

label_impls!(DayCategory, HumidityCategory, TemperatureCategory);
