//! Categorical fields of the rental dataset and their fixed label tables.
//!
//! Every coded field (season, month, weekday, weather situation, holiday) is
//! described by one [`CodeTable`] of `(code, variant, label)` entries. Lookup,
//! labelling and label parsing all go through that table, so day-level and
//! hour-level records are recoded by exactly the same rules.

use crate::error::ValidationError;

/// A closed set of values that render as fixed human-readable labels.
pub trait Labeled: Sized + Copy + PartialEq + 'static {
    /// Name of the field the value belongs to, used in error messages.
    const FIELD: &'static str;

    fn variants() -> &'static [Self];

    fn label(&self) -> &'static str;

    /// Parse a label, ignoring ASCII case.
    fn from_label(label: &str) -> Result<Self, ValidationError> {
        let wanted = label.trim();
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownLabel {
                field: Self::FIELD,
                label: label.to_string(),
            })
    }
}

/// A categorical field stored in the raw data as a small integer code.
pub trait Coded: Labeled {
    const TABLE: CodeTable<Self>;

    fn from_code(code: u8) -> Result<Self, ValidationError> {
        Self::TABLE.lookup(code)
    }

    fn code(&self) -> u8 {
        Self::TABLE.code_of(*self)
    }
}

/// Declarative mapping from raw codes to typed values and their labels.
#[derive(Debug, Clone, Copy)]
pub struct CodeTable<T: 'static> {
    pub field: &'static str,
    pub entries: &'static [(u8, T, &'static str)],
}

impl<T: Copy + PartialEq> CodeTable<T> {
    pub fn lookup(&self, code: u8) -> Result<T, ValidationError> {
        self.entries
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, value, _)| *value)
            .ok_or(ValidationError::UnknownCode {
                field: self.field,
                code,
            })
    }

    pub fn label_of(&self, value: T) -> &'static str {
        self.entries
            .iter()
            .find(|(_, v, _)| *v == value)
            .map(|(_, _, label)| *label)
            .unwrap_or("")
    }

    pub fn code_of(&self, value: T) -> u8 {
        self.entries
            .iter()
            .find(|(_, v, _)| *v == value)
            .map(|(code, _, _)| *code)
            .unwrap_or_default()
    }
}

/// Implements `Labeled` for a coded enum on top of its table.
macro_rules! coded_field {
    ($ty:ident, $field:literal, [$(($code:literal, $variant:ident, $label:literal)),+ $(,)?]) => {
        impl Labeled for $ty {
            const FIELD: &'static str = $field;

            fn variants() -> &'static [Self] {
                &[$($ty::$variant),+]
            }

            fn label(&self) -> &'static str {
                Self::TABLE.label_of(*self)
            }
        }

        impl Coded for $ty {
            const TABLE: CodeTable<Self> = CodeTable {
                field: $field,
                entries: &[$(($code, $ty::$variant, $label)),+],
            };
        }
    };
}

/// Display, `FromStr` and label-valued `Serialize` for any `Labeled` type.
macro_rules! label_impls {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    f.write_str($crate::models::categories::Labeled::label(self))
                }
            }

            impl ::std::str::FromStr for $ty {
                type Err = $crate::error::ValidationError;

                fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                    <Self as $crate::models::categories::Labeled>::from_label(s)
                }
            }

            impl ::serde::Serialize for $ty {
                fn serialize<S: ::serde::Serializer>(
                    &self,
                    serializer: S,
                ) -> ::std::result::Result<S::Ok, S::Error> {
                    serializer.serialize_str($crate::models::categories::Labeled::label(self))
                }
            }
        )+
    };
}

pub(crate) use label_impls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

coded_field!(Season, "season", [
    (1, Spring, "Spring"),
    (2, Summer, "Summer"),
    (3, Fall, "Fall"),
    (4, Winter, "Winter"),
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

coded_field!(Month, "month", [
    (1, Jan, "Jan"),
    (2, Feb, "Feb"),
    (3, Mar, "Mar"),
    (4, Apr, "Apr"),
    (5, May, "May"),
    (6, Jun, "Jun"),
    (7, Jul, "Jul"),
    (8, Aug, "Aug"),
    (9, Sep, "Sep"),
    (10, Oct, "Oct"),
    (11, Nov, "Nov"),
    (12, Dec, "Dec"),
]);

/// Day of the week; code 0 is Sunday as in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

coded_field!(Weekday, "weekday", [
    (0, Sunday, "Sunday"),
    (1, Monday, "Monday"),
    (2, Tuesday, "Tuesday"),
    (3, Wednesday, "Wednesday"),
    (4, Thursday, "Thursday"),
    (5, Friday, "Friday"),
    (6, Saturday, "Saturday"),
]);

impl Weekday {
    /// Calendar order used for reporting.
    pub const MONDAY_FIRST: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeatherSituation {
    Clear,
    MistyCloudy,
    LightRainSnow,
    HeavyRainSnow,
}

coded_field!(WeatherSituation, "weather", [
    (1, Clear, "Clear"),
    (2, MistyCloudy, "Misty/Cloudy"),
    (3, LightRainSnow, "Light Rain/Snow"),
    (4, HeavyRainSnow, "Heavy Rain/Snow"),
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Holiday {
    RegularDay,
    Holiday,
}

coded_field!(Holiday, "holiday", [
    (0, RegularDay, "Regular Day"),
    (1, Holiday, "Holiday"),
]);

label_impls!(Season, Month, Weekday, WeatherSituation, Holiday);
