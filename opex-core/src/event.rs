//! Calendar events and their categories.
//!
//! An [`Event`] is identified by its `(date, category)` pair. Everything else it
//! carries is descriptive detail copied from the calendar source and is only
//! used when rendering.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::OpexError;

/// Kind of calendar event.
///
/// Variant order is the canonical ordering used to break ties between events
/// that share a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Holiday,
    Standard,
    Vix,
    AmSettledLtd,
    QuarterEnd,
    LeapsAddition,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Holiday,
        Category::Standard,
        Category::Vix,
        Category::AmSettledLtd,
        Category::QuarterEnd,
        Category::LeapsAddition,
    ];

    /// Short machine name (`"am_settled_ltd"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Holiday => "holiday",
            Category::Standard => "standard",
            Category::Vix => "vix",
            Category::AmSettledLtd => "am_settled_ltd",
            Category::QuarterEnd => "quarter_end",
            Category::LeapsAddition => "leaps_addition",
        }
    }

    /// Section key used by the JSON calendar file.
    pub fn section_key(&self) -> &'static str {
        match self {
            Category::Holiday => "exchange_holidays",
            Category::Standard => "standard_expirations",
            Category::Vix => "vix_standard_expirations",
            Category::AmSettledLtd => "am_settled_last_trading_days",
            Category::QuarterEnd => "end_of_month_quarter",
            Category::LeapsAddition => "leaps_additions",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Holiday => "Exchange Holiday",
            Category::Standard => "Standard Expiration",
            Category::Vix => "VIX Expiration",
            Category::AmSettledLtd => "AM-Settled Last Trading Day",
            Category::QuarterEnd => "End of Quarter Expiration",
            Category::LeapsAddition => "LEAPS Addition",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = OpexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle || c.section_key() == needle)
            .ok_or_else(|| OpexError::MalformedCalendar(format!("Unknown event category '{}'", s)))
    }
}

/// A dated calendar event. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Holiday name ("Juneteenth")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Last trading day for VIX expirations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_trading_day: Option<NaiveDate>,
    /// Expiration the AM-settled last trading day leads into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    /// Expiry year of the LEAPS series being listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaps_year: Option<i32>,
}

impl Event {
    pub fn new(date: NaiveDate, category: Category) -> Self {
        Event {
            date,
            category,
            note: None,
            name: None,
            last_trading_day: None,
            expiration_date: None,
            leaps_year: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Identity of the event within a calendar.
    pub fn key(&self) -> (NaiveDate, Category) {
        (self.date, self.category)
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Title used in listings: the holiday name when there is one, otherwise the category label.
    pub fn title(&self) -> String {
        match (&self.category, &self.name) {
            (Category::Holiday, Some(name)) => name.clone(),
            _ => self.category.label().to_string(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.title())
    }
}
