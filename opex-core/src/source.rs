//! JSON calendar ingestion.
//!
//! The calendar file groups events by section:
//!
//! ```json
//! {
//!   "year": 2026,
//!   "events": {
//!     "standard_expirations": [
//!       { "date": "2026-01-16", "day_of_week": "Friday", "notes": "Monthly expiration" }
//!     ],
//!     "exchange_holidays": [
//!       { "date": "2026-01-19", "name": "Martin Luther King Jr. Day" }
//!     ]
//!   }
//! }
//! ```
//!
//! Parsing is all-or-nothing: any bad value rejects the whole document.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::calendar::CalendarStore;
use crate::error::{OpexError, OpexResult};
use crate::event::{Category, Event};
use crate::tier::TierDefinitions;

#[derive(Debug, Deserialize)]
struct RawCalendar {
    year: Option<i32>,
    events: BTreeMap<String, Vec<RawEvent>>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    date: String,
    #[serde(default, alias = "note")]
    notes: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    day_of_week: Option<String>,
    #[serde(default)]
    last_trading_day: Option<String>,
    #[serde(default)]
    expiration_date: Option<String>,
    #[serde(default)]
    leaps_year: Option<i32>,
}

/// Read and validate a calendar file.
pub fn load_calendar(path: &Path, tiers: TierDefinitions) -> OpexResult<CalendarStore> {
    let content = std::fs::read_to_string(path)?;
    let store = parse_calendar(&content, tiers).map_err(|e| match e {
        OpexError::MalformedCalendar(msg) => {
            OpexError::MalformedCalendar(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    debug!(path = %path.display(), events = store.len(), "Loaded calendar");
    Ok(store)
}

/// Parse a calendar document.
pub fn parse_calendar(content: &str, tiers: TierDefinitions) -> OpexResult<CalendarStore> {
    let raw: RawCalendar = serde_json::from_str(content)
        .map_err(|e| OpexError::MalformedCalendar(format!("Invalid calendar JSON: {}", e)))?;

    let mut events = Vec::new();
    for (section, entries) in &raw.events {
        let category: Category = section.parse()?;
        for entry in entries {
            let event = convert_event(category, entry)?;
            if let Some(year) = raw.year {
                if event.date.year() != year {
                    return Err(OpexError::MalformedCalendar(format!(
                        "{} event on {} is outside calendar year {}",
                        category, event.date, year
                    )));
                }
            }
            events.push(event);
        }
    }

    Ok(CalendarStore::with_tiers(events, tiers)?.with_year(raw.year))
}

fn convert_event(category: Category, raw: &RawEvent) -> OpexResult<Event> {
    let date = parse_date(&raw.date, category)?;

    if let Some(stated) = raw.day_of_week.as_deref() {
        let matches = stated
            .split_whitespace()
            .next()
            .and_then(|w| w.parse::<Weekday>().ok())
            .is_some_and(|w| w == date.weekday());
        if !matches {
            warn!(%date, %category, stated, "Ignoring day_of_week that disagrees with date");
        }
    }

    Ok(Event {
        date,
        category,
        note: raw.notes.clone(),
        name: raw.name.clone(),
        last_trading_day: raw
            .last_trading_day
            .as_deref()
            .map(|s| parse_date(s, category))
            .transpose()?,
        expiration_date: raw
            .expiration_date
            .as_deref()
            .map(|s| parse_date(s, category))
            .transpose()?,
        leaps_year: raw.leaps_year,
    })
}

fn parse_date(s: &str, category: Category) -> OpexResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        OpexError::MalformedCalendar(format!(
            "Invalid date '{}' in {} events. Expected YYYY-MM-DD",
            s,
            category.section_key()
        ))
    })
}
