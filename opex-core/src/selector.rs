//! Alert selection.
//!
//! Given a reference date, an alert kind and a tier, decide which calendar
//! events qualify for a notification. Selection is a pure function of its
//! inputs: it never reads the clock and keeps no state between calls.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::business_day::adjust_for_weekend;
use crate::calendar::CalendarStore;
use crate::error::{OpexError, OpexResult};
use crate::event::Event;
use crate::tier::Tier;

/// Largest supported day-offset for D-N reminders.
pub const MAX_DAYS_AHEAD: u32 = 3;

/// Which alert is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// D-N reminder; `DaysAhead(0)` is the day-of alert.
    DaysAhead(u32),
    /// Preview of the coming week.
    Weekly,
    /// One sample event per category, independent of the reference date.
    Test,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::DaysAhead(n) => write!(f, "d-{}", n),
            AlertKind::Weekly => write!(f, "weekly"),
            AlertKind::Test => write!(f, "test"),
        }
    }
}

impl FromStr for AlertKind {
    type Err = OpexError;

    /// Accepts `d-0`..`d-3` (also `d0`, `0`), `day-of`, `weekly`, `test`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "weekly" => return Ok(AlertKind::Weekly),
            "test" => return Ok(AlertKind::Test),
            "day-of" | "dayof" | "today" => return Ok(AlertKind::DaysAhead(0)),
            _ => {}
        }

        let digits = lower
            .strip_prefix("d-")
            .or_else(|| lower.strip_prefix('d'))
            .unwrap_or(&lower);

        let offset: u32 = digits
            .parse()
            .map_err(|_| OpexError::InvalidRequest(format!("Unknown alert kind '{}'", s)))?;

        if offset > MAX_DAYS_AHEAD {
            return Err(offset_out_of_range(offset));
        }
        Ok(AlertKind::DaysAhead(offset))
    }
}

fn offset_out_of_range(offset: u32) -> OpexError {
    OpexError::InvalidRequest(format!(
        "Alert offset {} is out of range (0..={})",
        offset, MAX_DAYS_AHEAD
    ))
}

/// How far ahead the weekly preview looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WeeklyBoundary {
    /// Fixed number of calendar days, counting the reference date.
    Days(u32),
    /// Through the next Saturday (the following one when run on a Saturday).
    ThroughSaturday,
}

impl Default for WeeklyBoundary {
    fn default() -> Self {
        WeeklyBoundary::Days(7)
    }
}

impl WeeklyBoundary {
    /// Inclusive `[start, end]` window starting at `today`.
    pub fn window(&self, today: NaiveDate) -> OpexResult<DateWindow> {
        let span = match self {
            WeeklyBoundary::Days(0) => {
                return Err(OpexError::InvalidRequest(
                    "Weekly window must cover at least one day".into(),
                ));
            }
            WeeklyBoundary::Days(n) => n - 1,
            WeeklyBoundary::ThroughSaturday => {
                let from_monday = today.weekday().num_days_from_monday();
                let saturday = Weekday::Sat.num_days_from_monday();
                match (saturday + 7 - from_monday) % 7 {
                    0 => 7,
                    n => n,
                }
            }
        };

        let end = today
            .checked_add_days(Days::new(u64::from(span)))
            .ok_or_else(|| OpexError::InvalidRequest(format!("Window from {} overflows", today)))?;

        Ok(DateWindow { start: today, end })
    }
}

impl fmt::Display for WeeklyBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeeklyBoundary::Days(n) => write!(f, "{}d", n),
            WeeklyBoundary::ThroughSaturday => write!(f, "saturday"),
        }
    }
}

impl FromStr for WeeklyBoundary {
    type Err = OpexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "saturday" || lower == "through_saturday" {
            return Ok(WeeklyBoundary::ThroughSaturday);
        }
        lower
            .trim_end_matches('d')
            .parse()
            .map(WeeklyBoundary::Days)
            .map_err(|_| {
                OpexError::Config(format!(
                    "Invalid weekly boundary '{}'. Expected e.g. \"7d\" or \"saturday\"",
                    s
                ))
            })
    }
}

impl TryFrom<String> for WeeklyBoundary {
    type Error = OpexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeeklyBoundary> for String {
    fn from(value: WeeklyBoundary) -> Self {
        value.to_string()
    }
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRequest {
    pub reference_date: NaiveDate,
    pub kind: AlertKind,
    pub tier: Tier,
}

impl AlertRequest {
    pub fn new(reference_date: NaiveDate, kind: AlertKind, tier: Tier) -> Self {
        AlertRequest {
            reference_date,
            kind,
            tier,
        }
    }
}

/// Events that should trigger a notification, in chronological order.
///
/// An empty result means "send nothing"; it is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResult {
    pub request: AlertRequest,
    /// Date that was matched for D-N alerts, after weekend adjustment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    /// Window scanned for weekly previews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
    pub events: Vec<Event>,
}

impl AlertResult {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Distinct dates with at least one event, counting shared dates once.
    pub fn distinct_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.events.iter().map(|e| e.date).collect();
        dates.dedup();
        dates
    }

    /// Events grouped by date, preserving order.
    pub fn by_date(&self) -> Vec<(NaiveDate, Vec<&Event>)> {
        let mut groups: Vec<(NaiveDate, Vec<&Event>)> = Vec::new();
        for event in &self.events {
            match groups.last_mut() {
                Some((date, group)) if *date == event.date => group.push(event),
                _ => groups.push((event.date, vec![event])),
            }
        }
        groups
    }
}

/// Maps `(request, calendar)` to the events that should be announced.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertSelector {
    pub weekly_boundary: WeeklyBoundary,
}

impl AlertSelector {
    pub fn new(weekly_boundary: WeeklyBoundary) -> Self {
        AlertSelector { weekly_boundary }
    }

    /// Select from a calendar that may have failed to load; load errors pass through unchanged.
    pub fn select_from(
        &self,
        store: OpexResult<&CalendarStore>,
        request: &AlertRequest,
    ) -> OpexResult<AlertResult> {
        self.select(store?, request)
    }

    pub fn select(&self, store: &CalendarStore, request: &AlertRequest) -> OpexResult<AlertResult> {
        let result = match request.kind {
            AlertKind::DaysAhead(offset) => self.select_days_ahead(store, request, offset)?,
            AlertKind::Weekly => self.select_weekly(store, request)?,
            AlertKind::Test => select_samples(store, request),
        };

        debug!(
            kind = %request.kind,
            tier = %request.tier,
            reference_date = %request.reference_date,
            events = result.events.len(),
            "Selected alert events"
        );

        Ok(result)
    }

    fn select_days_ahead(
        &self,
        store: &CalendarStore,
        request: &AlertRequest,
        offset: u32,
    ) -> OpexResult<AlertResult> {
        if offset > MAX_DAYS_AHEAD {
            return Err(offset_out_of_range(offset));
        }

        let raw_target = request
            .reference_date
            .checked_add_days(Days::new(u64::from(offset)))
            .ok_or_else(|| offset_out_of_range(offset))?;
        let target = adjust_for_weekend(raw_target, |d| store.is_holiday(d));

        if target != raw_target {
            debug!(from = %raw_target, to = %target, "Shifted weekend alert target");
        }

        let events = store
            .events_on(target)
            .iter()
            .filter(|e| store.tiers().includes(request.tier, e.category))
            .cloned()
            .collect();

        Ok(AlertResult {
            request: *request,
            target_date: Some(target),
            window: None,
            events,
        })
    }

    fn select_weekly(&self, store: &CalendarStore, request: &AlertRequest) -> OpexResult<AlertResult> {
        let window = self.weekly_boundary.window(request.reference_date)?;

        let events = store
            .events_in_range(window.start, window.end, request.tier)
            .cloned()
            .collect();

        Ok(AlertResult {
            request: *request,
            target_date: None,
            window: Some(window),
            events,
        })
    }
}

/// Earliest event of each category in the tier, for previewing every rendering branch.
fn select_samples(store: &CalendarStore, request: &AlertRequest) -> AlertResult {
    let mut events: Vec<Event> = store
        .tiers()
        .categories(request.tier)
        .iter()
        .filter_map(|c| store.events_of(*c).next())
        .cloned()
        .collect();
    events.sort_by_key(Event::key);

    AlertResult {
        request: *request,
        target_date: None,
        window: None,
        events,
    }
}
