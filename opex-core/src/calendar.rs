//! In-memory calendar store.
//!
//! Holds every event for the covered period, sorted by `(date, category)`, and
//! answers range queries. The store never adjusts dates; weekend handling is
//! applied by the selector at query time.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::error::{OpexError, OpexResult};
use crate::event::{Category, Event};
use crate::tier::{Tier, TierDefinitions};

#[derive(Debug, Clone)]
pub struct CalendarStore {
    year: Option<i32>,
    events: Vec<Event>,
    tiers: TierDefinitions,
}

impl CalendarStore {
    /// Build a store with the built-in tier definitions.
    pub fn new(events: Vec<Event>) -> OpexResult<Self> {
        Self::with_tiers(events, TierDefinitions::default())
    }

    /// Build a store with explicit tier definitions.
    ///
    /// Custom definitions may only reference categories that have at least one event.
    pub fn with_tiers(mut events: Vec<Event>, tiers: TierDefinitions) -> OpexResult<Self> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(event.key()) {
                return Err(OpexError::MalformedCalendar(format!(
                    "Duplicate {} event on {}",
                    event.category, event.date
                )));
            }
        }

        if tiers.is_custom() {
            let present: HashSet<Category> = events.iter().map(|e| e.category).collect();
            if let Some(empty) = tiers.referenced().into_iter().find(|c| !present.contains(c)) {
                return Err(OpexError::MalformedCalendar(format!(
                    "Tier definitions reference '{}' but the calendar has no such events",
                    empty
                )));
            }
        }

        events.sort_by_key(Event::key);

        Ok(CalendarStore {
            year: None,
            events,
            tiers,
        })
    }

    pub(crate) fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    /// Calendar year declared by the source, if any.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn tiers(&self) -> &TierDefinitions {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in canonical order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events dated within `[start, end]`, in canonical order.
    pub fn events_between(&self, start: NaiveDate, end: NaiveDate) -> &[Event] {
        if start > end {
            return &[];
        }
        let lo = self.events.partition_point(|e| e.date < start);
        let hi = self.events.partition_point(|e| e.date <= end);
        &self.events[lo..hi]
    }

    /// Events sharing `date`, in canonical category order.
    pub fn events_on(&self, date: NaiveDate) -> &[Event] {
        self.events_between(date, date)
    }

    pub fn events_of(&self, category: Category) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.category == category)
    }

    pub fn events_in_tier(&self, tier: Tier) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| self.tiers.includes(tier, e.category))
    }

    pub fn events_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        tier: Tier,
    ) -> impl Iterator<Item = &Event> {
        self.events_between(start, end)
            .iter()
            .filter(move |e| self.tiers.includes(tier, e.category))
    }

    /// First event in `tier` dated on or after `from`.
    pub fn next_event(&self, from: NaiveDate, tier: Tier) -> Option<&Event> {
        let lo = self.events.partition_point(|e| e.date < from);
        self.events[lo..]
            .iter()
            .find(|e| self.tiers.includes(tier, e.category))
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.events_on(date)
            .iter()
            .any(|e| e.category == Category::Holiday)
    }

    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.category).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierOverrides;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_store() -> CalendarStore {
        CalendarStore::new(vec![
            Event::new(date(2026, 6, 18), Category::Standard),
            Event::new(date(2026, 6, 17), Category::AmSettledLtd),
            Event::new(date(2026, 6, 19), Category::Holiday).with_name("Juneteenth"),
            Event::new(date(2026, 6, 17), Category::Vix),
            Event::new(date(2026, 6, 30), Category::QuarterEnd),
        ])
        .unwrap()
    }

    #[test]
    fn events_are_sorted_by_date_then_category() {
        let store = sample_store();
        let keys: Vec<_> = store.events().iter().map(Event::key).collect();
        assert_eq!(
            keys,
            vec![
                (date(2026, 6, 17), Category::Vix),
                (date(2026, 6, 17), Category::AmSettledLtd),
                (date(2026, 6, 18), Category::Standard),
                (date(2026, 6, 19), Category::Holiday),
                (date(2026, 6, 30), Category::QuarterEnd),
            ]
        );
    }

    #[test]
    fn events_between_is_inclusive() {
        let store = sample_store();
        assert_eq!(store.events_between(date(2026, 6, 17), date(2026, 6, 19)).len(), 4);
        assert_eq!(store.events_between(date(2026, 6, 18), date(2026, 6, 18)).len(), 1);
        assert!(store.events_between(date(2026, 6, 20), date(2026, 6, 29)).is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        let store = sample_store();
        assert!(store.events_between(date(2026, 6, 30), date(2026, 6, 1)).is_empty());
    }

    #[test]
    fn events_on_returns_every_category_for_the_date() {
        let store = sample_store();
        let on = store.events_on(date(2026, 6, 17));
        assert_eq!(on.len(), 2);
        assert_eq!(on[0].category, Category::Vix);
        assert!(store.events_on(date(2026, 6, 16)).is_empty());
    }

    #[test]
    fn duplicate_date_and_category_is_rejected() {
        let err = CalendarStore::new(vec![
            Event::new(date(2026, 1, 16), Category::Standard),
            Event::new(date(2026, 1, 16), Category::Standard).with_note("again"),
        ])
        .unwrap_err();
        assert!(err.is_malformed_calendar());
    }

    #[test]
    fn same_date_different_category_is_allowed() {
        let store = CalendarStore::new(vec![
            Event::new(date(2026, 12, 24), Category::Holiday),
            Event::new(date(2026, 12, 24), Category::Standard),
        ])
        .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn next_event_respects_tier() {
        let store = sample_store();
        let next_low = store.next_event(date(2026, 6, 1), Tier::Low).unwrap();
        assert_eq!(next_low.key(), (date(2026, 6, 18), Category::Standard));

        let next_high = store.next_event(date(2026, 6, 1), Tier::High).unwrap();
        assert_eq!(next_high.key(), (date(2026, 6, 17), Category::Vix));

        assert!(store.next_event(date(2026, 7, 1), Tier::High).is_none());
    }

    #[test]
    fn next_event_includes_the_from_date() {
        let store = sample_store();
        let next = store.next_event(date(2026, 6, 18), Tier::Low).unwrap();
        assert_eq!(next.date, date(2026, 6, 18));
    }

    #[test]
    fn is_holiday_checks_category() {
        let store = sample_store();
        assert!(store.is_holiday(date(2026, 6, 19)));
        assert!(!store.is_holiday(date(2026, 6, 18)));
    }

    #[test]
    fn custom_tier_referencing_missing_category_is_rejected() {
        let tiers = TierDefinitions::custom(&TierOverrides {
            low: vec![Category::Standard],
            medium: vec![Category::Standard],
            high: vec![Category::Standard, Category::LeapsAddition],
        })
        .unwrap();
        let err = CalendarStore::with_tiers(
            vec![Event::new(date(2026, 1, 16), Category::Standard)],
            tiers,
        )
        .unwrap_err();
        assert!(err.is_malformed_calendar());
        assert!(err.to_string().contains("leaps_addition"));
    }

    #[test]
    fn default_tiers_tolerate_sparse_calendars() {
        let store = CalendarStore::new(vec![Event::new(date(2026, 1, 16), Category::Standard)]);
        assert!(store.is_ok());
    }

    #[test]
    fn category_counts() {
        let counts = sample_store().category_counts();
        assert_eq!(counts[&Category::Vix], 1);
        assert_eq!(counts.get(&Category::LeapsAddition), None);
    }
}
