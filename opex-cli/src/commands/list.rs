use anyhow::Result;
use chrono::NaiveDate;
use opex_core::{CalendarStore, Category, Event, Tier};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(
    store: &CalendarStore,
    tier: Tier,
    category: Option<Category>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let events = matching(store, tier, category, from, to);

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group events by month
    let mut current_month: Option<String> = None;

    for event in &events {
        let month = event.date.format("%B %Y").to_string();

        if current_month.as_ref() != Some(&month) {
            if current_month.is_some() {
                println!();
            }
            println!("{}", month.bold());
            current_month = Some(month);
        }

        println!("  {}  {}", event.date.format("%a %b %e"), event.render());
    }

    println!();
    println!("{}", format!("{} events ({} tier)", events.len(), tier).dimmed());

    Ok(())
}

/// Events in `tier`, optionally narrowed to one category and an inclusive date range.
fn matching(
    store: &CalendarStore,
    tier: Tier,
    category: Option<Category>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&Event> {
    store
        .events_in_tier(tier)
        .filter(|e| category.is_none_or(|c| e.category == c))
        .filter(|e| from.is_none_or(|f| e.date >= f))
        .filter(|e| to.is_none_or(|t| e.date <= t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> CalendarStore {
        CalendarStore::new(vec![
            Event::new(date(2026, 1, 16), Category::Standard),
            Event::new(date(2026, 1, 19), Category::Holiday),
            Event::new(date(2026, 1, 21), Category::Vix),
            Event::new(date(2026, 2, 20), Category::Standard),
            Event::new(date(2026, 2, 20), Category::AmSettledLtd),
        ])
        .unwrap()
    }

    fn dates(events: &[&Event]) -> Vec<NaiveDate> {
        events.iter().map(|e| e.date).collect()
    }

    #[test]
    fn tier_limits_categories() {
        let store = store();
        assert_eq!(matching(&store, Tier::Low, None, None, None).len(), 2);
        assert_eq!(matching(&store, Tier::High, None, None, None).len(), 5);
    }

    #[test]
    fn category_filter_applies_within_tier() {
        let store = store();
        let vix = matching(&store, Tier::High, Some(Category::Vix), None, None);
        assert_eq!(dates(&vix), vec![date(2026, 1, 21)]);

        // Outside the low tier, so nothing to show
        assert!(matching(&store, Tier::Low, Some(Category::Vix), None, None).is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let store = store();
        let january = matching(
            &store,
            Tier::High,
            None,
            Some(date(2026, 1, 19)),
            Some(date(2026, 1, 21)),
        );
        assert_eq!(dates(&january), vec![date(2026, 1, 19), date(2026, 1, 21)]);

        let open_ended = matching(&store, Tier::High, None, Some(date(2026, 2, 1)), None);
        assert_eq!(dates(&open_ended), vec![date(2026, 2, 20), date(2026, 2, 20)]);
    }
}
