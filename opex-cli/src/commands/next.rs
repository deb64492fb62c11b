use anyhow::Result;
use chrono::NaiveDate;
use opex_core::{CalendarStore, Tier};
use owo_colors::OwoColorize;

use crate::render::{Render, days_away};

pub fn run(store: &CalendarStore, today: NaiveDate, from: NaiveDate, tier: Tier) -> Result<()> {
    match store.next_event(from, tier) {
        Some(event) => println!(
            "Next: {} {} {}",
            event.date.format("%A, %B %-d, %Y").bold(),
            event.render(),
            days_away(event.date, today).dimmed()
        ),
        None => println!("{}", "No upcoming events found in the calendar".dimmed()),
    }

    Ok(())
}
