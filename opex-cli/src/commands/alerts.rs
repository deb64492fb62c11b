//! Daily alert run: every configured D-N reminder plus the Sunday weekly preview.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use opex_core::config::OpexConfig;
use opex_core::{AlertKind, AlertRequest, AlertResult, CalendarStore, Category, Tier};
use owo_colors::OwoColorize;
use tracing::{debug, info};

use crate::render::render_alert;

pub fn run(
    store: &CalendarStore,
    config: &OpexConfig,
    today: NaiveDate,
    tier: Tier,
    json: bool,
) -> Result<()> {
    let due = due_alerts(store, config, today, tier)?;

    info!(%today, %tier, alerts = due.len(), "Evaluated daily alerts");

    if json {
        println!("{}", serde_json::to_string_pretty(&due)?);
        return Ok(());
    }

    if due.is_empty() {
        println!(
            "{}",
            format!("Nothing to send for {}", today.format("%a %b %-d, %Y")).dimmed()
        );
        return Ok(());
    }

    let rendered: Vec<String> = due.iter().map(render_alert).collect();
    println!("{}", rendered.join("\n\n"));

    Ok(())
}

/// Alerts with at least one qualifying event for `today`.
///
/// Each event is announced at most once per run, under the nearest reminder that
/// reaches it. Reminders whose weekend shift lands before `today` are dropped.
/// The Sunday weekly preview is a digest and repeats events freely.
fn due_alerts(
    store: &CalendarStore,
    config: &OpexConfig,
    today: NaiveDate,
    tier: Tier,
) -> Result<Vec<AlertResult>> {
    let selector = config.selector();

    let mut due = Vec::new();
    let mut announced: BTreeSet<(NaiveDate, Category)> = BTreeSet::new();

    for kind in config.reminder_kinds().into_iter().rev() {
        let mut result = selector.select(store, &AlertRequest::new(today, kind, tier))?;

        if result.target_date.is_some_and(|target| target < today) {
            debug!(%today, %kind, target = ?result.target_date, "Skipping reminder for a past date");
            continue;
        }

        result.events.retain(|event| announced.insert(event.key()));
        if !result.is_empty() {
            due.push(result);
        }
    }

    // Furthest reminder first, matching the configured order
    due.reverse();

    if today.weekday() == Weekday::Sun {
        let weekly = selector.select(store, &AlertRequest::new(today, AlertKind::Weekly, tier))?;
        if !weekly.is_empty() {
            due.push(weekly);
        }
    }

    Ok(due)
}
