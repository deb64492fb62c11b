//! Terminal rendering for alert results and calendar events.

use chrono::NaiveDate;
use opex_core::{AlertKind, AlertResult, Category, Event};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Category {
    fn render(&self) -> String {
        let label = self.label();
        match self {
            Category::Holiday => label.red().to_string(),
            Category::Standard => label.yellow().bold().to_string(),
            Category::Vix => label.magenta().to_string(),
            Category::AmSettledLtd => label.cyan().to_string(),
            Category::QuarterEnd => label.blue().to_string(),
            Category::LeapsAddition => label.green().to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let title = match (&self.category, &self.name) {
            (Category::Holiday, Some(name)) => format!("{} {}", self.category.render(), name),
            _ => self.category.render(),
        };

        match self.detail() {
            Some(detail) => format!("{} {}", title, detail.dimmed()),
            None => title,
        }
    }
}

trait EventDetail {
    fn detail(&self) -> Option<String>;
}

impl EventDetail for Event {
    /// Category-specific extra line content, followed by the note.
    fn detail(&self) -> Option<String> {
        let specific = match self.category {
            Category::Vix => self
                .last_trading_day
                .map(|d| format!("last trading day {}", d.format("%a %b %-d"))),
            Category::AmSettledLtd => self
                .expiration_date
                .map(|d| format!("expires {}", d.format("%a %b %-d"))),
            Category::LeapsAddition => self.leaps_year.map(|y| format!("{} series", y)),
            Category::Holiday => Some("market closed".to_string()),
            _ => None,
        };

        let parts: Vec<String> = specific.into_iter().chain(self.note.clone()).collect();
        if parts.is_empty() {
            None
        } else {
            Some(format!("({})", parts.join("; ")))
        }
    }
}

/// Heading for an alert kind.
pub fn alert_heading(kind: AlertKind) -> String {
    match kind {
        AlertKind::DaysAhead(0) => "OPEX Alert - TODAY".to_string(),
        AlertKind::DaysAhead(1) => "OPEX Alert - D-1".to_string(),
        AlertKind::DaysAhead(n) => format!("OPEX Alert - D-{}", n),
        AlertKind::Weekly => "Weekly OPEX Preview".to_string(),
        AlertKind::Test => "Test Alert - one event per category".to_string(),
    }
}

/// Render an alert result grouped by date.
pub fn render_alert(result: &AlertResult) -> String {
    let reference = result.request.reference_date;
    let mut lines = vec![format!(
        "{} {}",
        alert_heading(result.request.kind).bold(),
        format!("[{}]", result.request.tier).dimmed()
    )];

    if let Some(window) = result.window {
        lines.push(
            format!(
                "   {} - {}",
                window.start.format("%a %b %-d"),
                window.end.format("%a %b %-d")
            )
            .dimmed()
            .to_string(),
        );
    }

    if result.is_empty() {
        lines.push("   No qualifying events (nothing to send)".dimmed().to_string());
        return lines.join("\n");
    }

    for (date, events) in result.by_date() {
        lines.push(format!(
            "   {} {}",
            date_label(date, reference).bold(),
            days_away(date, reference).dimmed()
        ));
        for event in events {
            lines.push(format!("      {}", event.render()));
        }
    }

    lines.join("\n")
}

/// Format a date relative to the reference date (e.g. "Today", "Tomorrow", "Fri Jan 16")
pub fn date_label(date: NaiveDate, reference: NaiveDate) -> String {
    match (date - reference).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

pub fn days_away(date: NaiveDate, reference: NaiveDate) -> String {
    match (date - reference).num_days() {
        0 => String::new(),
        1 => "(1 day away)".to_string(),
        -1 => "(1 day ago)".to_string(),
        n if n < 0 => format!("({} days ago)", -n),
        n => format!("({} days away)", n),
    }
}
