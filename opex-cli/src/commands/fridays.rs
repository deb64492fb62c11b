use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use opex_core::opex_date::{is_third_friday, standard_expirations};
use opex_core::{CalendarStore, Category};
use owo_colors::OwoColorize;

pub fn run(store: &CalendarStore, year: Option<i32>, today: NaiveDate) -> Result<()> {
    let year = year.or(store.year()).unwrap_or_else(|| today.year());

    let computed = standard_expirations(year, |d| store.is_holiday(d));
    let listed: Vec<NaiveDate> = store
        .events_of(Category::Standard)
        .map(|e| e.date)
        .filter(|d| d.year() == year)
        .collect();

    println!("{}", format!("Standard expirations {}", year).bold());

    let comparison = Comparison::new(&computed, &listed);

    for date in &computed {
        let label = date.format("%B %-d, %Y (%A)").to_string();
        let adjusted = if is_third_friday(*date) {
            String::new()
        } else {
            " holiday adjusted".dimmed().to_string()
        };

        if listed.is_empty() {
            println!("  {}{}", label, adjusted);
        } else if comparison.missing.contains(date) {
            println!("  {} {}{} {}", "✗".red(), label, adjusted, "not in calendar".red());
        } else {
            println!("  {} {}{}", "✓".green(), label, adjusted);
        }
    }

    for date in &comparison.unexpected {
        println!(
            "  {} {} {}",
            "?".yellow(),
            date.format("%B %-d, %Y (%A)"),
            "listed but not a computed expiration".yellow()
        );
    }

    let differences = comparison.differences();
    if differences > 0 {
        println!();
        println!(
            "{}",
            format!("{} difference(s) between calendar and computed dates", differences).yellow()
        );
    }

    Ok(())
}

/// Computed expirations checked against the ones a calendar lists.
#[derive(Debug, Default, PartialEq)]
struct Comparison {
    /// Computed but absent from the calendar
    missing: Vec<NaiveDate>,
    /// Listed but not a computed expiration
    unexpected: Vec<NaiveDate>,
}

impl Comparison {
    /// An empty `listed` means the calendar has no standard expirations to compare.
    fn new(computed: &[NaiveDate], listed: &[NaiveDate]) -> Self {
        if listed.is_empty() {
            return Comparison::default();
        }

        Comparison {
            missing: computed.iter().filter(|d| !listed.contains(d)).copied().collect(),
            unexpected: listed.iter().filter(|d| !computed.contains(d)).copied().collect(),
        }
    }

    fn differences(&self) -> usize {
        self.missing.len() + self.unexpected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opex_core::Event;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matching_calendar_has_no_differences() {
        let computed = standard_expirations(2026, |_| false);
        let comparison = Comparison::new(&computed, &computed);
        assert_eq!(comparison.differences(), 0);
    }

    #[test]
    fn holiday_moves_expiration_to_thursday() {
        let store = CalendarStore::new(vec![
            Event::new(date(2026, 6, 19), Category::Holiday),
            Event::new(date(2026, 6, 19), Category::Standard),
        ])
        .unwrap();
        let computed = standard_expirations(2026, |d| store.is_holiday(d));
        let listed: Vec<NaiveDate> = store.events_of(Category::Standard).map(|e| e.date).collect();

        let comparison = Comparison::new(&computed, &listed);
        // Only June is listed, on the holiday instead of the Thursday before it
        assert_eq!(comparison.unexpected, vec![date(2026, 6, 19)]);
        assert_eq!(comparison.missing.len(), 12);
        assert!(comparison.missing.contains(&date(2026, 6, 18)));
        assert_eq!(comparison.differences(), 13);
    }

    #[test]
    fn calendar_without_expirations_is_not_compared() {
        let computed = standard_expirations(2026, |_| false);
        assert_eq!(Comparison::new(&computed, &[]), Comparison::default());
    }
}
