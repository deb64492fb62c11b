//! Turning command-line date arguments and the clock into calendar dates.

use anyhow::{Context, Result};
use chrono::{Month, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use opex_core::config::OpexConfig;

/// Today's date in the configured timezone.
pub fn today(config: &OpexConfig) -> Result<NaiveDate> {
    let tz: Tz = config
        .timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown timezone '{}' in config", config.timezone))?;

    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// The `--date` argument if given, otherwise today.
pub fn resolve(arg: Option<&str>, config: &OpexConfig) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse(s),
        None => today(config),
    }
}

/// Parse `YYYY-MM-DD`, falling back to natural language ("tomorrow", "next fri").
pub fn parse(input: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date);
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{}\"", input))
        .context("Expected YYYY-MM-DD or a phrase like \"next friday\"")?;

    Ok(dt.date())
}

/// Spell out short weekday and month names ("fri", "sep"), which fuzzydate only
/// understands in full.
fn expand_abbreviations(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            if let Ok(weekday) = word.parse::<Weekday>() {
                weekday_name(weekday).to_string()
            } else if let Ok(month) = word.parse::<Month>() {
                month.name().to_lowercase()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse("2026-01-16").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
        );
    }

    #[test]
    fn expands_abbreviations() {
        assert_eq!(expand_abbreviations("Next  Fri"), "next friday");
        assert_eq!(expand_abbreviations("sep 18"), "september 18");
        assert_eq!(expand_abbreviations("third Thu"), "third thursday");
        assert_eq!(expand_abbreviations("monday"), "monday");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("whenever").is_err());
    }

    #[test]
    fn today_rejects_unknown_timezone() {
        let config = OpexConfig {
            timezone: "Mars/Olympus_Mons".into(),
            ..OpexConfig::default()
        };
        assert!(today(&config).is_err());
    }
}
