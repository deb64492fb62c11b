mod commands;
mod dates;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use opex_core::config::OpexConfig;
use opex_core::source::load_calendar;
use opex_core::{AlertKind, CalendarStore, Category, Tier};

#[derive(Parser)]
#[command(name = "opex")]
#[command(about = "Preview and schedule options expiration (OPEX) alerts")]
struct Cli {
    /// Calendar file to use instead of the configured one
    #[arg(long, global = true)]
    calendar: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single alert (d-0..d-3, weekly, test)
    Check {
        kind: AlertKind,

        /// Reference date (YYYY-MM-DD or e.g. "next friday"); defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Alert tier: low, medium or high
        #[arg(short, long)]
        tier: Option<Tier>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every configured reminder for a day, plus the weekly preview on Sundays
    Alerts {
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        tier: Option<Tier>,

        #[arg(long)]
        json: bool,
    },
    /// Show the next upcoming event
    Next {
        /// Search from this date instead of today
        #[arg(long)]
        from: Option<String>,

        #[arg(short, long)]
        tier: Option<Tier>,
    },
    /// List calendar events grouped by month
    List {
        #[arg(short, long)]
        tier: Option<Tier>,

        /// Only show this category (e.g. vix, holiday)
        #[arg(short, long, value_parser = parse_category)]
        category: Option<Category>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,
    },
    /// Load a calendar file and report what it contains
    Validate {
        /// Calendar file; defaults to the configured one
        path: Option<PathBuf>,
    },
    /// Compute third-Friday expirations and compare them with the calendar
    Fridays {
        /// Year to compute; defaults to the calendar's year
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Show the configuration file location and resolved settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = OpexConfig::load().context("Failed to load configuration")?;
    let calendar_path = cli.calendar.unwrap_or_else(|| config.calendar_file());

    match cli.command {
        Commands::Check {
            kind,
            date,
            tier,
            json,
        } => {
            let store = open_calendar(&calendar_path, &config)?;
            let today = dates::resolve(date.as_deref(), &config)?;
            let tier = tier.unwrap_or(config.tier);
            commands::check::run(&store, &config.selector(), today, kind, tier, json)
        }
        Commands::Alerts { date, tier, json } => {
            let store = open_calendar(&calendar_path, &config)?;
            let today = dates::resolve(date.as_deref(), &config)?;
            let tier = tier.unwrap_or(config.tier);
            commands::alerts::run(&store, &config, today, tier, json)
        }
        Commands::Next { from, tier } => {
            let store = open_calendar(&calendar_path, &config)?;
            let today = dates::today(&config)?;
            let from = match from {
                Some(s) => dates::parse(&s)?,
                None => today,
            };
            commands::next::run(&store, today, from, tier.unwrap_or(config.tier))
        }
        Commands::List {
            tier,
            category,
            from,
            to,
        } => {
            let store = open_calendar(&calendar_path, &config)?;
            let from = from.as_deref().map(dates::parse).transpose()?;
            let to = to.as_deref().map(dates::parse).transpose()?;
            commands::list::run(&store, tier.unwrap_or(Tier::High), category, from, to)
        }
        Commands::Validate { path } => {
            let path = path.unwrap_or(calendar_path);
            commands::validate::run(&path, &config)
        }
        Commands::Fridays { year } => {
            let store = open_calendar(&calendar_path, &config)?;
            let today = dates::today(&config)?;
            commands::fridays::run(&store, year, today)
        }
        Commands::Config => commands::config::run(&config),
    }
}

fn open_calendar(path: &std::path::Path, config: &OpexConfig) -> Result<CalendarStore> {
    if !path.exists() {
        anyhow::bail!(
            "Calendar file not found at {}\n\n\
            Point calendar_path in {} at your OPEX calendar, or pass:\n  \
            opex --calendar <file.json> <command>",
            path.display(),
            OpexConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        );
    }

    let tiers = config.tier_definitions()?;
    let store = load_calendar(path, tiers)
        .with_context(|| format!("Failed to load calendar from {}", path.display()))?;

    Ok(store)
}

fn parse_category(s: &str) -> std::result::Result<Category, String> {
    s.parse().map_err(|_| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{}' (expected one of: {})", s, known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_flag_accepts_names_and_section_keys() {
        assert_eq!(parse_category("vix").unwrap(), Category::Vix);
        assert_eq!(parse_category("exchange_holidays").unwrap(), Category::Holiday);
    }

    #[test]
    fn category_flag_error_lists_choices() {
        let err = parse_category("vxi").unwrap_err();
        assert!(err.starts_with("unknown category 'vxi'"));
        assert!(err.contains("am_settled_ltd"));
        assert!(!err.contains("Malformed"));
    }

    #[test]
    fn list_rejects_unknown_category() {
        let parsed = Cli::try_parse_from(["opex", "list", "--category", "bogus"]);
        assert!(parsed.is_err());
    }
}
