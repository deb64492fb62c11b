use std::path::Path;

use anyhow::{Context, Result};
use opex_core::config::OpexConfig;
use opex_core::source::load_calendar;
use opex_core::{Category, Tier};
use owo_colors::OwoColorize;

pub fn run(path: &Path, config: &OpexConfig) -> Result<()> {
    let tiers = config.tier_definitions()?;
    let store = load_calendar(path, tiers)
        .with_context(|| format!("Calendar at {} is not valid", path.display()))?;

    let year = store
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "unspecified year".to_string());
    println!(
        "{} {} ({}, {} events)",
        "✓".green(),
        path.display(),
        year,
        store.len()
    );

    let counts = store.category_counts();
    for category in Category::ALL {
        let count = counts.get(&category).copied().unwrap_or(0);
        let tier = store
            .tiers()
            .lowest_tier_for(category)
            .map(|t| format!("{}+", t))
            .unwrap_or_else(|| "never alerted".to_string());
        let line = format!("   {:<28} {:>3}  {}", category.label(), count, tier);
        if count == 0 {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }

    let sizes: Vec<String> = Tier::ALL
        .iter()
        .map(|t| format!("{} {}", t, store.events_in_tier(*t).count()))
        .collect();
    println!("   {}", format!("Tiers: {}", sizes.join(", ")).dimmed());

    Ok(())
}
