use anyhow::Result;
use opex_core::config::OpexConfig;
use owo_colors::OwoColorize;

pub fn run(config: &OpexConfig) -> Result<()> {
    let path = OpexConfig::config_path()?;

    println!("{} {}", "Config file:".dimmed(), path.display());
    println!("{} {}", "Calendar:".dimmed(), config.calendar_file().display());
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}
