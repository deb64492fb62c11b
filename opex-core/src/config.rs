//! Global configuration at ~/.config/opex/config.toml
//!
//! Every key can also be set through `OPEX_*` environment variables
//! (`OPEX_TIER=high`, `OPEX_REMINDER_OFFSETS=2,1,0`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{OpexError, OpexResult};
use crate::selector::{AlertKind, AlertSelector, MAX_DAYS_AHEAD, WeeklyBoundary};
use crate::tier::{Tier, TierDefinitions, TierOverrides};

static DEFAULT_CALENDAR_PATH: &str = "~/.config/opex/calendar.json";
static DEFAULT_TIMEZONE: &str = "America/New_York";

fn default_calendar_path() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_PATH)
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_reminder_offsets() -> Vec<u32> {
    vec![3, 2, 1, 0]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexConfig {
    #[serde(default = "default_calendar_path")]
    pub calendar_path: PathBuf,

    /// Default verbosity for alerts and listings
    #[serde(default)]
    pub tier: Tier,

    /// IANA timezone used to decide what "today" is
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// D-N reminders to evaluate on each daily run
    #[serde(default = "default_reminder_offsets")]
    pub reminder_offsets: Vec<u32>,

    #[serde(default)]
    pub weekly_boundary: WeeklyBoundary,

    /// Replaces the built-in tier definitions when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiers: Option<TierOverrides>,
}

impl Default for OpexConfig {
    fn default() -> Self {
        OpexConfig {
            calendar_path: default_calendar_path(),
            tier: Tier::default(),
            timezone: default_timezone(),
            reminder_offsets: default_reminder_offsets(),
            weekly_boundary: WeeklyBoundary::default(),
            tiers: None,
        }
    }
}

impl OpexConfig {
    pub fn config_path() -> OpexResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| OpexError::Config("Could not determine config directory".into()))?
            .join("opex");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> OpexResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file, layered with `OPEX_*` environment variables.
    pub fn load_from(path: &Path) -> OpexResult<Self> {
        let config: OpexConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("OPEX")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("reminder_offsets"),
            )
            .build()
            .map_err(|e| OpexError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| OpexError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> OpexResult<()> {
        if let Some(offset) = self.reminder_offsets.iter().find(|o| **o > MAX_DAYS_AHEAD) {
            return Err(OpexError::Config(format!(
                "reminder_offsets contains {}; offsets must be between 0 and {}",
                offset, MAX_DAYS_AHEAD
            )));
        }
        if self.weekly_boundary == WeeklyBoundary::Days(0) {
            return Err(OpexError::Config(
                "weekly_boundary must cover at least one day (e.g. \"7d\" or \"saturday\")".into(),
            ));
        }
        Ok(())
    }

    /// Calendar path with `~` expanded.
    pub fn calendar_file(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.calendar_path.to_string_lossy()).into_owned())
    }

    pub fn tier_definitions(&self) -> OpexResult<TierDefinitions> {
        TierDefinitions::from_overrides(self.tiers.as_ref())
    }

    pub fn selector(&self) -> AlertSelector {
        AlertSelector::new(self.weekly_boundary)
    }

    /// Configured D-N reminders, furthest ahead first, without repeats.
    pub fn reminder_kinds(&self) -> Vec<AlertKind> {
        let mut offsets = self.reminder_offsets.clone();
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets.dedup();
        offsets.into_iter().map(AlertKind::DaysAhead).collect()
    }

    pub fn to_toml(&self) -> OpexResult<String> {
        toml::to_string_pretty(self).map_err(|e| OpexError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> OpexResult<()> {
        let contents = format!(
            "\
# opex configuration

# Calendar file (JSON):
# calendar_path = \"{}\"

# Alert verbosity: low, medium or high
# tier = \"medium\"

# Timezone that decides what \"today\" is:
# timezone = \"{}\"

# Days-ahead reminders checked on each run (0 = day of):
# reminder_offsets = [3, 2, 1, 0]

# Weekly preview window: a day count such as \"7d\", or \"saturday\"
# weekly_boundary = \"7d\"

# Custom tiers (each tier must include the one below it):
# [tiers]
# low = [\"standard\", \"quarter_end\"]
# medium = [\"standard\", \"quarter_end\", \"vix\", \"leaps_addition\", \"holiday\"]
# high = [\"standard\", \"quarter_end\", \"vix\", \"leaps_addition\", \"holiday\", \"am_settled_ltd\"]
",
            DEFAULT_CALENDAR_PATH, DEFAULT_TIMEZONE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OpexError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| OpexError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
