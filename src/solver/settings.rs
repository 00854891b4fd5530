use std::fs::File;
use std::io::Read;

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;

pub const DEFAULT_SHIFT_LIMIT: f64 = 720.0;
pub const DEFAULT_FIXED_COST_PER_DRIVER: f64 = 500.0;

/// How the nearest-successor scan picks among loads at exactly the same distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// lowest sequence number first
    #[default]
    SequenceNumber,
    /// first load in the remaining (sorted) order
    SortedOrder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// maximum driving time of a route, depot legs included
    pub shift_limit: f64,
    pub fixed_cost_per_driver: f64,
    pub tie_break: TieBreak,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shift_limit: DEFAULT_SHIFT_LIMIT,
            fixed_cost_per_driver: DEFAULT_FIXED_COST_PER_DRIVER,
            tie_break: TieBreak::default(),
        }
    }
}

/// Optional overrides; unset values fall through to the next layer.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsOverrides {
    pub shift_limit: Option<f64>,
    pub fixed_cost_per_driver: Option<f64>,
    pub tie_break: Option<TieBreak>,
}

impl Settings {
    pub fn with_overrides(self, overrides: &SettingsOverrides) -> Self {
        Self {
            shift_limit: overrides.shift_limit.unwrap_or(self.shift_limit),
            fixed_cost_per_driver: overrides
                .fixed_cost_per_driver
                .unwrap_or(self.fixed_cost_per_driver),
            tie_break: overrides.tie_break.unwrap_or(self.tie_break),
        }
    }
}

mod toml {
    use serde::Deserialize;

    use super::SettingsOverrides;

    #[derive(Debug, Default, Deserialize)]
    pub struct Config {
        #[serde(default)]
        pub solver: SettingsOverrides,
    }
}

/// Parses a config document with an optional `[solver]` table.
pub fn parse_config(s: &str) -> anyhow::Result<SettingsOverrides> {
    let config: toml::Config = ::toml::from_str(s)?;
    Ok(config.solver)
}

pub fn read_config(path: impl Into<String>) -> anyhow::Result<SettingsOverrides> {
    let path = path.into();
    let mut s = String::new();
    File::open(&path)
        .and_then(|mut f| f.read_to_string(&mut s))
        .with_context(|| format!("could not read config file {}", path))?;
    parse_config(&s).with_context(|| format!("invalid config file {}", path))
}
