use std::{fs, io, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;

/// Size and pace of a single simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) period: Duration,
}

impl Settings {
    const fn new(width: u32, height: u32, period_ms: u64) -> Self {
        Self {
            width,
            height,
            period: Duration::from_millis(period_ms),
        }
    }

    /// Replaces every value that was provided on the command line.
    #[must_use]
    pub(crate) fn overridden(
        self,
        width: Option<u32>,
        height: Option<u32>,
        period_ms: Option<u64>,
    ) -> Self {
        Self {
            width: width.unwrap_or(self.width),
            height: height.unwrap_or(self.height),
            period: period_ms.map_or(self.period, Duration::from_millis),
        }
    }

    fn merged(self, table: &SettingsTable) -> Self {
        self.overridden(table.width, table.height, table.period_ms)
    }
}

/// Per-simulation settings loaded from `cellsim.toml`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) life: Settings,
    pub(crate) langton: Settings,
    pub(crate) wireworld: Settings,
    pub(crate) guard_duty: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            life: Settings::new(80, 80, 250),
            langton: Settings::new(1000, 1000, 100),
            wireworld: Settings::new(1000, 1000, 500),
            guard_duty: Settings::new(40, 40, 100),
        }
    }
}

impl Config {
    /// Loads the configuration file, falling back to defaults without one.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents, &path.display().to_string())?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parses TOML contents; missing tables and keys keep their defaults.
    fn parse(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            origin: origin.to_owned(),
            source,
        })?;
        let defaults = Self::default();
        let config = Self {
            life: defaults.life.merged(&file.life),
            langton: defaults.langton.merged(&file.langton),
            wireworld: defaults.wireworld.merged(&file.wireworld),
            guard_duty: defaults.guard_duty.merged(&file.guard_duty),
        };
        for (table, settings) in [
            ("life", config.life),
            ("langton", config.langton),
            ("wireworld", config.wireworld),
            ("guard_duty", config.guard_duty),
        ] {
            if settings.period.is_zero() {
                return Err(ConfigError::ZeroPeriod { table });
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    life: SettingsTable,
    langton: SettingsTable,
    wireworld: SettingsTable,
    guard_duty: SettingsTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsTable {
    width: Option<u32>,
    height: Option<u32>,
    period_ms: Option<u64>,
}

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse configuration from {origin}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    /// A simulation would never tick.
    #[error("[{table}] period_ms must be positive")]
    ZeroPeriod { table: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("", "test").expect("empty config is valid");

        assert_eq!(config, Config::default());
        assert_eq!(config.guard_duty, Settings::new(40, 40, 100));
    }

    #[test]
    fn tables_override_only_the_keys_they_set() {
        let config = Config::parse(
            "[life]\nwidth = 20\n\n[wireworld]\nperiod_ms = 50\nheight = 30\n",
            "test",
        )
        .expect("valid config");

        assert_eq!(config.life, Settings::new(20, 80, 250));
        assert_eq!(config.wireworld, Settings::new(1000, 30, 50));
        assert_eq!(config.langton, Config::default().langton);
    }

    #[test]
    fn command_line_values_win_over_file_values() {
        let settings = Settings::new(10, 10, 100).overridden(Some(3), None, Some(7));

        assert_eq!(settings, Settings::new(3, 10, 7));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error =
            Config::parse("[life]\ndepth = 3\n", "test").expect_err("depth is not a setting");

        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_period_is_rejected() {
        let error = Config::parse("[langton]\nperiod_ms = 0\n", "test").expect_err("zero period");

        assert_eq!(error.to_string(), "[langton] period_ms must be positive");
    }
}
