use crate::error::{MacroError, Result};
use crate::formatter::Formatter;
use crate::store::StoreOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

pub const KEYS: &[&str] = &[
    "formatter",
    "formatter-timeout-ms",
    "fallback-on-write-failure",
];

/// Configuration for macroz, stored as config.json next to the store file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroConfig {
    /// External JSON filter applied when reading and writing the store
    #[serde(default)]
    pub formatter: Formatter,

    /// Upper bound on a single formatter run
    #[serde(default = "default_timeout_ms")]
    pub formatter_timeout_ms: u64,

    /// Write unformatted JSON instead of failing when the formatter breaks on save
    #[serde(default)]
    pub fallback_on_write_failure: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            formatter: Formatter::None,
            formatter_timeout_ms: DEFAULT_TIMEOUT_MS,
            fallback_on_write_failure: false,
        }
    }
}

impl MacroConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MacroError::Io)?;
        let config: MacroConfig =
            serde_json::from_str(&content).map_err(MacroError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MacroError::Io)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(MacroError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).map_err(MacroError::Io)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.formatter_timeout_ms)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::default()
            .with_formatter(self.formatter.clone())
            .with_timeout(self.timeout())
            .with_fallback(self.fallback_on_write_failure)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "formatter" => Some(self.formatter.to_string()),
            "formatter-timeout-ms" => Some(self.formatter_timeout_ms.to_string()),
            "fallback-on-write-failure" => Some(self.fallback_on_write_failure.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "formatter" => {
                self.formatter = value.parse()?;
            }
            "formatter-timeout-ms" => {
                let ms: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid timeout '{}': expected milliseconds", value))?;
                if ms == 0 {
                    return Err("Timeout must be greater than zero".to_string());
                }
                self.formatter_timeout_ms = ms;
            }
            "fallback-on-write-failure" => {
                self.fallback_on_write_failure = value
                    .parse()
                    .map_err(|_| format!("Invalid value '{}': expected true or false", value))?;
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}
