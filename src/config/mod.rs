use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::core::{
    errors::{MoneyNoteError, Result},
    utils::{ensure_dir, write_atomic, PathResolver},
};

/// User preferences persisted next to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    pub locale: String,
    pub ui_color_enabled: bool,
}

impl Config {
    /// Applies `key=value` from the shell; returns the normalized value.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<String> {
        match key.to_ascii_lowercase().as_str() {
            "currency" => {
                self.currency = value.trim().to_string();
                Ok(self.currency.clone())
            }
            "locale" => {
                self.locale = value.trim().to_string();
                Ok(self.locale.clone())
            }
            "color" | "ui_color_enabled" => {
                self.ui_color_enabled = parse_flag(value)?;
                Ok(self.ui_color_enabled.to_string())
            }
            other => Err(MoneyNoteError::ConfigError(format!(
                "unknown setting `{}` (expected currency, locale or color)",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "VND".into(),
            locale: "en-US".into(),
            ui_color_enabled: true,
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(MoneyNoteError::ConfigError(format!(
            "`{}` is not on/off",
            other
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Stored config, or defaults when the file does not exist yet.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| MoneyNoteError::ConfigError(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
