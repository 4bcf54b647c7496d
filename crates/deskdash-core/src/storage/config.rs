//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Ad thresholds and machine timings
//! - Theme selection
//! - Weather fallback coordinates
//!
//! Configuration is stored at `~/.config/deskdash/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::ads::{AdEngineConfig, AdPolicy};
use crate::error::ConfigError;
use crate::views::Location;

/// Ad scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    #[serde(default = "default_interstitial_frequency")]
    pub interstitial_frequency: u64,
    #[serde(default = "default_side_banner_threshold")]
    pub side_banner_threshold: u64,
    #[serde(default = "default_bottom_banner_threshold")]
    pub bottom_banner_threshold: u64,
    #[serde(default = "default_rewarded_threshold")]
    pub rewarded_threshold: u64,
    #[serde(default = "default_true")]
    pub rewarded_enabled: bool,
    #[serde(default = "default_banner_rotation_ms")]
    pub banner_rotation_ms: u64,
    #[serde(default = "default_banner_reshow_secs")]
    pub banner_reshow_secs: u64,
    #[serde(default = "default_interstitial_countdown_secs")]
    pub interstitial_countdown_secs: u32,
    #[serde(default = "default_reward_budget")]
    pub reward_budget: u32,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

/// Weather view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Used when the environment supplies no location.
    #[serde(default = "default_fallback_lat")]
    pub fallback_lat: f64,
    #[serde(default = "default_fallback_lon")]
    pub fallback_lon: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/deskdash/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ads: AdsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

// Default functions
fn default_interstitial_frequency() -> u64 {
    7
}
fn default_side_banner_threshold() -> u64 {
    2
}
fn default_bottom_banner_threshold() -> u64 {
    1
}
fn default_rewarded_threshold() -> u64 {
    5
}
fn default_banner_rotation_ms() -> u64 {
    30_000
}
fn default_banner_reshow_secs() -> u64 {
    10
}
fn default_interstitial_countdown_secs() -> u32 {
    5
}
fn default_reward_budget() -> u32 {
    3
}
fn default_theme() -> String {
    "cosmic".into()
}
fn default_fallback_lat() -> f64 {
    40.7128
}
fn default_fallback_lon() -> f64 {
    -74.0060
}
fn default_true() -> bool {
    true
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: "unknown config key".to_string(),
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            interstitial_frequency: default_interstitial_frequency(),
            side_banner_threshold: default_side_banner_threshold(),
            bottom_banner_threshold: default_bottom_banner_threshold(),
            rewarded_threshold: default_rewarded_threshold(),
            rewarded_enabled: true,
            banner_rotation_ms: default_banner_rotation_ms(),
            banner_reshow_secs: default_banner_reshow_secs(),
            interstitial_countdown_secs: default_interstitial_countdown_secs(),
            reward_budget: default_reward_budget(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            fallback_lat: default_fallback_lat(),
            fallback_lon: default_fallback_lon(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ads: AdsConfig::default(),
            ui: UiConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| unknown_key(key))?;
                let existing = obj.get(part).ok_or_else(|| unknown_key(key))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(|| unknown_key(key))?;
        }

        Err(unknown_key(key).into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// Engine configuration derived from the ads section.
    pub fn ad_engine_config(&self) -> AdEngineConfig {
        AdEngineConfig {
            policy: AdPolicy {
                interstitial_frequency: self.ads.interstitial_frequency,
                side_banner_threshold: self.ads.side_banner_threshold,
                bottom_banner_threshold: self.ads.bottom_banner_threshold,
                rewarded_threshold: self.ads.rewarded_threshold,
                rewarded_enabled: self.ads.rewarded_enabled,
            },
            banner_rotation_ms: self.ads.banner_rotation_ms,
            banner_reshow_secs: self.ads.banner_reshow_secs,
            interstitial_countdown_secs: self.ads.interstitial_countdown_secs,
            reward_budget: self.ads.reward_budget,
        }
    }

    /// Weather fallback location from the weather section.
    pub fn fallback_location(&self) -> Location {
        Location {
            lat: self.weather.fallback_lat,
            lon: self.weather.fallback_lon,
        }
    }
}
