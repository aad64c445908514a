/*
 *  config.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/pihole-dashboard/config.toml";

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Supported panel models, selected by the `screen_type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenKind {
    /// Waveshare 2.13" V2 (SSD1675-class controller)
    #[serde(rename = "213v2")]
    Epd2in13V2,
    /// Waveshare 2.13" V3 HAT revision, driven by the V4 controller
    #[serde(rename = "213v3")]
    Epd2in13V3,
}

/// Immutable application configuration, constructed once at startup and
/// passed by parameter. Mirrors the on-disk TOML layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network interface whose IPv4 address is reported
    pub interface: String,
    /// Pi-hole admin host
    pub pihole_ip: String,
    /// Pi-hole admin port
    pub pihole_port: u16,
    /// Pi-hole API token (may be empty when the API is open)
    pub pihole_api_token: String,
    /// 0 = normal, 1 = panel mounted upside down
    pub is_rotated: u8,
    /// Panel model
    pub screen_type: ScreenKind,

    /// Weather data source settings
    pub weather: WeatherConfig,

    /// Where the last-rendered report digest is persisted
    #[serde(default = "default_hash_file")]
    pub hash_file: PathBuf,

    /// When true the panel is only refreshed if the report content changed.
    /// Default keeps the historical behavior: refresh every cycle, only the
    /// persisted hash write is gated.
    #[serde(default)]
    pub redraw_only_on_change: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key, config-supplied
    pub api_key: String,
    #[serde(default = "default_latitude")]
    pub lat: f64,
    #[serde(default = "default_longitude")]
    pub lon: f64,
}

fn default_hash_file() -> PathBuf {
    PathBuf::from("/tmp/.pihole-dashboard-output")
}

fn default_latitude() -> f64 {
    12.9558
}

fn default_longitude() -> f64 {
    77.71
}

impl Config {
    pub fn rotated(&self) -> bool {
        self.is_rotated == 1
    }
}

/// Public entry point: read the TOML file, parse, validate.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.interface.is_empty() {
        return Err(ConfigError::Validation("interface must not be empty".into()));
    }
    if cfg.pihole_ip.is_empty() {
        return Err(ConfigError::Validation("pihole_ip must not be empty".into()));
    }
    if cfg.is_rotated > 1 {
        return Err(ConfigError::Validation("is_rotated must be 0 or 1".into()));
    }
    if cfg.weather.api_key.is_empty() {
        return Err(ConfigError::Validation("weather.api_key must not be empty".into()));
    }
    if !(-90.0..=90.0).contains(&cfg.weather.lat) || !(-180.0..=180.0).contains(&cfg.weather.lon) {
        return Err(ConfigError::Validation("weather.lat/lon out of range".into()));
    }
    Ok(())
}
