/*
 *  report.rs
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
//! Composition of the five-line status report. Pure: all inputs are passed
//! in, including the clock, so identical data always yields identical text.

use chrono::{DateTime, Local};

use crate::metrics::SystemReadings;
use crate::netinfo::{self, NetInfoError};
use crate::pihole::Summary;
use crate::weather::{WeatherError, WeatherSample};

/// The fixed five-line report. Line order is meaningful and stable; each
/// line is pre-formatted by its producer and fits the panel's text region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub network: String,
    pub weather: String,
    pub system: String,
    pub clients: String,
    pub blocked: String,
}

impl Report {
    pub fn lines(&self) -> [&str; 5] {
        [
            &self.network,
            &self.weather,
            &self.system,
            &self.clients,
            &self.blocked,
        ]
    }

    /// The exact byte content that is hashed and rendered.
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

/// Assemble a report from the independently gathered (and independently
/// failable) sources. Appliance counters are required; everything else
/// degrades to a failure marker on its own line.
pub fn compose(
    ip: Result<String, NetInfoError>,
    weather: Result<WeatherSample, WeatherError>,
    readings: &SystemReadings,
    summary: &Summary,
    now: DateTime<Local>,
) -> Report {
    Report {
        network: network_line(&ip, now),
        weather: weather_line(&weather),
        system: system_line(readings),
        clients: format!(
            "[✓] There are {} clients connected",
            summary.unique_clients
        ),
        blocked: format!("[✓] Blocked {} ads", summary.ads_blocked_today),
    }
}

fn network_line(ip: &Result<String, NetInfoError>, now: DateTime<Local>) -> String {
    match ip {
        Ok(addr) if netinfo::is_valid_ipv4(addr) => {
            format!("[✓] {}", now.format("%A, %B %d"))
        }
        _ => "[×] Can't get IP address".to_string(),
    }
}

fn weather_line(weather: &Result<WeatherSample, WeatherError>) -> String {
    match weather {
        Ok(sample) => format!(
            "[✓] {:.1}°C, {}",
            sample.temp_c,
            capitalize(&sample.description)
        ),
        Err(e) => format!("[✗] Weather: Error:{}, Failed to fetch", e.status_code()),
    }
}

fn system_line(readings: &SystemReadings) -> String {
    format!(
        "[✓] T:{} L:{:.1} M:{}",
        readings.temperature, readings.load_avg, readings.memory
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
