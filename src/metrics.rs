/*
 *  metrics.rs
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
//! System metrics gathered from /proc and /sys files.
//!
//! Every reading is best-effort: the system line of the report is always
//! rendered, so failures degrade to placeholder values instead of errors.

use std::fs;

const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
const LOADAVG: &str = "/proc/loadavg";
const MEMINFO: &str = "/proc/meminfo";

/// One snapshot of the readings the system report line consumes,
/// pre-formatted by the producer (the report does no wrapping or rounding).
#[derive(Debug, Clone, PartialEq)]
pub struct SystemReadings {
    /// CPU temperature, e.g. `"42.8°C"`, or `"Temp not available"`
    pub temperature: String,
    /// 15-minute load average
    pub load_avg: f64,
    /// Used memory percentage, e.g. `"23.45%"`
    pub memory: String,
}

/// Collect a snapshot of temperature, load and memory usage.
pub fn collect() -> SystemReadings {
    SystemReadings {
        temperature: read_temperature(),
        load_avg: read_load_avg(),
        memory: read_memory_usage(),
    }
}

fn read_temperature() -> String {
    match fs::read_to_string(THERMAL_ZONE) {
        Ok(content) => format_temperature(&content),
        Err(_) => "Temp not available".to_string(),
    }
}

fn read_load_avg() -> f64 {
    match fs::read_to_string(LOADAVG) {
        Ok(content) => parse_loadavg(&content).unwrap_or(0.0),
        Err(_) => 0.0,
    }
}

fn read_memory_usage() -> String {
    match fs::read_to_string(MEMINFO) {
        Ok(content) => match parse_meminfo(&content) {
            Some(pct) => format!("{:.2}%", pct),
            None => "0.00%".to_string(),
        },
        Err(_) => "0.00%".to_string(),
    }
}

/// Thermal zone files hold millidegrees Celsius.
fn format_temperature(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(millideg) => format!("{:.1}°C", millideg / 1000.0),
        Err(_) => "Temp not available".to_string(),
    }
}

/// Third whitespace-separated field of /proc/loadavg is the 15-minute average.
fn parse_loadavg(content: &str) -> Option<f64> {
    content.split_whitespace().nth(2)?.parse::<f64>().ok()
}

/// Used-memory percentage from MemTotal and MemAvailable (both in kiB).
fn parse_meminfo(content: &str) -> Option<f64> {
    let mut total: Option<f64> = None;
    let mut avail: Option<f64> = None;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("MemTotal:") => total = parts.next()?.parse().ok(),
            Some("MemAvailable:") => avail = parts.next()?.parse().ok(),
            _ => {}
        }
        if total.is_some() && avail.is_some() {
            break;
        }
    }

    let total = total?;
    let avail = avail?;
    if total <= 0.0 {
        return None;
    }
    Some((1.0 - avail / total) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_millidegrees() {
        assert_eq!(format_temperature("42750\n"), "42.8°C");
        assert_eq!(format_temperature("55100"), "55.1°C");
    }

    #[test]
    fn garbage_temperature_degrades() {
        assert_eq!(format_temperature("not-a-number"), "Temp not available");
    }

    #[test]
    fn loadavg_takes_fifteen_minute_field() {
        let content = "0.52 0.58 0.59 1/120 4567\n";
        assert_eq!(parse_loadavg(content), Some(0.59));
        assert_eq!(parse_loadavg("0.1 0.2"), None);
    }

    #[test]
    fn meminfo_percentage() {
        let content = "MemTotal:       1000000 kB\n\
                       MemFree:         200000 kB\n\
                       MemAvailable:    750000 kB\n";
        let pct = parse_meminfo(content).unwrap();
        assert!((pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn meminfo_missing_fields() {
        assert_eq!(parse_meminfo("MemFree: 1234 kB\n"), None);
        assert_eq!(parse_meminfo(""), None);
    }
}
