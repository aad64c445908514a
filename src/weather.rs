/*
 *  weather.rs
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

use log::debug;
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::WeatherConfig;

const OWM_CURRENT_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Error type for weather API operations. All variants are recoverable:
/// the weather line degrades, the rest of the report is still produced.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather API returned status {0}")]
    Status(u16),
    #[error("malformed weather response: {0}")]
    Malformed(&'static str),
}

impl WeatherError {
    /// Numeric code for the report line. Non-HTTP failures report 0 so the
    /// line template stays fixed.
    pub fn status_code(&self) -> u16 {
        match self {
            WeatherError::Status(code) => *code,
            _ => 0,
        }
    }
}

/// Current conditions, already in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub temp_c: f64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    weather: Vec<Condition>,
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    lat: f64,
    lon: f64,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        const VERSION: &str =
            concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Connection", header::HeaderValue::from_static("close"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(5))
            .default_headers(headers)
            .build()
            .unwrap(); // panics only if the client cannot be built at startup

        WeatherClient {
            client,
            api_key: config.api_key.clone(),
            lat: config.lat,
            lon: config.lon,
        }
    }

    /// Fetch the current conditions for the configured coordinate.
    pub async fn current(&self) -> Result<WeatherSample, WeatherError> {
        debug!("fetching weather for ({}, {})", self.lat, self.lon);
        let response = self
            .client
            .get(OWM_CURRENT_URL)
            .query(&[
                ("lat", self.lat.to_string()),
                ("lon", self.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_current(&body)
    }
}

/// Decode a current-weather body into a sample.
pub fn parse_current(body: &str) -> Result<WeatherSample, WeatherError> {
    let decoded: CurrentResponse =
        serde_json::from_str(body).map_err(|_| WeatherError::Malformed("body"))?;
    let condition = decoded
        .weather
        .first()
        .ok_or(WeatherError::Malformed("empty weather array"))?;
    Ok(WeatherSample {
        temp_c: decoded.main.temp,
        description: condition.description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_conditions() {
        let body = r#"{
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
            "main": {"temp": 21.5, "humidity": 40}
        }"#;
        let sample = parse_current(body).unwrap();
        assert_eq!(sample.temp_c, 21.5);
        assert_eq!(sample.description, "clear sky");
    }

    #[test]
    fn empty_weather_array_is_malformed() {
        let body = r#"{"weather": [], "main": {"temp": 1.0}}"#;
        assert!(matches!(
            parse_current(body),
            Err(WeatherError::Malformed(_))
        ));
    }

    #[test]
    fn junk_body_is_malformed() {
        assert!(parse_current("<html>down</html>").is_err());
    }

    #[test]
    fn status_codes_surface_for_the_report() {
        assert_eq!(WeatherError::Status(500).status_code(), 500);
        assert_eq!(WeatherError::Malformed("body").status_code(), 0);
    }
}
