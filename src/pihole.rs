/*
 *  pihole.rs
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
use serde_json::Value;
use std::process::Command;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Location of the Pi-hole CLI binary.
const PIHOLE_BIN: &str = "/usr/local/bin/pihole";

/// Error type for Pi-hole API and CLI operations.
///
/// `MissingField` is the one fatal-per-cycle variant: a summary response
/// without the expected counters cannot be trusted at all, so the caller
/// renders a diagnostic and terminates instead of degrading a single line.
#[derive(Debug, Error)]
pub enum PiholeError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API response missing `{field}`: {response}")]
    MissingField { field: &'static str, response: Value },
    #[error("`{field}` is not an unsigned integer in: {response}")]
    BadField { field: &'static str, response: Value },
    #[error("failed to run `{0}`: {1}")]
    Command(String, #[source] std::io::Error),
    #[error("unexpected `pihole {command}` output: {detail}")]
    Parse { command: &'static str, detail: String },
}

/// Counters extracted from the summary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub unique_clients: u64,
    pub ads_blocked_today: u64,
}

/// Blocking state parsed from `pihole status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingStatus {
    Enabled,
    Disabled,
}

/// Client for the local Pi-hole admin API.
#[derive(Debug)]
pub struct PiholeClient {
    client: Client,
    summary_url: String,
}

impl PiholeClient {
    /// Creates a new `PiholeClient` with populated headers and timeouts.
    pub fn new(config: &Config) -> Self {
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

        let summary_url = format!(
            "http://{}:{}/admin/api.php?summary&auth={}",
            config.pihole_ip, config.pihole_port, config.pihole_api_token
        );

        PiholeClient { client, summary_url }
    }

    /// Fetch today's summary counters.
    pub async fn summary(&self) -> Result<Summary, PiholeError> {
        debug!("fetching Pi-hole summary");
        let response: Value = self
            .client
            .get(&self.summary_url)
            .send()
            .await?
            .json()
            .await?;
        extract_summary(&response)
    }
}

/// Pull the two counters out of a summary response, escalating missing or
/// mistyped keys with the raw response attached for diagnostics.
pub fn extract_summary(response: &Value) -> Result<Summary, PiholeError> {
    let field = |name: &'static str| -> Result<u64, PiholeError> {
        let v = response.get(name).ok_or_else(|| PiholeError::MissingField {
            field: name,
            response: response.clone(),
        })?;
        v.as_u64().ok_or_else(|| PiholeError::BadField {
            field: name,
            response: response.clone(),
        })
    };

    Ok(Summary {
        unique_clients: field("unique_clients")?,
        ads_blocked_today: field("ads_blocked_today")?,
    })
}

/// Version label for the banner: first output line of `pihole -v`,
/// text before the parenthesis, trimmed.
pub fn version() -> Result<String, PiholeError> {
    let output = Command::new(PIHOLE_BIN)
        .arg("-v")
        .output()
        .map_err(|e| PiholeError::Command(format!("{} -v", PIHOLE_BIN), e))?;
    parse_version_output(&String::from_utf8_lossy(&output.stdout))
}

/// Current blocking state from `pihole status`.
pub fn status() -> Result<BlockingStatus, PiholeError> {
    let output = Command::new(PIHOLE_BIN)
        .arg("status")
        .output()
        .map_err(|e| PiholeError::Command(format!("{} status", PIHOLE_BIN), e))?;
    parse_status_output(&String::from_utf8_lossy(&output.stdout))
}

pub fn parse_version_output(stdout: &str) -> Result<String, PiholeError> {
    let first = stdout.lines().next().unwrap_or("");
    let label = first.split('(').next().unwrap_or("").trim();
    if label.is_empty() {
        return Err(PiholeError::Parse {
            command: "-v",
            detail: format!("no version line in {:?}", first),
        });
    }
    Ok(label.to_string())
}

pub fn parse_status_output(stdout: &str) -> Result<BlockingStatus, PiholeError> {
    for line in stdout.lines() {
        if line.contains("blocking is") {
            return if line.contains("enabled") {
                Ok(BlockingStatus::Enabled)
            } else if line.contains("disabled") {
                Ok(BlockingStatus::Disabled)
            } else {
                Err(PiholeError::Parse {
                    command: "status",
                    detail: format!("unrecognized blocking line {:?}", line),
                })
            };
        }
    }
    Err(PiholeError::Parse {
        command: "status",
        detail: "no blocking line found".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_counters() {
        let response = json!({
            "unique_clients": 7,
            "ads_blocked_today": 1234,
            "dns_queries_today": 999
        });
        let summary = extract_summary(&response).unwrap();
        assert_eq!(summary.unique_clients, 7);
        assert_eq!(summary.ads_blocked_today, 1234);
    }

    #[test]
    fn missing_unique_clients_is_fatal() {
        let response = json!({ "ads_blocked_today": 1234 });
        match extract_summary(&response) {
            Err(PiholeError::MissingField { field, .. }) => {
                assert_eq!(field, "unique_clients")
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn mistyped_counter_is_fatal() {
        let response = json!({ "unique_clients": "7", "ads_blocked_today": 1 });
        assert!(matches!(
            extract_summary(&response),
            Err(PiholeError::BadField { field: "unique_clients", .. })
        ));
    }

    #[test]
    fn version_strips_parenthesis() {
        let out = "Pi-hole version is v5.17.3 (Latest: v5.18.4)\nAdminLTE version is v5.21\n";
        assert_eq!(
            parse_version_output(out).unwrap(),
            "Pi-hole version is v5.17.3"
        );
    }

    #[test]
    fn empty_version_output_errors() {
        assert!(parse_version_output("").is_err());
        assert!(parse_version_output("   (weird)").is_err());
    }

    #[test]
    fn status_lines_parse() {
        let enabled = "  [✓] FTL is listening on port 53\n  [✓] Pi-hole blocking is enabled\n";
        assert_eq!(parse_status_output(enabled).unwrap(), BlockingStatus::Enabled);

        let disabled = "  [✗] Pi-hole blocking is disabled\n";
        assert_eq!(parse_status_output(disabled).unwrap(), BlockingStatus::Disabled);
    }

    #[test]
    fn status_without_blocking_line_errors() {
        assert!(matches!(
            parse_status_output("nothing useful here\n"),
            Err(PiholeError::Parse { command: "status", .. })
        ));
    }
}
