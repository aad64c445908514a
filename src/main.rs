/*
 *  main.rs
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

use anyhow::{anyhow, bail, Context};
use chrono::Local;
use clap::{ArgAction, Parser, ValueHint};
use env_logger::Env;
use log::{error, info, warn};
use std::path::PathBuf;

use pihole_dashboard::config::{self, Config, DEFAULT_CONFIG_FILE};
use pihole_dashboard::display::traits::PanelDriver;
use pihole_dashboard::display::{self, Renderer};
use pihole_dashboard::gate::ChangeGate;
use pihole_dashboard::metrics;
use pihole_dashboard::netinfo;
use pihole_dashboard::pihole::{self, PiholeClient, PiholeError};
use pihole_dashboard::report;
use pihole_dashboard::weather::WeatherClient;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Diagnostic shown on the panel when the summary API response is unusable.
const API_ERROR_NOTICE: &str = "Error from API.\nRun pihole-dashboard\nfor details.";

#[derive(Debug, Parser)]
#[command(name = "pihole-dashboard", version, about = "Pi-hole stats on an e-ink panel")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        Env::default().default_filter_or(if cli.debug { "debug" } else { "info" }),
    )
    .format_timestamp_secs()
    .init();

    info!(
        "{} v{} built {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE
    );

    if unsafe { libc::geteuid() } != 0 {
        bail!("You need root permissions to access the e-ink display, try running with sudo!");
    }

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let cfg = config::load(&config_path)
        .with_context(|| format!("config can't be parsed, check {}", config_path.display()))?;

    let mut panel = display::create_panel(cfg.screen_type)?;
    panel.init()?;
    let mut renderer = Renderer::new(panel, cfg.rotated());

    run_cycle(&cfg, &mut renderer).await
}

/// One full update cycle. Periodicity comes from an external scheduler;
/// every external call here is attempted exactly once.
async fn run_cycle(cfg: &Config, renderer: &mut Renderer) -> anyhow::Result<()> {
    let pihole_client = PiholeClient::new(cfg);
    let weather_client = WeatherClient::new(&cfg.weather);

    let version_label = pihole::version().unwrap_or_else(|e| {
        warn!("pihole version unavailable: {}", e);
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    });

    // The summary counters are required: a malformed response poisons the
    // whole report, so render a notice and terminate.
    let summary = match pihole_client.summary().await {
        Ok(summary) => summary,
        Err(
            e @ PiholeError::MissingField { .. } | e @ PiholeError::BadField { .. },
        ) => {
            error!("malformed summary response: {}", e);
            renderer.render(Some(API_ERROR_NOTICE), &version_label)?;
            let _ = renderer.sleep();
            return Err(anyhow!("API response: {}", e));
        }
        Err(e) => return Err(e.into()),
    };

    match pihole::status() {
        Ok(status) => info!("Pi-hole blocking: {:?}", status),
        Err(e) => warn!("pihole status unavailable: {}", e),
    }

    // Per-source failures degrade their report line, nothing more.
    let ip = netinfo::interface_ipv4(&cfg.interface);
    if let Err(e) = &ip {
        warn!("IP lookup failed: {}", e);
    }
    let conditions = weather_client.current().await;
    if let Err(e) = &conditions {
        warn!("weather fetch failed: {}", e);
    }
    let readings = metrics::collect();

    let report = report::compose(ip, conditions, &readings, &summary, Local::now());
    let text = report.to_text();

    let gate = ChangeGate::new(&cfg.hash_file);
    let changed = gate.check_and_update(&text)?;
    info!(
        "report {}",
        if changed { "changed, hash updated" } else { "unchanged" }
    );

    if changed || !cfg.redraw_only_on_change {
        renderer.render(Some(&text), &version_label)?;
    } else {
        info!("skipping panel refresh (redraw_only_on_change set)");
    }

    renderer.sleep()?;
    Ok(())
}
