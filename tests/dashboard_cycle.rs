/*
 *  tests/dashboard_cycle.rs
 *
 *  End-to-end compose -> gate -> render cycle on the mock panel
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 */

use chrono::{Local, TimeZone};
use std::fs;
use std::path::PathBuf;

use pihole_dashboard::display::drivers::mock::MockPanel;
use pihole_dashboard::display::traits::PanelDriver;
use pihole_dashboard::display::Renderer;
use pihole_dashboard::gate::{self, ChangeGate};
use pihole_dashboard::metrics::SystemReadings;
use pihole_dashboard::pihole::Summary;
use pihole_dashboard::report;
use pihole_dashboard::weather::WeatherSample;

fn scratch_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "pihole-dashboard-cycle-{}-{}",
        std::process::id(),
        tag
    ))
}

fn readings() -> SystemReadings {
    SystemReadings {
        temperature: "42.8°C".to_string(),
        load_avg: 0.5,
        memory: "23.45%".to_string(),
    }
}

fn compose_good_report() -> String {
    let now = Local.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    report::compose(
        Ok("192.168.1.1".to_string()),
        Ok(WeatherSample {
            temp_c: 21.5,
            description: "clear sky".to_string(),
        }),
        &readings(),
        &Summary {
            unique_clients: 7,
            ads_blocked_today: 1234,
        },
        now,
    )
    .to_text()
}

#[test]
fn full_cycle_renders_and_persists_hash() {
    let hash_path = scratch_path("full");
    let gate = ChangeGate::new(&hash_path);

    let text = compose_good_report();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3], "[✓] There are 7 clients connected");
    assert_eq!(lines[4], "[✓] Blocked 1234 ads");

    // first run: no persisted state, change is forced
    assert!(gate.check_and_update(&text).unwrap());
    assert_eq!(fs::read_to_string(&hash_path).unwrap(), gate::digest(&text));

    let mut panel = MockPanel::new_2in13();
    let state = panel.state();
    panel.init().unwrap();
    let mut renderer = Renderer::new(Box::new(panel), false);
    renderer.render(Some(&text), "Pi-hole version is v5.17.3").unwrap();
    renderer.sleep().unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.init_count, 1);
    assert_eq!(state.frames.len(), 1);
    assert_eq!(state.frames[0].len(), 16 * 250);
    assert_eq!(state.sleep_count, 1);

    fs::remove_file(&hash_path).unwrap();
}

#[test]
fn second_cycle_with_identical_content_keeps_hash_file_bytes() {
    let hash_path = scratch_path("stable");
    let gate = ChangeGate::new(&hash_path);

    let text = compose_good_report();
    assert!(gate.check_and_update(&text).unwrap());
    let first = fs::read(&hash_path).unwrap();

    // second cycle, same data: no rewrite, byte-for-byte identical file
    assert!(!gate.check_and_update(&text).unwrap());
    assert_eq!(fs::read(&hash_path).unwrap(), first);

    // any single field change flips the digest
    let other = text.replace("7 clients", "8 clients");
    assert!(gate.check_and_update(&other).unwrap());
    assert_ne!(fs::read(&hash_path).unwrap(), first);

    fs::remove_file(&hash_path).unwrap();
}

#[test]
fn render_is_idempotent_for_identical_reports() {
    let text = compose_good_report();

    let mut frames = Vec::new();
    for _ in 0..2 {
        let panel = MockPanel::new_2in13();
        let state = panel.state();
        let mut renderer = Renderer::new(Box::new(panel), false);
        renderer.render(Some(&text), "v5.17.3").unwrap();
        frames.push(state.lock().unwrap().frames[0].clone());
    }

    // identical report -> identical frame, modulo the banner clock, which
    // lives in the last 17 canvas rows = last two bytes of each native row
    let body = |frame: &Vec<u8>| -> Vec<u8> {
        frame
            .chunks(16)
            .flat_map(|row| row[..13].to_vec())
            .collect()
    };
    assert_eq!(body(&frames[0]), body(&frames[1]));
}

#[test]
fn api_error_notice_fits_and_renders() {
    let panel = MockPanel::new_2in13();
    let state = panel.state();
    let mut renderer = Renderer::new(Box::new(panel), false);

    renderer
        .render(
            Some("Error from API.\nRun pihole-dashboard\nfor details."),
            "pihole-dashboard v0.3.0",
        )
        .unwrap();

    assert_eq!(state.lock().unwrap().frames.len(), 1);
}
