/*
 *  display/renderer.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Layout of the report onto the panel canvas
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

use chrono::Local;
use embedded_graphics::mono_font::iso_8859_1::{FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use log::info;

use crate::display::error::DisplayError;
use crate::display::framebuffer::Frame;
use crate::display::traits::BoxedPanel;

/// Banner band height in pixels (y ∈ [105,122) on the reference 122-high
/// panel; proportional on anything else).
const BANNER_HEIGHT: u32 = 17;
/// Body text line pitch for the 9x15 font.
const LINE_PITCH: i32 = 16;
/// Banner label origin and right-hand clock offset.
const VERSION_X: i32 = 5;
const CLOCK_FROM_RIGHT: u32 = 100;

/// Draws report frames and pushes them to the panel.
///
/// The canvas is laid out landscape: its width is the panel's native height
/// and vice versa, matching how the 2.13" HAT is mounted.
pub struct Renderer {
    panel: BoxedPanel,
    rotated: bool,
}

impl Renderer {
    pub fn new(panel: BoxedPanel, rotated: bool) -> Self {
        Renderer { panel, rotated }
    }

    /// Compose one frame (body text plus banner) and push it. A fresh
    /// canvas is built on every call.
    pub fn render(&mut self, report: Option<&str>, version_label: &str) -> Result<(), DisplayError> {
        let (panel_w, panel_h) = self.panel.dimensions();
        let (canvas_w, canvas_h) = (panel_h, panel_w);
        let mut frame = Frame::new(canvas_w, canvas_h);

        let banner_top = canvas_h.saturating_sub(BANNER_HEIGHT) as i32;

        // banner/status bar across the bottom band
        Rectangle::new(
            Point::new(0, banner_top),
            Size::new(canvas_w, BANNER_HEIGHT),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut frame)
        .map_err(|e| DisplayError::Drawing(format!("{:?}", e)))?;

        // body text, top-left origin
        if let Some(text) = report {
            let body = MonoTextStyle::new(&FONT_9X15, BinaryColor::On);
            for (i, line) in text.lines().enumerate() {
                Text::with_baseline(
                    &drawable(line),
                    Point::new(0, i as i32 * LINE_PITCH),
                    body,
                    Baseline::Top,
                )
                .draw(&mut frame)
                .map_err(|e| DisplayError::Drawing(format!("{:?}", e)))?;
            }
        }

        // banner strings, light-on-dark
        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);
        let time_string = format!("Updated: {}", Local::now().format("%H:%M:%S"));
        Text::with_baseline(
            &drawable(version_label),
            Point::new(VERSION_X, banner_top + 1),
            small,
            Baseline::Top,
        )
        .draw(&mut frame)
        .map_err(|e| DisplayError::Drawing(format!("{:?}", e)))?;
        Text::with_baseline(
            &time_string,
            Point::new(canvas_w.saturating_sub(CLOCK_FROM_RIGHT) as i32, banner_top + 1),
            small,
            Baseline::Top,
        )
        .draw(&mut frame)
        .map_err(|e| DisplayError::Drawing(format!("{:?}", e)))?;

        if self.rotated {
            frame.rotate180();
        }

        let buffer = frame.pack_for_panel(panel_w, panel_h)?;
        info!(
            "pushing {}x{} frame ({} bytes) to panel",
            canvas_w,
            canvas_h,
            buffer.len()
        );
        self.panel.push_frame(&buffer)
    }

    /// Park the panel controller after the cycle.
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        self.panel.sleep()
    }
}

/// The report markers live outside the ISO 8859-1 glyph set the mono fonts
/// cover; substitute them at draw time only. The hashed report text is
/// never touched.
fn drawable(line: &str) -> String {
    line.replace('✓', "+").replace('✗', "x")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockPanel;

    fn unpack(buffer: &[u8], panel_w: u32, x: u32, y: u32) -> bool {
        // true = white
        let row_bytes = (panel_w as usize + 7) / 8;
        let byte = buffer[x as usize / 8 + y as usize * row_bytes];
        byte & (0x80 >> (x % 8)) != 0
    }

    #[test]
    fn pushes_one_correctly_sized_frame() {
        let panel = MockPanel::new(122, 250);
        let state = panel.state();
        let mut renderer = Renderer::new(Box::new(panel), false);

        renderer.render(Some("hello\nworld"), "pihole-dashboard v0.3.0").unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.frames.len(), 1);
        assert_eq!(state.frames[0].len(), 16 * 250);
    }

    #[test]
    fn banner_band_is_dark_and_body_has_ink() {
        let panel = MockPanel::new(122, 250);
        let state = panel.state();
        let mut renderer = Renderer::new(Box::new(panel), false);

        renderer.render(Some("[✓] line one"), "v1").unwrap();

        let state = state.lock().unwrap();
        let buffer = &state.frames[0];

        // canvas (x=80, y=110) sits inside the banner, clear of both banner
        // strings; it maps to native (nx=y, ny=panel_h-1-x)
        assert!(!unpack(buffer, 122, 110, 250 - 1 - 80));
        // the canvas row just above the banner is blank at the same column
        assert!(unpack(buffer, 122, 104, 250 - 1 - 80));
        // body text leaves ink above the banner band: native x < 105 is
        // canvas y < 105, i.e. bytes 0..13 of each 16-byte native row
        let body_black: usize = buffer
            .chunks(16)
            .map(|row| row[..13].iter().map(|b| b.count_zeros() as usize).sum::<usize>())
            .sum();
        assert!(body_black > 0);
    }

    #[test]
    fn rotation_flips_the_banner_to_the_other_edge() {
        let panel = MockPanel::new(122, 250);
        let state = panel.state();
        let mut renderer = Renderer::new(Box::new(panel), true);

        renderer.render(None, "v1").unwrap();

        let state = state.lock().unwrap();
        let buffer = &state.frames[0];
        // rotated: the banner occupies canvas y in [0,17), i.e. the top band;
        // probe x=125, clear of both rotated banner strings
        assert!(!unpack(buffer, 122, 3, 250 - 1 - 125));
        assert!(unpack(buffer, 122, 115, 250 - 1 - 125));
    }

    #[test]
    fn markers_are_substituted_for_drawing_only() {
        assert_eq!(drawable("[✓] ok [✗] bad"), "[+] ok [x] bad");
        // latin-1 glyphs pass through
        assert_eq!(drawable("21.5°C ×"), "21.5°C ×");
    }
}
