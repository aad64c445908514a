/*
 *  display/traits.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Core trait definitions for the panel driver abstraction
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

use crate::display::error::DisplayError;

/// Buffer layout a panel expects from `push_frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelEncoding {
    /// 1 bit per pixel, 8 pixels per byte MSB first, bit set = white.
    /// Rows are padded up to a whole byte.
    /// Used by the Waveshare 2.13" black/white panels.
    PackedMsbWhite,
}

/// Static description of a panel.
#[derive(Debug, Clone)]
pub struct PanelCapabilities {
    /// Native width in pixels (portrait orientation)
    pub width: u32,

    /// Native height in pixels
    pub height: u32,

    /// Expected `push_frame` buffer layout
    pub encoding: PixelEncoding,

    /// Rough duration of a full refresh, for logging/pacing
    pub full_refresh_ms: u32,
}

impl PanelCapabilities {
    /// Bytes per native row after padding.
    pub fn row_bytes(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    /// Total `push_frame` buffer length in bytes.
    pub fn frame_bytes(&self) -> usize {
        self.row_bytes() * self.height as usize
    }
}

/// Minimal hardware abstraction every e-paper panel must implement.
///
/// The panel is the only privileged hardware resource in the program: it is
/// initialized once per process and stays open for the single update cycle.
pub trait PanelDriver: Send {
    /// Returns the capabilities of this panel
    fn capabilities(&self) -> &PanelCapabilities;

    /// Returns the native dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Initialize the panel controller (reset, waveform setup)
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Blank the panel to white
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Transfer one full frame, in the panel's `PixelEncoding`, and trigger
    /// a refresh. The buffer length must equal `capabilities().frame_bytes()`.
    fn push_frame(&mut self, buffer: &[u8]) -> Result<(), DisplayError>;

    /// Put the controller into deep sleep. E-paper keeps its image unpowered,
    /// so this is safe to call at the end of every cycle.
    fn sleep(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Boxed driver as produced by the factory.
pub type BoxedPanel = Box<dyn PanelDriver>;
