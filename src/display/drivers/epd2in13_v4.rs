/*
 *  display/drivers/epd2in13_v4.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Waveshare 2.13" V4 controller driver (fitted to the V3 HAT revision,
 *  selected by screen_type "213v3")
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

use log::info;

use crate::display::drivers::interface::EpdInterface;
use crate::display::error::DisplayError;
use crate::display::traits::{PanelCapabilities, PanelDriver, PixelEncoding};

pub const WIDTH: u32 = 122;
pub const HEIGHT: u32 = 250;

pub struct Epd2in13V4 {
    iface: EpdInterface,
    capabilities: PanelCapabilities,
}

impl Epd2in13V4 {
    pub fn new() -> Result<Self, DisplayError> {
        Ok(Epd2in13V4 {
            iface: EpdInterface::open()?,
            capabilities: PanelCapabilities {
                width: WIDTH,
                height: HEIGHT,
                encoding: PixelEncoding::PackedMsbWhite,
                full_refresh_ms: 1800,
            },
        })
    }

    fn turn_on(&mut self) -> Result<(), DisplayError> {
        self.iface.cmd_with_data(0x22, &[0xF7])?; // display update control 2
        self.iface.command(0x20)?; // master activation
        self.iface.wait_idle()
    }
}

impl PanelDriver for Epd2in13V4 {
    fn capabilities(&self) -> &PanelCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        info!("initializing 2.13\" V4 panel");
        self.iface.reset()?;

        self.iface.wait_idle()?;
        self.iface.command(0x12)?; // software reset
        self.iface.wait_idle()?;

        self.iface.cmd_with_data(0x01, &[0xF9, 0x00, 0x00])?; // driver output: 250 lines
        self.iface.cmd_with_data(0x11, &[0x03])?; // data entry: x inc, y inc
        self.iface.cmd_with_data(0x44, &[0x00, 0x0F])?; // ram x: 0..=15 (16 bytes)
        self.iface.cmd_with_data(0x45, &[0x00, 0x00, 0xF9, 0x00])?; // ram y: 0..=249
        self.iface.cmd_with_data(0x4E, &[0x00])?; // ram x counter
        self.iface.cmd_with_data(0x4F, &[0x00, 0x00])?; // ram y counter
        self.iface.cmd_with_data(0x3C, &[0x05])?; // border waveform
        self.iface.cmd_with_data(0x21, &[0x00, 0x80])?; // display update control
        self.iface.cmd_with_data(0x18, &[0x80])?; // internal temperature sensor
        self.iface.wait_idle()?;

        // the vendor sequence blanks this controller after waveform setup
        self.clear()
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let blank = vec![0xFFu8; self.capabilities.frame_bytes()];
        self.iface.cmd_with_data(0x24, &blank)?;
        self.turn_on()
    }

    fn push_frame(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        let expected = self.capabilities.frame_bytes();
        if buffer.len() != expected {
            return Err(DisplayError::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        self.iface.cmd_with_data(0x24, buffer)?; // write b/w ram
        self.turn_on()
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        self.iface.cmd_with_data(0x10, &[0x01])?; // deep sleep mode 1
        self.iface.delay_ms(100);
        Ok(())
    }
}
