/*
 *  display/drivers/epd2in13_v2.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Waveshare 2.13" V2 panel driver (SSD1675-class controller)
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

/// Full-update waveform table from the vendor reference code.
#[rustfmt::skip]
const LUT_FULL_UPDATE: [u8; 70] = [
    0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // LUT0: BB
    0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // LUT1: BW
    0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // LUT2: WB
    0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // LUT3: WW
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // LUT4: VCOM
    0x03, 0x03, 0x00, 0x00, 0x02,             // TP0/RP0
    0x09, 0x09, 0x00, 0x00, 0x02,             // TP1/RP1
    0x03, 0x03, 0x00, 0x00, 0x02,             // TP2/RP2
    0x00, 0x00, 0x00, 0x00, 0x00,             // TP3/RP3
    0x00, 0x00, 0x00, 0x00, 0x00,             // TP4/RP4
    0x00, 0x00, 0x00, 0x00, 0x00,             // TP5/RP5
    0x00, 0x00, 0x00, 0x00, 0x00,             // TP6/RP6
];

pub struct Epd2in13V2 {
    iface: EpdInterface,
    capabilities: PanelCapabilities,
}

impl Epd2in13V2 {
    pub fn new() -> Result<Self, DisplayError> {
        Ok(Epd2in13V2 {
            iface: EpdInterface::open()?,
            capabilities: PanelCapabilities {
                width: WIDTH,
                height: HEIGHT,
                encoding: PixelEncoding::PackedMsbWhite,
                full_refresh_ms: 2000,
            },
        })
    }

    fn turn_on(&mut self) -> Result<(), DisplayError> {
        self.iface.cmd_with_data(0x22, &[0xC7])?; // display update control 2
        self.iface.command(0x20)?; // master activation
        self.iface.wait_idle()
    }
}

impl PanelDriver for Epd2in13V2 {
    fn capabilities(&self) -> &PanelCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        info!("initializing 2.13\" V2 panel (full update mode)");
        self.iface.reset()?;

        self.iface.wait_idle()?;
        self.iface.command(0x12)?; // software reset
        self.iface.wait_idle()?;

        self.iface.cmd_with_data(0x74, &[0x54])?; // analog block control
        self.iface.cmd_with_data(0x7E, &[0x3B])?; // digital block control
        self.iface.cmd_with_data(0x01, &[0xF9, 0x00, 0x00])?; // driver output: 250 lines
        self.iface.cmd_with_data(0x11, &[0x01])?; // data entry: y dec, x inc
        self.iface.cmd_with_data(0x44, &[0x00, 0x0F])?; // ram x: 0..=15 (16 bytes)
        self.iface.cmd_with_data(0x45, &[0xF9, 0x00, 0x00, 0x00])?; // ram y: 249..=0
        self.iface.cmd_with_data(0x3C, &[0x03])?; // border waveform
        self.iface.cmd_with_data(0x2C, &[0x55])?; // vcom
        self.iface.cmd_with_data(0x03, &[0x15])?; // gate driving voltage
        self.iface.cmd_with_data(0x04, &[0x41, 0xA8, 0x32])?; // source driving voltage
        self.iface.cmd_with_data(0x3A, &[0x30])?; // dummy line period
        self.iface.cmd_with_data(0x3B, &[0x0A])?; // gate line width
        self.iface.cmd_with_data(0x32, &LUT_FULL_UPDATE)?;
        self.iface.cmd_with_data(0x4E, &[0x00])?; // ram x counter
        self.iface.cmd_with_data(0x4F, &[0xF9, 0x00])?; // ram y counter
        self.iface.wait_idle()
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
