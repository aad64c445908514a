/*
 *  display/drivers/interface.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Command/data SPI plumbing shared by the Waveshare panel drivers
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

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use log::debug;

use crate::display::error::DisplayError;

/// Waveshare e-paper HAT wiring (BCM numbering; CS is CE0 on spidev0.0).
pub const SPI_DEVICE: &str = "/dev/spidev0.0";
pub const GPIO_CHIP: &str = "/dev/gpiochip0";
pub const RST_PIN: u32 = 17;
pub const DC_PIN: u32 = 25;
pub const BUSY_PIN: u32 = 24;

const SPI_SPEED_HZ: u32 = 4_000_000;
/// spidev default transfer size limit
const SPI_CHUNK: usize = 4096;

const CONSUMER: &str = "pihole-dashboard";

/// 4-wire SPI link to an e-paper controller: data/command select, reset,
/// and a busy line the controller holds high while refreshing.
pub struct EpdInterface {
    spi: SpidevDevice,
    dc: CdevPin,
    rst: CdevPin,
    busy: CdevPin,
    delay: Delay,
}

impl EpdInterface {
    /// Open the default HAT wiring.
    pub fn open() -> Result<Self, DisplayError> {
        Self::open_with(SPI_DEVICE, GPIO_CHIP, RST_PIN, DC_PIN, BUSY_PIN)
    }

    pub fn open_with(
        spi_path: &str,
        gpio_chip: &str,
        rst_pin: u32,
        dc_pin: u32,
        busy_pin: u32,
    ) -> Result<Self, DisplayError> {
        debug!("opening {} and {}", spi_path, gpio_chip);

        let mut spi = SpidevDevice::open(spi_path)
            .map_err(|e| DisplayError::Spi(format!("failed to open {}: {:?}", spi_path, e)))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.0
            .configure(&options)
            .map_err(|e| DisplayError::Spi(format!("failed to configure {}: {}", spi_path, e)))?;

        let mut chip = Chip::new(gpio_chip)
            .map_err(|e| DisplayError::Gpio(format!("failed to open {}: {}", gpio_chip, e)))?;

        let mut output = |pin: u32, name: &str| -> Result<CdevPin, DisplayError> {
            let handle = chip
                .get_line(pin)
                .and_then(|line| line.request(LineRequestFlags::OUTPUT, 0, CONSUMER))
                .map_err(|e| DisplayError::Gpio(format!("{} (BCM {}): {}", name, pin, e)))?;
            CdevPin::new(handle)
                .map_err(|e| DisplayError::Gpio(format!("{} (BCM {}): {:?}", name, pin, e)))
        };

        let rst = output(rst_pin, "RST")?;
        let dc = output(dc_pin, "DC")?;

        let busy_handle = chip
            .get_line(busy_pin)
            .and_then(|line| line.request(LineRequestFlags::INPUT, 0, CONSUMER))
            .map_err(|e| DisplayError::Gpio(format!("BUSY (BCM {}): {}", busy_pin, e)))?;
        let busy = CdevPin::new(busy_handle)
            .map_err(|e| DisplayError::Gpio(format!("BUSY (BCM {}): {:?}", busy_pin, e)))?;

        Ok(EpdInterface {
            spi,
            dc,
            rst,
            busy,
            delay: Delay,
        })
    }

    /// Hardware reset pulse.
    pub fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(gpio_err)?;
        self.delay.delay_ms(20);
        self.rst.set_low().map_err(gpio_err)?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(gpio_err)?;
        self.delay.delay_ms(20);
        Ok(())
    }

    pub fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(gpio_err)?;
        self.spi
            .write(&[cmd])
            .map_err(|e| DisplayError::Spi(format!("command 0x{:02X}: {:?}", cmd, e)))
    }

    pub fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(gpio_err)?;
        for chunk in data.chunks(SPI_CHUNK) {
            self.spi
                .write(chunk)
                .map_err(|e| DisplayError::Spi(format!("data write: {:?}", e)))?;
        }
        Ok(())
    }

    pub fn cmd_with_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.command(cmd)?;
        self.data(data)
    }

    /// Block until the controller drops its busy line. Full refreshes on
    /// these panels take a couple of seconds.
    pub fn wait_idle(&mut self) -> Result<(), DisplayError> {
        while self
            .busy
            .is_high()
            .map_err(|e| DisplayError::Gpio(format!("BUSY read: {:?}", e)))?
        {
            self.delay.delay_ms(10);
        }
        Ok(())
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

fn gpio_err<E: core::fmt::Debug>(e: E) -> DisplayError {
    DisplayError::Gpio(format!("{:?}", e))
}
