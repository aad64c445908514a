/*
 *  display/error.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Unified error types for the display subsystem
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

use thiserror::Error;

/// Unified error type for all panel operations.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("panel initialization failed: {0}")]
    InitializationFailed(String),

    #[error("SPI communication error: {0}")]
    Spi(String),

    #[error("GPIO error: {0}")]
    Gpio(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("frame buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("canvas {canvas_w}x{canvas_h} does not match panel {panel_w}x{panel_h} in either orientation")]
    OrientationMismatch {
        canvas_w: u32,
        canvas_h: u32,
        panel_w: u32,
        panel_h: u32,
    },

    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("{0}")]
    Other(String),
}
