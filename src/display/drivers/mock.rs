/*
 *  display/drivers/mock.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Mock panel driver for testing without hardware
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

use std::sync::{Arc, Mutex};

use crate::display::error::DisplayError;
use crate::display::traits::{PanelCapabilities, PanelDriver, PixelEncoding};

/// Mock panel for unit and integration tests. Records all operations in a
/// shared state handle that stays inspectable after the driver is boxed
/// and moved into the renderer.
#[derive(Debug, Clone)]
pub struct MockPanel {
    capabilities: PanelCapabilities,
    state: Arc<Mutex<MockPanelState>>,
}

#[derive(Debug, Default)]
pub struct MockPanelState {
    pub init_count: usize,
    pub clear_count: usize,
    pub sleep_count: usize,

    /// Every buffer handed to `push_frame`, in order
    pub frames: Vec<Vec<u8>>,

    /// Error injection for failure-path tests
    pub simulate_push_failure: bool,
}

impl MockPanel {
    pub fn new(width: u32, height: u32) -> Self {
        MockPanel {
            capabilities: PanelCapabilities {
                width,
                height,
                encoding: PixelEncoding::PackedMsbWhite,
                full_refresh_ms: 0,
            },
            state: Arc::new(Mutex::new(MockPanelState::default())),
        }
    }

    /// Reference 2.13" geometry.
    pub fn new_2in13() -> Self {
        Self::new(122, 250)
    }

    /// Handle for inspecting recorded operations in tests.
    pub fn state(&self) -> Arc<Mutex<MockPanelState>> {
        Arc::clone(&self.state)
    }
}

impl PanelDriver for MockPanel {
    fn capabilities(&self) -> &PanelCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.state.lock().unwrap().init_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.state.lock().unwrap().clear_count += 1;
        Ok(())
    }

    fn push_frame(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        let expected = self.capabilities.frame_bytes();
        if buffer.len() != expected {
            return Err(DisplayError::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        let mut state = self.state.lock().unwrap();
        if state.simulate_push_failure {
            return Err(DisplayError::Spi("simulated push failure".to_string()));
        }
        state.frames.push(buffer.to_vec());
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        self.state.lock().unwrap().sleep_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_frames_and_counts() {
        let mut panel = MockPanel::new_2in13();
        let state = panel.state();

        panel.init().unwrap();
        panel.push_frame(&vec![0xFF; 16 * 250]).unwrap();
        panel.sleep().unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.init_count, 1);
        assert_eq!(state.frames.len(), 1);
        assert_eq!(state.sleep_count, 1);
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let mut panel = MockPanel::new_2in13();
        assert!(matches!(
            panel.push_frame(&[0u8; 3]),
            Err(DisplayError::BufferSizeMismatch { expected: 4000, actual: 3 })
        ));
    }

    #[test]
    fn simulated_failure_surfaces() {
        let mut panel = MockPanel::new_2in13();
        panel.state().lock().unwrap().simulate_push_failure = true;
        assert!(panel.push_frame(&vec![0xFF; 16 * 250]).is_err());
    }
}
