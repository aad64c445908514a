/*
 *  display/factory.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Panel driver selection from configuration
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

use crate::config::ScreenKind;
use crate::display::drivers::epd2in13_v2::Epd2in13V2;
use crate::display::drivers::epd2in13_v4::Epd2in13V4;
use crate::display::error::DisplayError;
use crate::display::traits::BoxedPanel;

/// Build the panel driver selected by `screen_type`.
pub fn create_panel(kind: ScreenKind) -> Result<BoxedPanel, DisplayError> {
    let panel: BoxedPanel = match kind {
        ScreenKind::Epd2in13V2 => {
            info!("selected panel: Waveshare 2.13\" V2");
            Box::new(Epd2in13V2::new()?)
        }
        ScreenKind::Epd2in13V3 => {
            info!("selected panel: Waveshare 2.13\" V3 (V4 controller)");
            Box::new(Epd2in13V4::new()?)
        }
    };
    Ok(panel)
}
