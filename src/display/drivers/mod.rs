/*
 *  display/drivers/mod.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
 *
 *  Panel driver implementations
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

mod interface;

pub mod epd2in13_v2;
pub mod epd2in13_v4;

// Mock panel, compiled in so integration tests can use it
pub mod mock;
