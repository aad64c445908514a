/*
 *  netinfo.rs
 *
 *  pihole-dashboard - Pi-hole stats on an e-ink panel
 *  (c) 2021-26 the pihole-dashboard authors
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

use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetInfoError {
    #[error("interface lookup failed: {0}")]
    Lookup(#[from] local_ip_address::Error),
    #[error("interface `{0}` not found")]
    NoSuchInterface(String),
    #[error("interface `{0}` has no IPv4 address")]
    NoIpv4(String),
}

/// Resolve the IPv4 address bound to `interface`, as a dotted-quad string.
pub fn interface_ipv4(interface: &str) -> Result<String, NetInfoError> {
    let ifas = local_ip_address::list_afinet_netifas()?;

    let mut seen = false;
    for (name, addr) in &ifas {
        if name != interface {
            continue;
        }
        seen = true;
        if let IpAddr::V4(v4) = addr {
            return Ok(v4.to_string());
        }
    }

    if seen {
        Err(NetInfoError::NoIpv4(interface.to_string()))
    } else {
        Err(NetInfoError::NoSuchInterface(interface.to_string()))
    }
}

/// Strict four-octet dotted-decimal check. Unlike `inet_aton`, octets
/// above 255 and short forms are rejected.
pub fn is_valid_ipv4(address: &str) -> bool {
    address.parse::<Ipv4Addr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dotted_quad() {
        assert!(is_valid_ipv4("192.168.1.1"));
        assert!(is_valid_ipv4("0.0.0.0"));
    }

    #[test]
    fn rejects_empty_string() {
        assert!(!is_valid_ipv4(""));
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert!(!is_valid_ipv4("999.999.999.999"));
        assert!(!is_valid_ipv4("256.0.0.1"));
    }

    #[test]
    fn rejects_short_and_noisy_forms() {
        assert!(!is_valid_ipv4("10.0.1"));
        assert!(!is_valid_ipv4("10.0.0.1 "));
        assert!(!is_valid_ipv4("fe80::1"));
    }
}
