//! Client address normalization.

use std::net::IpAddr;

/// Strips the trailing port from a `host:port` client address.
///
/// Handles both address families:
///
/// - IPv4 `203.0.113.5:54321` yields `203.0.113.5`
/// - Bracketed IPv6 `[2001:db8::1]:54321` yields `2001:db8::1`
/// - Bare IPv6 `2001:db8::1:54321` yields `2001:db8::1`; only the final
///   colon-delimited segment is removed, internal colons are kept
///
/// Input that already is a plain IP address is returned unchanged, so a
/// bare IPv6 address without a port keeps all of its groups. A bare IPv6
/// address whose last group could also be read as a port is ambiguous and
/// is treated as an address; `SocketAddr` output always brackets IPv6.
pub fn strip_port(address: &str) -> &str {
    let address = address.trim();

    if address.parse::<IpAddr>().is_ok() {
        return address;
    }

    if let Some(rest) = address.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((host, _)) => host,
            None => address,
        };
    }

    match address.rsplit_once(':') {
        Some((host, _port)) => host,
        None => address,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_port_ipv4() {
        assert_eq!(strip_port("203.0.113.5:54321"), "203.0.113.5");
    }

    #[test]
    fn test_strip_port_bracketed_ipv6() {
        assert_eq!(strip_port("[2001:db8::1]:54321"), "2001:db8::1");
        assert_eq!(strip_port("[::1]:8080"), "::1");
    }

    #[test]
    fn test_strip_port_bare_ipv6_keeps_internal_colons() {
        assert_eq!(strip_port("2001:db8::1:54321"), "2001:db8::1");
        assert_eq!(strip_port("fe80:0:0:0:1:2:3:4:443"), "fe80:0:0:0:1:2:3:4");
    }

    #[test]
    fn test_strip_port_without_port() {
        assert_eq!(strip_port("10.0.0.1"), "10.0.0.1");
        assert_eq!(strip_port("[2001:db8::1]"), "2001:db8::1");
        assert_eq!(strip_port(""), "");
    }

    #[test]
    fn test_strip_port_bare_ipv6_without_port() {
        assert_eq!(strip_port("2001:db8::1"), "2001:db8::1");
        assert_eq!(strip_port("::1"), "::1");
        assert_eq!(strip_port("fe80::a:b:c:d"), "fe80::a:b:c:d");
    }

    #[test]
    fn test_strip_port_from_socket_addr() {
        let v4: std::net::SocketAddr = "198.51.100.7:4000".parse().unwrap();
        let v6: std::net::SocketAddr = "[2001:db8::42]:4000".parse().unwrap();

        assert_eq!(strip_port(&v4.to_string()), "198.51.100.7");
        assert_eq!(strip_port(&v6.to_string()), "2001:db8::42");
    }
}
