//! Local network helpers: /24 prefixes and local address detection.

use std::fmt;
use std::net::{Ipv4Addr, UdpSocket};
use std::str::FromStr;

use serde::Serialize;

use crate::error::DiscoveryError;

/// First three octets of an IPv4 /24 network, e.g. `192.168.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NetworkPrefix([u8; 3]);

impl NetworkPrefix {
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self([a, b, c])
    }

    /// Prefix of the /24 containing `ip`
    pub fn of(ip: Ipv4Addr) -> Self {
        let [a, b, c, _] = ip.octets();
        Self([a, b, c])
    }

    pub fn octets(&self) -> [u8; 3] {
        self.0
    }

    /// Address `prefix.host`
    pub fn host(&self, host: u8) -> Ipv4Addr {
        let [a, b, c] = self.0;
        Ipv4Addr::new(a, b, c, host)
    }

    /// The 254 usable host addresses `.1` through `.254`
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        (1..=254u8).map(move |host| self.host(host))
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        Self::of(ip) == *self
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{}.{}.{}", a, b, c)
    }
}

impl FromStr for NetworkPrefix {
    type Err = DiscoveryError;

    /// Accepts `192.168.1`, `192.168.1.` and `192.168.1.0/24`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DiscoveryError::InvalidPrefix(s.to_string());

        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_suffix(".0/24")
            .or_else(|| trimmed.strip_suffix('.'))
            .unwrap_or(trimmed);

        let octets = trimmed
            .split('.')
            .map(|part| part.parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<u8>, _>>()?;

        match octets.as_slice() {
            &[a, b, c] => Ok(Self([a, b, c])),
            _ => Err(invalid()),
        }
    }
}

/// IPv4 address of the interface that routes to the internet
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;

    match socket.local_addr().ok()?.ip() {
        std::net::IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

/// Prefix of the local network, if it can be detected
pub fn local_prefix() -> Option<NetworkPrefix> {
    local_ipv4().map(NetworkPrefix::of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("192.168.1", [192, 168, 1])]
    #[case("10.0.0", [10, 0, 0])]
    #[case(" 10.5.0 ", [10, 5, 0])]
    #[case("192.168.0.", [192, 168, 0])]
    #[case("172.16.4.0/24", [172, 16, 4])]
    fn test_parse_prefix(#[case] input: &str, #[case] expected: [u8; 3]) {
        let prefix: NetworkPrefix = input.parse().unwrap();
        assert_eq!(prefix.octets(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("192.168")]
    #[case("192.168.1.20")]
    #[case("192.168.256")]
    #[case("a.b.c")]
    fn test_parse_prefix_rejects(#[case] input: &str) {
        let err = input.parse::<NetworkPrefix>().unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidPrefix(_)));
    }

    #[test]
    fn test_hosts_cover_usable_range() {
        let prefix = NetworkPrefix::new(192, 168, 1);
        let hosts: Vec<Ipv4Addr> = prefix.hosts().collect();

        assert_eq!(hosts.len(), 254);
        assert_eq!(hosts[0], Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(hosts[253], Ipv4Addr::new(192, 168, 1, 254));
        assert!(hosts.iter().all(|ip| prefix.contains(*ip)));
    }

    #[test]
    fn test_prefix_of_address() {
        let prefix = NetworkPrefix::of(Ipv4Addr::new(10, 1, 2, 77));
        assert_eq!(prefix.to_string(), "10.1.2");
        assert!(!prefix.contains(Ipv4Addr::new(10, 1, 3, 77)));
    }
}
