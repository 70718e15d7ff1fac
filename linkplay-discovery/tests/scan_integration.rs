//! End-to-end verification and scanning against loopback speakers
//!
//! Linux routes all of 127.0.0.0/8 to the loopback interface, which gives
//! each fake speaker its own address.

mod helpers;

use helpers::{closed_port, FakeSpeaker};
use linkplay_discovery::{
    verify::Verifier, DeviceVerifier, Discovery, DiscoveryConfig, NetworkPrefix, Scanner,
};
use serde_json::json;
use std::net::Ipv4Addr;
use std::time::Duration;

fn config_for(port: u16) -> DiscoveryConfig {
    DiscoveryConfig::default()
        .with_probe_port(port)
        .with_command_port(port)
        .with_probe_timeout(Duration::from_millis(300))
        .with_verify_timeout(Duration::from_secs(2))
}

#[test]
fn test_verifier_confirms_status_answer() {
    let speaker = FakeSpeaker::start(Ipv4Addr::LOCALHOST, r#"{"DeviceName":"Kitchen"}"#);
    let verifier = DeviceVerifier::from_config(&config_for(speaker.port()));

    let device = verifier.verify(Ipv4Addr::LOCALHOST).expect("confirmed");

    assert_eq!(device.name(), Some("Kitchen"));
    assert_eq!(device.port, speaker.port());
    assert_eq!(speaker.requests(), vec!["GET /httpapi.asp?command=getStatus HTTP/1.1"]);
}

#[test]
fn test_verifier_rejects_non_device_on_open_port() {
    let other = FakeSpeaker::start(Ipv4Addr::LOCALHOST, "<html><body>Router login</body></html>");
    let verifier = DeviceVerifier::from_config(&config_for(other.port()));

    assert!(verifier.verify(Ipv4Addr::LOCALHOST).is_none());
    assert_eq!(other.requests().len(), 1);
}

#[test]
fn test_verifier_rejects_empty_status() {
    let other = FakeSpeaker::start(Ipv4Addr::LOCALHOST, "{}");
    let verifier = DeviceVerifier::from_config(&config_for(other.port()));

    assert!(verifier.verify(Ipv4Addr::LOCALHOST).is_none());
}

#[test]
fn test_verifier_rejects_closed_port() {
    let verifier = DeviceVerifier::from_config(&config_for(closed_port(Ipv4Addr::LOCALHOST)));
    assert!(verifier.verify(Ipv4Addr::LOCALHOST).is_none());
}

#[cfg(target_os = "linux")]
#[test]
fn test_scan_finds_single_speaker_among_five_hosts() {
    let speaker = FakeSpeaker::start(Ipv4Addr::new(127, 0, 0, 10), r#"{"DeviceName":"Kitchen"}"#);
    let prefix = NetworkPrefix::new(127, 0, 0);
    let hosts: Vec<Ipv4Addr> = (8..=12).map(|h| prefix.host(h)).collect();

    let found = Scanner::from_config(&config_for(speaker.port())).scan_hosts(&hosts);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ip, Ipv4Addr::new(127, 0, 0, 10));
    assert_eq!(found[0].status.get("DeviceName"), Some(&json!("Kitchen")));
    assert_eq!(found[0].status.len(), 1);
}

#[cfg(target_os = "linux")]
#[test]
fn test_discovery_falls_back_to_scan() {
    let speaker = FakeSpeaker::start(
        Ipv4Addr::new(127, 0, 0, 20),
        r#"{"DeviceName":"Den","hardware":"A31"}"#,
    );
    // Nothing answers the M-SEARCH here
    let silent = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();

    let config = config_for(speaker.port())
        .with_multicast_addr(silent.local_addr().unwrap())
        .with_multicast_window(Duration::from_millis(200))
        .with_network_prefix(NetworkPrefix::new(127, 0, 0));

    let found = Discovery::new(config).discover();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ip, Ipv4Addr::new(127, 0, 0, 20));
    assert_eq!(found[0].model(), Some("A31"));
}
