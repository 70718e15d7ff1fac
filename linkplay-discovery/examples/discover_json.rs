//! Simple speaker discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p linkplay-sdk-discovery --example discover_json [prefix]

use linkplay_discovery::{DiscoveryConfig, NetworkPrefix};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = DiscoveryConfig::default();
    if let Some(prefix) = std::env::args().nth(1) {
        config = config.with_network_prefix(prefix.parse::<NetworkPrefix>()?);
    }

    let devices = linkplay_discovery::get_with_config(config);

    println!("{}", serde_json::to_string_pretty(&devices)?);
    Ok(())
}
