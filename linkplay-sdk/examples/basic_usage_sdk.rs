//! Discover speakers and show what each one reports
//!
//! Ctrl-C during the network scan stops it early and prints what was found.
//!
//! Run with: cargo run -p linkplay-sdk --example basic_usage_sdk

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use linkplay_sdk::logging::{init_logging, LoggingMode};
use linkplay_sdk::{discover_cancellable, DiscoveryConfig, SdkError, Speaker};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingMode::Development)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    println!("Discovering LinkPlay speakers...");
    let devices = discover_cancellable(DiscoveryConfig::default(), cancel);

    if devices.is_empty() {
        println!("No speakers found on the network");
        println!("Make sure speakers are powered on, in WiFi mode, and on the same network");
        return Ok(());
    }

    println!("Found {} speaker(s)", devices.len());

    for device in &devices {
        let speaker = Speaker::from_device(device);
        println!("\n{} ({})", speaker.display_name(), device.api_url());

        match speaker.status_ex() {
            Some(reply) => println!("{}", serde_json::to_string_pretty(&reply.to_map())?),
            None => println!("   Failed to get status"),
        }

        match speaker.player_status() {
            Some(reply) => println!("{}", serde_json::to_string_pretty(&reply.to_map())?),
            None => println!("   Failed to get player status"),
        }
    }

    let first = devices
        .first()
        .map(Speaker::from_device)
        .ok_or_else(|| SdkError::SpeakerNotFound("any".to_string()))?;
    println!("\nSetting volume on {} to 20", first.display_name());
    println!("{:?}", first.set_volume(20));

    Ok(())
}
