//! Discovery and reading of DS18S20/DS18B20 one-wire thermometers through the
//! Linux `w1` sysfs interface.
//!
//! ```no_run
//! let mut devices = onewire::load_devices()?;
//! onewire::read_devices(&mut devices)?;
//! for device in &devices {
//!     println!("{} {:.3}", device.name(), device.last_temperature);
//! }
//! # Ok::<(), onewire::OneWireError>(())
//! ```
pub mod bus;
pub mod config;
pub mod error;
pub mod models;

mod utils;

pub use crate::bus::{load_devices, read_devices, OneWireBus};
pub use crate::error::OneWireError;
pub use crate::models::{Device, DeviceType, Reading};

use crate::config::{AppConfig, OutputFormat};
use anyhow::Context;
use log::{debug, error, info};
use std::time::Duration;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting one wire poller");

    tokio::select! {
        result = main_loop(&config) => {
            match result {
                Ok(_) => info!("Polling completed"),
                Err(e) => {
                    error!("Application error: {e:#}");
                    // Print chain of error causes
                    let mut source = e.source();
                    while let Some(e) = source {
                        error!("Caused by: {e}");
                        source = e.source();
                    }
                    return Err(e).context("Application failed to run");
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping");
        }
    }

    Ok(())
}

async fn main_loop(config: &AppConfig) -> anyhow::Result<()> {
    let bus = OneWireBus::from_config(&config.bus);

    debug!("Discovering devices in {}", bus.devices_dir().display());
    let discovery = bus.clone();
    let mut devices = tokio::task::spawn_blocking(move || discovery.load_devices())
        .await
        .context("Discovery task panicked")?
        .context("Error finding one wire devices")?;

    for device in &devices {
        info!(
            "Found {} {} as {}",
            device.device_type(),
            device.name(),
            config.label_for(device.name())
        );
    }

    let mut interval = tokio::time::interval(Duration::from_secs(config.polling.interval.max(1)));
    let mut polls: u64 = 0;
    loop {
        interval.tick().await;

        let pass = bus.clone();
        let (returned, result) = tokio::task::spawn_blocking(move || {
            let result = pass.read_devices(&mut devices);
            (devices, result)
        })
        .await
        .context("Read task panicked")?;
        devices = returned;

        match result {
            Ok(()) => report(config, &devices)?,
            // Devices before the failing one were updated, the rest are stale.
            Err(e) => error!("Failed to read devices: {}", e),
        }

        polls += 1;
        if config.polling.count > 0 && polls >= config.polling.count {
            return Ok(());
        }
    }
}

fn report(config: &AppConfig, devices: &[Device]) -> anyhow::Result<()> {
    for device in devices {
        let reading = Reading::from_device(device, Some(config.label_for(device.name())));
        match config.polling.output_format() {
            OutputFormat::Log => info!("{}: {}", reading.label, reading.temperature_display),
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string(&reading).context("Failed to serialize reading")?
            ),
        }
    }
    Ok(())
}
