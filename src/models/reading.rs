use crate::models::Device;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// One reported sample, as emitted by the daemon in `json` output mode.
#[derive(Debug, Clone, Serialize)]
pub struct Reading {
    pub timestamp: String,
    pub name: String,
    pub label: String,
    pub device_type: String,
    pub id: String,
    pub temperature: f64,
    pub temperature_display: String,
}

impl Reading {
    pub fn from_device(device: &Device, label: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            name: device.name().to_string(),
            label: label.unwrap_or(device.name()).to_string(),
            device_type: device.device_type().to_string(),
            id: format!("{:012x}", device.id()),
            temperature: device.last_temperature,
            temperature_display: format!("{:.3} °C", device.last_temperature),
        }
    }
}
