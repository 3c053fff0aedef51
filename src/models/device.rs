use serde::Serialize;
use std::fmt;

const FAMILY_DS18S20: u8 = 0x10;
const FAMILY_DS18B20: u8 = 0x28;

/// Temperature sensor models recognised on the bus, keyed by family code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceType {
    #[serde(rename = "DS18S20")]
    Ds18s20,
    #[serde(rename = "DS18B20")]
    Ds18b20,
}

impl DeviceType {
    pub fn from_family_code(code: u8) -> Option<Self> {
        match code {
            FAMILY_DS18B20 => Some(DeviceType::Ds18b20),
            FAMILY_DS18S20 => Some(DeviceType::Ds18s20),
            _ => None,
        }
    }

    pub fn family_code(&self) -> u8 {
        match self {
            DeviceType::Ds18s20 => FAMILY_DS18S20,
            DeviceType::Ds18b20 => FAMILY_DS18B20,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Ds18s20 => write!(f, "DS18S20"),
            DeviceType::Ds18b20 => write!(f, "DS18B20"),
        }
    }
}

/// A discovered sensor and its most recent reading.
///
/// `id`, `name` and `device_type` are fixed at discovery. Only
/// `last_temperature` changes, on every successful read; it is `0.0` until
/// the first one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    id: u64,
    name: String,
    device_type: DeviceType,
    pub last_temperature: f64,
}

impl Device {
    pub(crate) fn new(name: String, id: u64, device_type: DeviceType) -> Self {
        Self {
            id,
            name,
            device_type,
            last_temperature: 0.0,
        }
    }

    /// 48-bit factory serial number.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Directory name the kernel driver gives the device, e.g. `28-0000aabbcc`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_codes() {
        assert_eq!(DeviceType::from_family_code(0x28), Some(DeviceType::Ds18b20));
        assert_eq!(DeviceType::from_family_code(0x10), Some(DeviceType::Ds18s20));
        assert_eq!(DeviceType::from_family_code(0x22), None);
        assert_eq!(DeviceType::Ds18b20.family_code(), 0x28);
        assert_eq!(DeviceType::Ds18s20.family_code(), 0x10);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(DeviceType::Ds18b20.to_string(), "DS18B20");
        let device = Device::new("10-000801234567".to_string(), 0x000801234567, DeviceType::Ds18s20);
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["device_type"], "DS18S20");
        assert_eq!(json["name"], "10-000801234567");
        assert_eq!(json["last_temperature"], 0.0);
    }
}
