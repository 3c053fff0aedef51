use crate::config::BusConfig;
use crate::error::Result;
use crate::models::Device;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub mod activator;
pub mod enumerator;
pub mod identity;
pub mod sample;

pub use activator::{BusActivator, Modprobe, NoActivation};
pub use enumerator::EntryCountPolicy;

/// Where the kernel's `w1` subsystem exposes its devices.
pub const DEVICES_DIR: &str = "/sys/bus/w1/devices";

/// A one-wire bus as seen through sysfs: the devices directory, the driver
/// activation step run before discovery, and the empty-bus policy.
#[derive(Clone)]
pub struct OneWireBus {
    devices_dir: PathBuf,
    activator: Arc<dyn BusActivator>,
    policy: EntryCountPolicy,
}

impl OneWireBus {
    pub fn new<P: Into<PathBuf>>(
        devices_dir: P,
        activator: Arc<dyn BusActivator>,
        policy: EntryCountPolicy,
    ) -> Self {
        Self {
            devices_dir: devices_dir.into(),
            activator,
            policy,
        }
    }

    pub fn from_config(config: &BusConfig) -> Self {
        let activator: Arc<dyn BusActivator> = if config.activate {
            Arc::new(Modprobe::new(config.module_list()))
        } else {
            Arc::new(NoActivation)
        };
        Self::new(&config.devices_dir, activator, config.entry_count_policy())
    }

    pub fn devices_dir(&self) -> &Path {
        &self.devices_dir
    }

    /// Activate the drivers, enumerate the bus and decode every sensor's id.
    ///
    /// Devices come back in directory listing order. The first device that
    /// fails to decode fails the whole call.
    pub fn load_devices(&self) -> Result<Vec<Device>> {
        let start = Instant::now();
        self.activator.activate()?;

        let names = enumerator::find_devices(&self.devices_dir, self.policy)?;
        let mut devices = Vec::with_capacity(names.len());
        for name in names {
            let (id, device_type) = identity::decode_identity(&self.id_path(&name))?;
            debug!("Found {} {} (serial {:012x})", device_type, name, id);
            devices.push(Device::new(name, id, device_type));
        }

        debug!("load_devices took: {} ms", start.elapsed().as_millis());
        Ok(devices)
    }

    /// Take one sample from each device, in order, storing it in
    /// `last_temperature`.
    ///
    /// On error the devices before the failing one keep their new reading and
    /// the rest keep their previous one.
    pub fn read_devices(&self, devices: &mut [Device]) -> Result<()> {
        let start = Instant::now();
        for device in devices.iter_mut() {
            let path = self.status_path(device.name());
            device.last_temperature = sample::read_sample(&path, device.name())?;
        }
        debug!(
            "read_devices ({} devices) took: {} ms",
            devices.len(),
            start.elapsed().as_millis()
        );
        Ok(())
    }

    fn id_path(&self, name: &str) -> PathBuf {
        self.devices_dir.join(name).join("id")
    }

    fn status_path(&self, name: &str) -> PathBuf {
        self.devices_dir.join(name).join("w1_slave")
    }
}

impl Default for OneWireBus {
    fn default() -> Self {
        Self::new(DEVICES_DIR, Arc::new(Modprobe::default()), EntryCountPolicy::Strict)
    }
}

/// Discover the sensors on the host's bus at the standard sysfs location.
pub fn load_devices() -> Result<Vec<Device>> {
    OneWireBus::default().load_devices()
}

/// Refresh `last_temperature` of each device from the standard sysfs location.
pub fn read_devices(devices: &mut [Device]) -> Result<()> {
    OneWireBus::default().read_devices(devices)
}
