use crate::error::{OneWireError, Result};
use log::debug;
use std::fs::read_dir;
use std::path::Path;

/// Entry name fragment of the bus controller's own pseudo-device.
pub const BUS_MASTER_MARKER: &str = "w1_bus_master";

/// How an empty bus is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryCountPolicy {
    /// Reject any listing with one entry or fewer, before filtering. This also
    /// rejects a bus with a single sensor, matching the behaviour existing
    /// deployments rely on.
    #[default]
    Strict,
    /// Reject only when no sensor remains after removing the bus master.
    PostFilter,
}

/// List the sensor directory names under `dir`, in listing order.
pub fn find_devices(dir: &Path, policy: EntryCountPolicy) -> Result<Vec<String>> {
    let listing_error = |source| OneWireError::DeviceDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in read_dir(dir).map_err(listing_error)? {
        let entry = entry.map_err(listing_error)?;
        entries.push(entry.file_name().to_string_lossy().into_owned());
    }
    debug!("{} entries in {}", entries.len(), dir.display());

    select_device_names(entries, policy).ok_or_else(|| OneWireError::NoDevices {
        path: dir.to_path_buf(),
    })
}

/// Drop the bus master from a raw directory listing. `None` means the bus is
/// considered empty under `policy`.
pub fn select_device_names(entries: Vec<String>, policy: EntryCountPolicy) -> Option<Vec<String>> {
    if policy == EntryCountPolicy::Strict && entries.len() <= 1 {
        return None;
    }

    let names: Vec<String> = entries
        .into_iter()
        .filter(|name| !name.contains(BUS_MASTER_MARKER))
        .collect();

    if names.is_empty() {
        return None;
    }
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entries(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bus_master_excluded() {
        let names = select_device_names(
            entries(&["w1_bus_master1", "28-0000aabbcc"]),
            EntryCountPolicy::Strict,
        );
        assert_eq!(names, Some(entries(&["28-0000aabbcc"])));
    }

    #[test]
    fn test_listing_order_kept() {
        let names = select_device_names(
            entries(&["28-000000000002", "w1_bus_master1", "10-000000000001"]),
            EntryCountPolicy::Strict,
        );
        assert_eq!(names, Some(entries(&["28-000000000002", "10-000000000001"])));
    }

    #[test]
    fn test_strict_rejects_short_listing() {
        assert_eq!(select_device_names(entries(&[]), EntryCountPolicy::Strict), None);
        assert_eq!(
            select_device_names(entries(&["w1_bus_master1"]), EntryCountPolicy::Strict),
            None
        );
        // A lone real sensor is rejected too.
        assert_eq!(
            select_device_names(entries(&["28-0000aabbcc"]), EntryCountPolicy::Strict),
            None
        );
    }

    #[test]
    fn test_post_filter_accepts_single_sensor() {
        assert_eq!(
            select_device_names(entries(&["28-0000aabbcc"]), EntryCountPolicy::PostFilter),
            Some(entries(&["28-0000aabbcc"]))
        );
        assert_eq!(
            select_device_names(entries(&["w1_bus_master1"]), EntryCountPolicy::PostFilter),
            None
        );
    }

    #[test]
    fn test_only_masters_is_empty() {
        assert_eq!(
            select_device_names(
                entries(&["w1_bus_master1", "w1_bus_master2"]),
                EntryCountPolicy::Strict
            ),
            None
        );
    }

    #[test]
    fn test_find_devices_in_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("w1_bus_master1")).unwrap();
        fs::create_dir(dir.path().join("28-0000aabbcc")).unwrap();

        let names = find_devices(dir.path(), EntryCountPolicy::Strict).unwrap();
        assert_eq!(names, entries(&["28-0000aabbcc"]));
    }

    #[test]
    fn test_find_devices_errors() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("w1_bus_master1")).unwrap();

        let err = find_devices(dir.path(), EntryCountPolicy::Strict).unwrap_err();
        assert!(matches!(err, OneWireError::NoDevices { .. }));

        let missing = dir.path().join("missing");
        let err = find_devices(&missing, EntryCountPolicy::Strict).unwrap_err();
        assert!(matches!(err, OneWireError::DeviceDirectory { .. }));
    }
}
