use crate::error::{OneWireError, Result};
use crate::models::DeviceType;
use crate::utils::file::read_u64_le;
use std::io::ErrorKind;
use std::path::Path;

/// Serial number bits of the 64-bit ROM code.
const SERIAL_MASK: u64 = 0x00FF_FFFF_FFFF_FF00;

/// Decode a ROM code laid out as `[family:8][serial:48][crc:8]` from the low
/// byte up. Returns the 48-bit serial and the device type, or the unrecognised
/// family code.
pub fn decode_id(raw: u64) -> std::result::Result<(u64, DeviceType), u8> {
    let family = (raw & 0xff) as u8;
    let device_type = DeviceType::from_family_code(family).ok_or(family)?;
    Ok(((raw & SERIAL_MASK) >> 8, device_type))
}

/// Read and decode the binary `id` attribute at `path`.
pub fn decode_identity(path: &Path) -> Result<(u64, DeviceType)> {
    let raw = read_u64_le(path).map_err(|source| match source.kind() {
        ErrorKind::UnexpectedEof => OneWireError::IdTooShort {
            path: path.to_path_buf(),
        },
        _ => OneWireError::IdUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    decode_id(raw).map_err(|code| OneWireError::UnrecognizedFamily {
        path: path.to_path_buf(),
        code,
    })
}
