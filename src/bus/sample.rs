use crate::error::{OneWireError, Result};
use crate::utils::file::open_rewound;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{self, BufRead};
use std::path::Path;

lazy_static! {
    static ref CRC_CHECK: Regex = Regex::new(r"crc=\w+\s(YES|NO)").unwrap();
    static ref TEMPERATURE_SAMPLE: Regex = Regex::new(r"(?:^|\s)t=(-?\d+)").unwrap();
}

/// Parse a `w1_slave` status read into degrees Celsius.
///
/// The first line carries the driver's CRC verdict, e.g.
///
/// ```text
/// 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
/// 72 01 4b 46 7f ff 0e 10 57 t=23125
/// ```
///
/// A `NO` verdict fails with [`OneWireError::CrcMismatch`]. A first line
/// without a verdict is accepted. The first later line with a `t=` field
/// (millidegrees) gives the sample. Running out of input before that, or
/// hitting a read error, fails with [`OneWireError::EofWithoutData`].
pub fn parse_status<R: BufRead>(reader: R, device: &str) -> Result<f64> {
    let eof = |source: Option<io::Error>| OneWireError::EofWithoutData {
        device: device.to_string(),
        source,
    };

    let mut lines = reader.lines();
    let crc_line = match lines.next() {
        Some(Ok(line)) => line,
        Some(Err(e)) => return Err(eof(Some(e))),
        None => return Err(eof(None)),
    };
    if let Some(caps) = CRC_CHECK.captures(&crc_line) {
        if &caps[1] != "YES" {
            return Err(OneWireError::CrcMismatch {
                device: device.to_string(),
            });
        }
    }

    for line in lines {
        let line = line.map_err(|e| eof(Some(e)))?;
        if let Some(caps) = TEMPERATURE_SAMPLE.captures(&line) {
            let millis: i64 = caps[1]
                .parse()
                .map_err(|source| OneWireError::InvalidSample {
                    device: device.to_string(),
                    source,
                })?;
            return Ok(millis as f64 / 1000.0);
        }
    }

    Err(eof(None))
}

/// Open the status file at `path` and parse one sample from it.
pub fn read_sample(path: &Path, device: &str) -> Result<f64> {
    let reader = open_rewound(path).map_err(|e| OneWireError::EofWithoutData {
        device: device.to_string(),
        source: Some(e),
    })?;
    parse_status(reader, device)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<f64> {
        parse_status(content.as_bytes(), "28-0000aabbcc")
    }

    #[test]
    fn test_sample_parse() {
        let temp = parse("... crc=1a YES\n23 01 4b 46 7f ff 0c 10 45 t=23562").unwrap();
        assert_eq!(temp, 23.562);
    }

    #[test]
    fn test_kernel_output() {
        let content = "72 01 4b 46 7f ff 0e 10 57 : crc=57 YES\n72 01 4b 46 7f ff 0e 10 57 t=23125\n";
        assert_eq!(parse(content).unwrap(), 23.125);
    }

    #[test]
    fn test_negative_sample() {
        let content = "5e ff 4b 46 7f ff 02 10 e1 : crc=e1 YES\n5e ff 4b 46 7f ff 02 10 e1 t=-10125\n";
        assert_eq!(parse(content).unwrap(), -10.125);
    }

    #[test]
    fn test_crc_gate() {
        let err = parse("... crc=1a NO\n...t=25000").unwrap_err();
        assert!(matches!(err, OneWireError::CrcMismatch { .. }));
    }

    #[test]
    fn test_missing_crc_marker_accepted() {
        assert_eq!(parse("garbage\n00 t=1000\n").unwrap(), 1.0);
    }

    #[test]
    fn test_sample_on_later_line() {
        let content = "aa : crc=aa YES\nno sample here\nbb t=19500\n";
        assert_eq!(parse(content).unwrap(), 19.5);
    }

    #[test]
    fn test_eof_without_data() {
        for content in ["", "aa : crc=aa YES\n", "aa : crc=aa YES\nbb t=\n"] {
            let err = parse(content).unwrap_err();
            assert!(
                matches!(err, OneWireError::EofWithoutData { .. }),
                "{content:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_out_of_range_sample() {
        let err = parse("aa : crc=aa YES\nbb t=99999999999999999999\n").unwrap_err();
        assert!(matches!(err, OneWireError::InvalidSample { .. }));
    }

    #[test]
    fn test_read_sample_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_sample(&dir.path().join("w1_slave"), "28-0000aabbcc").unwrap_err();
        match err {
            OneWireError::EofWithoutData { source, .. } => assert!(source.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
