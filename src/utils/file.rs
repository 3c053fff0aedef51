use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Read the first 8 bytes of `path` as a little-endian `u64`.
///
/// A file shorter than 8 bytes yields `ErrorKind::UnexpectedEof`.
pub fn read_u64_le(path: &Path) -> io::Result<u64> {
    let mut f = File::open(path)?;
    let mut raw = [0u8; 8];
    f.read_exact(&mut raw)?;
    Ok(u64::from_le_bytes(raw))
}

// Open a sysfs attribute for reading from the start. The kernel regenerates
// the content on each open, so handles are never kept between reads.
pub fn open_rewound(path: &Path) -> io::Result<BufReader<File>> {
    let mut f = File::open(path)?;
    f.seek(SeekFrom::Start(0))?;
    Ok(BufReader::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_u64_le() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(&[0x28, 0x0f, 0xee, 0xdd, 0xcc, 0xbb, 0xaa, 0x00, 0xff])
            .unwrap();
        assert_eq!(read_u64_le(temp_file.path()).unwrap(), 0x00aa_bbcc_ddee_0f28);
    }

    #[test]
    fn test_read_u64_le_short() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0x28, 0x0f, 0xee]).unwrap();
        let err = read_u64_le(temp_file.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_open_rewound() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"first\nsecond\n").unwrap();
        let lines: Vec<String> = open_rewound(temp_file.path())
            .unwrap()
            .lines()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }
}
