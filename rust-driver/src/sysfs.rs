//! Sysfs helpers: bounded attribute reads and class directory scans.

use std::{fs::File, io::Read, path::Path};

use log::trace;
use nix::{dir::Dir, fcntl::OFlag, sys::stat::Mode};

use crate::error::{Result, StubError};

/// Reads the attribute `dir/file` into a buffer of `buf_len` bytes.
///
/// Exactly one read is issued. A trailing newline is stripped. A value that
/// fills the whole buffer without a newline is rejected as truncated, since
/// the buffer would have no room left for a terminator.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or if the value is
/// truncated.
#[inline]
pub fn read_sysfs_file(
    dir: impl AsRef<Path>,
    file: impl AsRef<Path>,
    buf_len: usize,
) -> Result<String> {
    let path = dir.as_ref().join(file);
    let mut buf = vec![0u8; buf_len];
    let len = File::open(&path)?.read(&mut buf)?;

    let mut value = buf.get(..len).unwrap_or_default();
    if let Some(stripped) = value.strip_suffix(b"\n") {
        value = stripped;
    } else if len > 0 && len == buf_len {
        return Err(StubError::Truncated { path });
    }

    trace!("read {} bytes from {}", value.len(), path.display());
    Ok(String::from_utf8_lossy(value).into_owned())
}

/// Reports whether `class_dir` holds an entry whose name starts with `prefix`.
///
/// Stops at the first match. The directory handle is closed before returning.
///
/// # Errors
/// Returns an error if the directory cannot be opened.
#[inline]
pub fn class_has_prefixed_entry(class_dir: impl AsRef<Path>, prefix: &str) -> Result<bool> {
    let mut dir = Dir::open(
        class_dir.as_ref(),
        OFlag::O_RDONLY | OFlag::O_DIRECTORY | OFlag::O_CLOEXEC,
        Mode::empty(),
    )?;
    let found = dir
        .iter()
        .map_while(std::result::Result::ok)
        .any(|entry| entry.file_name().to_bytes().starts_with(prefix.as_bytes()));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        constants::{SYSFS_VALUE_BUF_LEN, VENDOR_ATTR_PATH},
        test_wrapper::FakeSysfs,
    };

    #[test]
    fn newline_is_stripped() {
        let sysfs = FakeSysfs::new().unwrap();
        let dev = sysfs.add_device_with_vendor("usnic_0", "0x1137\n").unwrap();
        let value = read_sysfs_file(&dev, VENDOR_ATTR_PATH, SYSFS_VALUE_BUF_LEN).unwrap();
        assert_eq!(value, "0x1137");
    }

    #[test]
    fn short_value_without_newline_is_kept() {
        let sysfs = FakeSysfs::new().unwrap();
        let dev = sysfs.add_device_with_vendor("usnic_0", "4407").unwrap();
        let value = read_sysfs_file(&dev, VENDOR_ATTR_PATH, SYSFS_VALUE_BUF_LEN).unwrap();
        assert_eq!(value, "4407");
    }

    #[test]
    fn full_buffer_without_newline_is_truncated() {
        let sysfs = FakeSysfs::new().unwrap();
        let dev = sysfs.add_device_with_vendor("usnic_0", "0x001137").unwrap();
        let err = read_sysfs_file(&dev, VENDOR_ATTR_PATH, SYSFS_VALUE_BUF_LEN).unwrap_err();
        assert!(matches!(err, StubError::Truncated { .. }));
    }

    #[test]
    fn full_buffer_ending_in_newline_is_accepted() {
        let sysfs = FakeSysfs::new().unwrap();
        let dev = sysfs.add_device_with_vendor("usnic_0", "0x01137\n").unwrap();
        let value = read_sysfs_file(&dev, VENDOR_ATTR_PATH, SYSFS_VALUE_BUF_LEN).unwrap();
        assert_eq!(value, "0x01137");
    }

    #[test]
    fn longer_value_is_cut_at_buffer() {
        let sysfs = FakeSysfs::new().unwrap();
        let dev = sysfs
            .add_device_with_vendor("usnic_0", "0x1137 and more\n")
            .unwrap();
        let err = read_sysfs_file(&dev, VENDOR_ATTR_PATH, SYSFS_VALUE_BUF_LEN).unwrap_err();
        assert!(matches!(err, StubError::Truncated { .. }));
    }

    #[test]
    fn empty_file_reads_empty() {
        let sysfs = FakeSysfs::new().unwrap();
        let dev = sysfs.add_device_with_vendor("usnic_0", "").unwrap();
        let value = read_sysfs_file(&dev, VENDOR_ATTR_PATH, SYSFS_VALUE_BUF_LEN).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let sysfs = FakeSysfs::new().unwrap();
        let dev = sysfs.add_device("usnic_0").unwrap();
        let err = read_sysfs_file(&dev, VENDOR_ATTR_PATH, SYSFS_VALUE_BUF_LEN).unwrap_err();
        assert!(matches!(
            err,
            StubError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn scan_stops_at_prefixed_entry() {
        let sysfs = FakeSysfs::new().unwrap();
        let _mlx = sysfs.add_device("mlx5_0").unwrap();
        assert!(!class_has_prefixed_entry(sysfs.class_path(), "usnic_").unwrap());

        let _usnic = sysfs.add_device("usnic_3").unwrap();
        assert!(class_has_prefixed_entry(sysfs.class_path(), "usnic_").unwrap());
    }

    #[test]
    fn prefix_must_match_at_start() {
        let sysfs = FakeSysfs::new().unwrap();
        let _dev = sysfs.add_device("not_usnic_0").unwrap();
        let _dev = sysfs.add_device("usnic").unwrap();
        assert!(!class_has_prefixed_entry(sysfs.class_path(), "usnic_").unwrap());
    }

    #[test]
    fn empty_class_dir_has_no_match() {
        let sysfs = FakeSysfs::new().unwrap();
        assert!(!class_has_prefixed_entry(sysfs.class_path(), "usnic_").unwrap());
    }

    #[test]
    fn missing_class_dir_is_error() {
        let sysfs = FakeSysfs::new().unwrap();
        sysfs.remove_class_dir().unwrap();
        let err = class_has_prefixed_entry(sysfs.class_path(), "usnic_").unwrap_err();
        assert!(matches!(err, StubError::Nix(nix::Error::ENOENT)));
    }

    #[test]
    fn plain_file_entries_count() {
        let sysfs = FakeSysfs::new().unwrap();
        fs::write(sysfs.class_path().join("usnic_link"), b"").unwrap();
        assert!(class_has_prefixed_entry(sysfs.class_path(), "usnic_").unwrap());
    }
}
