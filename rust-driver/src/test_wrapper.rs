//! Throwaway sysfs trees for tests and benchmarks.

#![allow(clippy::module_name_repetitions)]

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{config::DriverConfig, constants::VENDOR_ATTR_PATH};

/// A fake `/sys/class/infiniband` under the system temp directory.
///
/// The whole tree is removed on drop.
#[derive(Debug)]
pub struct FakeSysfs {
    root: PathBuf,
    class_path: PathBuf,
}

impl FakeSysfs {
    /// Creates an empty class directory.
    ///
    /// # Errors
    /// Returns an error if the directories cannot be created.
    #[inline]
    pub fn new() -> io::Result<Self> {
        let root = std::env::temp_dir().join(format!("usnic-sysfs-{:016x}", rand::random::<u64>()));
        let class_path = root.join("class").join("infiniband");
        fs::create_dir_all(&class_path)?;
        Ok(Self { root, class_path })
    }

    /// Path of the fake class directory.
    #[inline]
    #[must_use]
    pub fn class_path(&self) -> &Path {
        &self.class_path
    }

    /// Default driver configuration scanning this tree.
    #[inline]
    #[must_use]
    pub fn config(&self) -> DriverConfig {
        DriverConfig::with_class_path(&self.class_path)
    }

    /// Adds a device node with an empty `device/` directory. Returns the node path.
    ///
    /// # Errors
    /// Returns an error if the directories cannot be created.
    #[inline]
    pub fn add_device(&self, name: &str) -> io::Result<PathBuf> {
        let node = self.class_path.join(name);
        fs::create_dir_all(node.join("device"))?;
        Ok(node)
    }

    /// Adds a device node whose vendor attribute holds `vendor` verbatim.
    ///
    /// # Errors
    /// Returns an error if the node or attribute cannot be written.
    #[inline]
    pub fn add_device_with_vendor(&self, name: &str, vendor: &str) -> io::Result<PathBuf> {
        let node = self.add_device(name)?;
        fs::write(node.join(VENDOR_ATTR_PATH), vendor)?;
        Ok(node)
    }

    /// Removes the class directory, as on a host without verbs devices.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be removed.
    #[inline]
    pub fn remove_class_dir(&self) -> io::Result<()> {
        fs::remove_dir_all(&self.class_path)
    }
}

impl Drop for FakeSysfs {
    #[inline]
    fn drop(&mut self) {
        let _ignore = fs::remove_dir_all(&self.root);
    }
}
