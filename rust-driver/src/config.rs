use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    INFINIBAND_CLASS_PATH, PCI_VENDOR_ID_CISCO, USNIC_DEVICE_PREFIX, USNIC_DRIVER_NAME,
    VENDOR_ATTR_PATH,
};

/// Errors raised while loading a [`DriverConfig`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Where the driver looks for devices and what it accepts.
///
/// The default matches a real host. Other values only make sense for pointing
/// the driver at a fake sysfs tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct DriverConfig {
    /// Class directory scanned for candidate devices
    pub class_path: PathBuf,
    /// Entry name prefix that marks a candidate device
    pub device_prefix: String,
    /// Name passed to the registry
    pub driver_name: String,
    /// Vendor id a device must report to be claimed
    pub vendor_id: u32,
    /// Vendor attribute path, relative to the device node
    pub vendor_attr: PathBuf,
}

impl Default for DriverConfig {
    #[inline]
    fn default() -> Self {
        Self {
            class_path: PathBuf::from(INFINIBAND_CLASS_PATH),
            device_prefix: USNIC_DEVICE_PREFIX.to_owned(),
            driver_name: USNIC_DRIVER_NAME.to_owned(),
            vendor_id: PCI_VENDOR_ID_CISCO,
            vendor_attr: PathBuf::from(VENDOR_ATTR_PATH),
        }
    }
}

impl DriverConfig {
    /// Returns a default configuration scanning `class_path` instead.
    #[inline]
    #[must_use]
    pub fn with_class_path(class_path: impl AsRef<Path>) -> Self {
        Self {
            class_path: class_path.as_ref().into(),
            ..Self::default()
        }
    }
}

/// Loads a [`DriverConfig`] from TOML.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML.
    #[inline]
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<DriverConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if `content` is not valid TOML.
    #[inline]
    pub fn from_toml_str(content: &str) -> Result<DriverConfig, ConfigError> {
        let config: DriverConfig = toml::from_str(content)?;
        Ok(config)
    }
}
