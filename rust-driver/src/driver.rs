//! Detection of usNIC devices and the vendor probe.

use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Once, OnceLock,
    },
};

use log::{debug, trace};

use crate::{
    config::DriverConfig,
    constants::SYSFS_VALUE_BUF_LEN,
    device::{DeviceDescriptor, FAKE_DEVICE},
    parse::parse_c_int,
    registry::{DriverRegistry, ProbeFn},
    sysfs::{class_has_prefixed_entry, read_sysfs_file},
};

static DEFAULT_DRIVER: OnceLock<UsnicDriver> = OnceLock::new();
static INIT: Once = Once::new();

/// Registers the default driver with `registry` if the host has usNIC devices.
///
/// Meant to be called once at startup, before anything enumerates devices
/// through the registry. Only the first call does anything. Returns whether
/// this call registered the driver.
#[inline]
pub fn init<R: DriverRegistry + ?Sized>(registry: &R) -> bool {
    let mut registered = false;
    INIT.call_once(|| registered = default_driver().register(registry));
    registered
}

/// Probes `sysfs_path` with the default driver. See [`UsnicDriver::probe`].
#[inline]
#[must_use]
pub fn probe(sysfs_path: &Path, abi_version: i32) -> Option<&'static DeviceDescriptor> {
    default_driver().probe(sysfs_path, abi_version)
}

fn default_driver() -> &'static UsnicDriver {
    DEFAULT_DRIVER.get_or_init(UsnicDriver::default)
}

/// Stub driver for Cisco usNIC verbs devices.
///
/// Claims usNIC nodes so that enumeration succeeds, and hands out
/// [`FAKE_DEVICE`] for them, which refuses every operation.
#[derive(Debug, Default)]
pub struct UsnicDriver {
    config: Arc<DriverConfig>,
    attempted: AtomicBool,
    registered: AtomicBool,
}

impl UsnicDriver {
    /// Creates a driver using `config`.
    #[inline]
    #[must_use]
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config: Arc::new(config),
            attempted: AtomicBool::new(false),
            registered: AtomicBool::new(false),
        }
    }

    /// The driver's configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Whether this driver has registered with a registry.
    #[inline]
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Whether the class directory lists at least one usNIC device.
    ///
    /// A missing class directory means the host has no verbs devices at all,
    /// which is reported as `false`.
    #[inline]
    #[must_use]
    pub fn has_usnic_devices(&self) -> bool {
        let config = &self.config;
        match class_has_prefixed_entry(&config.class_path, &config.device_prefix) {
            Ok(found) => found,
            Err(err) => {
                debug!("cannot scan {}: {err}", config.class_path.display());
                false
            }
        }
    }

    /// Registers with `registry` when usNIC devices are present.
    ///
    /// The registry sees at most one call per driver, however many devices
    /// exist or however often this is called. Returns whether this call
    /// registered the driver, which is false if the registry declined it.
    #[inline]
    pub fn register<R: DriverRegistry + ?Sized>(&self, registry: &R) -> bool {
        if self.attempted.load(Ordering::Acquire) || !self.has_usnic_devices() {
            return false;
        }
        if self.attempted.swap(true, Ordering::AcqRel) {
            return false;
        }

        let config = Arc::clone(&self.config);
        let probe: ProbeFn = Arc::new(move |sysfs_path: &Path, abi_version: i32| {
            probe_vendor(&config, sysfs_path, abi_version)
        });
        if !registry.register_driver(&self.config.driver_name, probe) {
            debug!("registry declined driver {}", self.config.driver_name);
            return false;
        }
        self.registered.store(true, Ordering::Release);
        debug!("registered driver {}", self.config.driver_name);
        true
    }

    /// Decides whether the device node at `sysfs_path` is claimed.
    ///
    /// The node's vendor attribute must parse to the configured vendor id.
    /// `abi_version` is not used. Any failure yields `None`.
    #[inline]
    #[must_use]
    pub fn probe(&self, sysfs_path: &Path, abi_version: i32) -> Option<&'static DeviceDescriptor> {
        probe_vendor(&self.config, sysfs_path, abi_version)
    }
}

fn probe_vendor(
    config: &DriverConfig,
    sysfs_path: &Path,
    abi_version: i32,
) -> Option<&'static DeviceDescriptor> {
    trace!("probing {} with abi version {abi_version}", sysfs_path.display());

    let value = match read_sysfs_file(sysfs_path, &config.vendor_attr, SYSFS_VALUE_BUF_LEN) {
        Ok(value) => value,
        Err(err) => {
            debug!("cannot read vendor of {}: {err}", sysfs_path.display());
            return None;
        }
    };
    let Some(vendor) = parse_c_int(&value) else {
        debug!("unparsable vendor {value:?} at {}", sysfs_path.display());
        return None;
    };

    if u32::try_from(vendor).is_ok_and(|id| id == config.vendor_id) {
        Some(&FAKE_DEVICE)
    } else {
        debug!("{} has vendor {vendor:#x}, not claimed", sysfs_path.display());
        None
    }
}
