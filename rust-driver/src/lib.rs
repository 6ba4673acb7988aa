//! Placeholder verbs driver for Cisco usNIC devices.
//!
//! usNIC hardware shows up under `/sys/class/infiniband` as `usnic_*`, but its
//! functionality is provided by libfabric, not by verbs. This crate registers a
//! driver that claims those nodes so device enumeration succeeds, and hands
//! out a device that refuses every operation.
//!
//! The embedding application calls [`init`] once with its [`DriverRegistry`]
//! before enumerating devices.

mod config;
mod constants;
mod device;
mod driver;
mod error;
mod parse;
mod registry;
mod sysfs;

#[cfg(any(test, feature = "mock"))]
pub mod test_wrapper;

pub use config::{ConfigError, ConfigLoader, DriverConfig};
pub use constants::{
    FAKE_DEVICE_NAME, INFINIBAND_CLASS_PATH, PCI_VENDOR_ID_CISCO, SYSFS_VALUE_BUF_LEN,
    USNIC_DEVICE_PREFIX, USNIC_DRIVER_NAME, VENDOR_ATTR_PATH,
};
pub use device::{ContextOp, DeviceContext, DeviceDescriptor, FAKE_DEVICE};
pub use driver::{init, probe, UsnicDriver};
pub use error::{Result, StubError};
pub use parse::parse_c_int;
#[cfg(any(test, feature = "mock"))]
pub use registry::MockRegistry;
pub use registry::{DriverRegistry, ProbeFn};
pub use sysfs::{class_has_prefixed_entry, read_sysfs_file};
