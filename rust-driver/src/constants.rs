/// PCI vendor id assigned to Cisco Systems.
pub const PCI_VENDOR_ID_CISCO: u32 = 0x1137;

/// Sysfs class directory listing every registered verbs device.
pub const INFINIBAND_CLASS_PATH: &str = "/sys/class/infiniband";

/// Name prefix the kernel gives usNIC verbs devices, e.g. `usnic_0`.
pub const USNIC_DEVICE_PREFIX: &str = "usnic_";

/// Name this driver registers under.
pub const USNIC_DRIVER_NAME: &str = "usnic_verbs";

/// Vendor attribute, relative to a device's sysfs node.
pub const VENDOR_ATTR_PATH: &str = "device/vendor";

/// Size of the buffer an attribute value is read into, terminator included.
pub const SYSFS_VALUE_BUF_LEN: usize = 8;

/// Name carried by the placeholder device.
pub const FAKE_DEVICE_NAME: &str = "Cisco usNIC functionality is provided by libfabric";
