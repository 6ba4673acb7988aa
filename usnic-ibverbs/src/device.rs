use core::{
    ffi::{c_char, c_int},
    ptr::{self, NonNull},
};
use std::sync::OnceLock;

use usnic_empty_driver::{ContextOp, DeviceDescriptor, FAKE_DEVICE};

const IBV_SYSFS_NAME_MAX: usize = 64;
const IBV_SYSFS_PATH_MAX: usize = 256;
const IBV_NODE_UNKNOWN: c_int = -1;
const IBV_TRANSPORT_UNKNOWN: c_int = -1;

type AllocContextFn = unsafe extern "C" fn(*mut IbvDevice, c_int) -> *mut ffi::ibv_context;
type FreeContextFn = unsafe extern "C" fn(*mut ffi::ibv_context);

#[repr(C)]
struct IbvDeviceOps {
    alloc_context: Option<AllocContextFn>,
    free_context: Option<FreeContextFn>,
}

/// Legacy `struct ibv_device`, as handed back from a driver init function.
/// libibverbs fills in `dev_name`, `dev_path` and `ibdev_path` after a
/// successful probe.
#[repr(C)]
pub(crate) struct IbvDevice {
    ops: IbvDeviceOps,
    node_type: c_int,
    transport_type: c_int,
    name: [c_char; IBV_SYSFS_NAME_MAX],
    dev_name: [c_char; IBV_SYSFS_NAME_MAX],
    dev_path: [c_char; IBV_SYSFS_PATH_MAX],
    ibdev_path: [c_char; IBV_SYSFS_PATH_MAX],
}

impl IbvDevice {
    fn new(descriptor: &DeviceDescriptor) -> Self {
        Self {
            ops: IbvDeviceOps {
                alloc_context: Some(fake_alloc_context),
                free_context: Some(fake_free_context),
            },
            node_type: IBV_NODE_UNKNOWN,
            transport_type: IBV_TRANSPORT_UNKNOWN,
            name: to_c_chars(descriptor.name()),
            dev_name: [0; IBV_SYSFS_NAME_MAX],
            dev_path: [0; IBV_SYSFS_PATH_MAX],
            ibdev_path: [0; IBV_SYSFS_PATH_MAX],
        }
    }
}

struct DevicePtr(NonNull<IbvDevice>);

// Safety: the device is leaked and never freed; the only writer is libibverbs
// during enumeration.
unsafe impl Send for DevicePtr {}
unsafe impl Sync for DevicePtr {}

static FAKE_IBV_DEVICE: OnceLock<DevicePtr> = OnceLock::new();

/// The C view of [`FAKE_DEVICE`]. Allocated on first use and kept for the
/// lifetime of the process, since libibverbs writes into it.
pub(crate) fn fake_device() -> *mut IbvDevice {
    FAKE_IBV_DEVICE
        .get_or_init(|| {
            let device = Box::leak(Box::new(IbvDevice::new(&FAKE_DEVICE)));
            DevicePtr(NonNull::from(device))
        })
        .0
        .as_ptr()
}

/// Copies `s` into a NUL terminated buffer, cutting it to fit.
fn to_c_chars<const N: usize>(s: &str) -> [c_char; N] {
    let mut buf = [0; N];
    for (dst, src) in buf.iter_mut().zip(s.bytes().take(N.saturating_sub(1))) {
        *dst = src as c_char;
    }
    buf
}

unsafe extern "C" fn fake_alloc_context(
    _ibdev: *mut IbvDevice,
    cmd_fd: c_int,
) -> *mut ffi::ibv_context {
    match FAKE_DEVICE.alloc_context(cmd_fd) {
        Some(ctx) => match ctx {},
        None => ptr::null_mut(),
    }
}

unsafe extern "C" fn fake_free_context(_ibctx: *mut ffi::ibv_context) {
    let _none = FAKE_DEVICE.dispatch(ContextOp::FreeContext);
}
