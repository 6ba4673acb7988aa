use core::ffi::{CStr, c_char, c_int, c_void};
use std::{
    ffi::{CString, OsStr},
    os::unix::ffi::OsStrExt,
    path::Path,
    ptr,
    sync::OnceLock,
};

use log::debug;
use usnic_empty_driver::{DriverRegistry, ProbeFn};

use crate::device::{IbvDevice, fake_device};

type InitFn = unsafe extern "C" fn(*const c_char, c_int) -> *mut IbvDevice;
type RegisterDriverFn = unsafe extern "C" fn(*const c_char, InitFn);

// libibverbs keeps the name pointer, so it has to live as long as the process.
static DRIVER_NAME: OnceLock<CString> = OnceLock::new();
static PROBE: OnceLock<ProbeFn> = OnceLock::new();

/// The host's libibverbs, reached through `ibv_register_driver`.
pub(crate) struct IbvRegistry;

impl IbvRegistry {
    fn lookup_register_driver() -> Option<RegisterDriverFn> {
        // Safety: dlsym with a valid NUL terminated symbol name.
        let sym = unsafe { libc::dlsym(libc::RTLD_DEFAULT, c"ibv_register_driver".as_ptr()) };
        if sym.is_null() {
            return None;
        }
        // Safety: the symbol is libibverbs' `ibv_register_driver`.
        Some(unsafe { core::mem::transmute::<*mut c_void, RegisterDriverFn>(sym) })
    }
}

impl DriverRegistry for IbvRegistry {
    fn register_driver(&self, name: &str, probe: ProbeFn) -> bool {
        let Some(register) = Self::lookup_register_driver() else {
            debug!("ibv_register_driver not found, {name} not registered");
            return false;
        };
        let Ok(c_name) = CString::new(name) else {
            debug!("driver name {name:?} contains NUL");
            return false;
        };
        if PROBE.set(probe).is_err() {
            debug!("{name} already registered");
            return false;
        }
        let c_name = DRIVER_NAME.get_or_init(|| c_name);
        // Safety: both arguments stay valid for the rest of the process.
        unsafe { register(c_name.as_ptr(), usnic_driver_init) };
        true
    }
}

/// Init function libibverbs calls for every uverbs device node.
unsafe extern "C" fn usnic_driver_init(
    uverbs_sys_path: *const c_char,
    abi_version: c_int,
) -> *mut IbvDevice {
    match PROBE.get() {
        // Safety: forwarded from libibverbs unchanged.
        Some(probe) => unsafe { claim_device(probe, uverbs_sys_path, abi_version) },
        None => ptr::null_mut(),
    }
}

/// Runs `probe` on the node at `uverbs_sys_path` and maps a claimed node to
/// the placeholder C device.
///
/// # Safety
/// `uverbs_sys_path` must be null or point to a NUL terminated string.
unsafe fn claim_device(
    probe: &ProbeFn,
    uverbs_sys_path: *const c_char,
    abi_version: c_int,
) -> *mut IbvDevice {
    if uverbs_sys_path.is_null() {
        return ptr::null_mut();
    }
    // Safety: checked non-null, NUL termination is up to the caller.
    let path = unsafe { CStr::from_ptr(uverbs_sys_path) };
    let path = Path::new(OsStr::from_bytes(path.to_bytes()));

    match probe(path, abi_version) {
        Some(_) => fake_device(),
        None => ptr::null_mut(),
    }
}
