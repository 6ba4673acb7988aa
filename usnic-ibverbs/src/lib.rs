//! libibverbs provider shim for the usNIC placeholder driver.

mod device;
mod registry;

use core::ffi::c_int;

use registry::IbvRegistry;

/// Registers the placeholder driver with libibverbs when the library is loaded.
#[ctor::ctor]
unsafe fn usnic_register_driver() {
    let _ignore = init();
}

/// Registers the placeholder driver if usNIC devices exist.
///
/// Runs automatically on load; calling it again is a no-op. Returns 1 if this
/// call registered the driver with libibverbs, 0 otherwise, including when
/// libibverbs offers no `ibv_register_driver`.
#[unsafe(export_name = "usnic_verbs_init")]
pub extern "C" fn init() -> c_int {
    let _ignore = env_logger::try_init();
    c_int::from(usnic_empty_driver::init(&IbvRegistry))
}
