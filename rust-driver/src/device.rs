//! The placeholder device handed to the verbs framework.

use std::{fmt, os::fd::RawFd};

use log::debug;

use crate::constants::FAKE_DEVICE_NAME;

/// The one placeholder device. Every claimed node resolves to this value.
pub static FAKE_DEVICE: DeviceDescriptor = DeviceDescriptor::new(FAKE_DEVICE_NAME);

/// Operations the framework may request on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ContextOp {
    /// Open a user context on the device
    AllocateContext,
    /// Release a user context
    FreeContext,
}

impl ContextOp {
    /// Every operation a device exposes.
    pub const ALL: [ContextOp; 2] = [ContextOp::AllocateContext, ContextOp::FreeContext];
}

impl fmt::Display for ContextOp {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ContextOp::AllocateContext => f.write_str("alloc_context"),
            ContextOp::FreeContext => f.write_str("free_context"),
        }
    }
}

/// A device context. No value of this type can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceContext {}

/// A device that exists for enumeration but supports no operation.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct DeviceDescriptor {
    name: &'static str,
}

impl DeviceDescriptor {
    const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Human readable name, telling the user where the real functionality lives.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs `op` against the device. Always `None`.
    #[inline]
    #[must_use]
    pub fn dispatch(&self, op: ContextOp) -> Option<DeviceContext> {
        debug!("{op} requested on placeholder device \"{}\"", self.name);
        None
    }

    /// Allocates a context for the command channel `cmd_fd`. Always `None`.
    #[inline]
    #[must_use]
    pub fn alloc_context(&self, _cmd_fd: RawFd) -> Option<DeviceContext> {
        self.dispatch(ContextOp::AllocateContext)
    }

    /// Releases `ctx`.
    #[inline]
    pub fn free_context(&self, ctx: DeviceContext) {
        match ctx {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_points_to_libfabric() {
        assert_eq!(
            FAKE_DEVICE.name(),
            "Cisco usNIC functionality is provided by libfabric"
        );
    }

    #[test]
    fn every_operation_is_absent() {
        for op in ContextOp::ALL {
            assert!(FAKE_DEVICE.dispatch(op).is_none(), "{op} produced a context");
        }
        assert!(FAKE_DEVICE.alloc_context(3).is_none());
        assert!(FAKE_DEVICE.alloc_context(-1).is_none());
    }

    #[test]
    fn sentinel_is_shared() {
        let a: &'static DeviceDescriptor = &FAKE_DEVICE;
        let b: &'static DeviceDescriptor = &FAKE_DEVICE;
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn op_names() {
        assert_eq!(ContextOp::AllocateContext.to_string(), "alloc_context");
        assert_eq!(ContextOp::FreeContext.to_string(), "free_context");
    }
}
