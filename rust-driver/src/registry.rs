use std::{path::Path, sync::Arc};

use crate::device::DeviceDescriptor;

/// Callback the framework invokes for each candidate device node, with the
/// node's sysfs path and the kernel ABI version.
pub type ProbeFn = Arc<dyn Fn(&Path, i32) -> Option<&'static DeviceDescriptor> + Send + Sync>;

/// The plugin framework drivers register with.
pub trait DriverRegistry {
    /// Registers `probe` under `name`. Returns whether the registry accepted it.
    fn register_driver(&self, name: &str, probe: ProbeFn) -> bool;
}

impl<R: DriverRegistry + ?Sized> DriverRegistry for &R {
    #[inline]
    fn register_driver(&self, name: &str, probe: ProbeFn) -> bool {
        (**self).register_driver(name, probe)
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockRegistry;

#[cfg(any(test, feature = "mock"))]
mod mock {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::{fmt, path::Path, sync::Arc};

    use parking_lot::Mutex;

    use super::{DriverRegistry, ProbeFn};
    use crate::device::DeviceDescriptor;

    /// Registry that records registrations instead of forwarding them.
    #[derive(Default)]
    pub struct MockRegistry {
        entries: Mutex<Vec<(String, ProbeFn)>>,
    }

    impl MockRegistry {
        /// Creates an empty registry.
        #[inline]
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of registration calls received.
        #[inline]
        pub fn len(&self) -> usize {
            self.entries.lock().len()
        }

        /// Whether no registration call was received.
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.entries.lock().is_empty()
        }

        /// Names of the registered drivers, in call order.
        #[inline]
        pub fn names(&self) -> Vec<String> {
            self.entries.lock().iter().map(|(name, _)| name.clone()).collect()
        }

        /// Invokes the `index`-th registered probe.
        ///
        /// # Panics
        /// Panics if fewer than `index + 1` drivers were registered.
        #[inline]
        pub fn probe(
            &self,
            index: usize,
            path: &Path,
            abi_version: i32,
        ) -> Option<&'static DeviceDescriptor> {
            let probe = Arc::clone(&self.entries.lock().get(index).expect("no such driver").1);
            probe(path, abi_version)
        }
    }

    impl DriverRegistry for MockRegistry {
        #[inline]
        fn register_driver(&self, name: &str, probe: ProbeFn) -> bool {
            self.entries.lock().push((name.to_owned(), probe));
            true
        }
    }

    impl fmt::Debug for MockRegistry {
        #[inline]
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("MockRegistry")
                .field("drivers", &self.names())
                .finish()
        }
    }
}
