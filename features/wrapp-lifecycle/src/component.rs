use crate::types::{DynError, Injectable};

/// A unit of the system with start and stop hooks.
///
/// A started component is shared with everything that depends on it,
/// so both hooks take `&self`. Components keep their own state behind
/// interior mutability.
///
/// Example:
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use wrapp_lifecycle::{Component, DynError};
///
/// #[derive(Default)]
/// struct Cache {
///     running: AtomicBool,
/// }
///
/// impl Component for Cache {
///     fn start(&self) -> Result<(), DynError> {
///         self.running.store(true, Ordering::SeqCst);
///         Ok(())
///     }
///
///     fn stop(&self) -> Result<(), DynError> {
///         self.running.store(false, Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
pub trait Component: Injectable {
    /// Called once after construction, before any dependent is constructed.
    ///
    /// On error the component is dropped and the system start is aborted.
    fn start(&self) -> Result<(), DynError>;

    /// Called once when the system stops, after all dependents have been stopped.
    ///
    /// On error the component stays started and the system stop is aborted.
    fn stop(&self) -> Result<(), DynError>;
}
