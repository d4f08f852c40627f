//! Synthetic click injection.
//!
//! The [`SyntheticInput`] trait is the only way the engine emits OS input.
//! The platform implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`; tests use [`mock::MockInjector`].

use std::sync::Arc;

use tracing::debug;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Emits a primary-button click at an absolute screen position.
///
/// Injection is fire-and-forget: the OS gives no reliable signal that a
/// click landed, so the trait has no error path.
pub trait SyntheticInput: Send + Sync {
    /// Moves the pointer to `(x, y)` and presses then releases the primary
    /// button.
    fn click(&self, x: i32, y: i32);
}

/// Injector for targets without synthetic input support.  Only logs.
#[derive(Debug, Default)]
pub struct NullInjector;

impl SyntheticInput for NullInjector {
    fn click(&self, x: i32, y: i32) {
        debug!(x, y, "synthetic click skipped: no injector on this platform");
    }
}

/// Returns the injector for the compile target.
pub fn platform_injector() -> Arc<dyn SyntheticInput> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsInjector::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(NullInjector)
    }
}
