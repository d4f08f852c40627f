//! Global input hook infrastructure.
//!
//! On Windows, each hook kind (keyboard, pointer) is a low-level hook
//! (`WH_KEYBOARD_LL` / `WH_MOUSE_LL`) running on its own Win32 message-loop
//! thread.  Raw OS events are normalised into [`InputEvent`] values and passed
//! synchronously to a [`HookHandler`] on that thread.
//!
//! # Windows-Specific Implementation
//!
//! The hook callbacks must complete within ~300ms or Windows will silently
//! remove the hook.  Handlers therefore only flip in-memory state or hand work
//! to the Tokio runtime; they never wait on the playback loop.  The event is
//! always forwarded to the next hook in the chain after the handler returns.
//!
//! # Testability
//!
//! The [`InputHooks`] trait allows unit tests to drive handlers with
//! synthetic events through [`mock::MockInputHooks`] without OS hooks.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

// ── Event types ───────────────────────────────────────────────────────────────

/// Which of the two independent global hooks an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Keyboard,
    Pointer,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Keyboard => f.write_str("keyboard"),
            HookKind::Pointer => f.write_str("pointer"),
        }
    }
}

/// Pointer event classification used by the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    /// Left button pressed.  The only button that completes a recording.
    PrimaryDown,
    SecondaryDown,
    MiddleDown,
    /// Button releases, wheel and extra buttons.
    Other,
}

/// A normalised input event delivered to a [`HookHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.  `code` is the platform virtual-key code.
    KeyDown { code: u32 },
    /// A pointer event at absolute screen coordinates.
    Pointer { kind: PointerKind, x: i32, y: i32 },
}

/// What a handler did with an event.
///
/// The platform host forwards the event to the next hook either way; the
/// value is only reported in debug logs.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagate {
    Handled,
    Unhandled,
}

/// Receives normalised events on the hook thread.
pub trait HookHandler: Send + Sync {
    fn handle(&self, event: &InputEvent) -> Propagate;
}

/// Opaque handle for one installed hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle {
    id: u64,
    kind: HookKind,
}

impl HookHandle {
    /// Builds a handle.  Only hook implementations create handles.
    pub(crate) fn new(id: u64, kind: HookKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> HookKind {
        self.kind
    }
}

/// Error type for hook operations.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to install {kind} hook: {reason}")]
    InstallFailed { kind: HookKind, reason: String },
    #[error("{0} hook is already installed")]
    AlreadyInstalled(HookKind),
    #[error("global input hooks are not supported on this platform")]
    UnsupportedPlatform,
}

/// Trait abstracting the OS hook registration.
///
/// The production implementation uses Windows hooks; tests use
/// [`mock::MockInputHooks`].
pub trait InputHooks: Send + Sync {
    /// Registers a global hook of `kind` that delivers events to `handler`.
    fn install(
        &self,
        kind: HookKind,
        handler: Arc<dyn HookHandler>,
    ) -> Result<HookHandle, HookError>;

    /// Releases a hook.  Releasing an unknown or already released handle is
    /// a no-op.
    fn uninstall(&self, handle: HookHandle);
}

/// Hooks for targets without a global hook implementation.
///
/// Every install reports [`HookError::UnsupportedPlatform`].
#[derive(Debug, Default)]
pub struct UnsupportedHooks;

impl InputHooks for UnsupportedHooks {
    fn install(
        &self,
        _kind: HookKind,
        _handler: Arc<dyn HookHandler>,
    ) -> Result<HookHandle, HookError> {
        Err(HookError::UnsupportedPlatform)
    }

    fn uninstall(&self, _handle: HookHandle) {}
}

/// Returns the hook implementation for the compile target.
pub fn platform_hooks() -> Arc<dyn InputHooks> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsInputHooks::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnsupportedHooks)
    }
}

// ── Hook manager ──────────────────────────────────────────────────────────────

/// Owns the keyboard and pointer hook handles of one session.
///
/// At most one hook of each kind is installed at a time.  All uninstall paths
/// are idempotent, so the recorder, the session and `Drop` can each release
/// hooks without coordinating.
pub struct HookManager {
    hooks: Arc<dyn InputHooks>,
    keyboard: Mutex<Option<HookHandle>>,
    pointer: Mutex<Option<HookHandle>>,
}

impl HookManager {
    pub fn new(hooks: Arc<dyn InputHooks>) -> Self {
        Self {
            hooks,
            keyboard: Mutex::new(None),
            pointer: Mutex::new(None),
        }
    }

    /// Installs the session-long keyboard hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyInstalled`] if the keyboard hook is
    /// already registered, or the platform error if registration fails.
    pub fn install_keyboard(&self, handler: Arc<dyn HookHandler>) -> Result<HookHandle, HookError> {
        self.install(HookKind::Keyboard, handler)
    }

    /// Installs the recording-only pointer hook.
    ///
    /// # Errors
    ///
    /// Same as [`install_keyboard`](Self::install_keyboard).
    pub fn install_pointer(&self, handler: Arc<dyn HookHandler>) -> Result<HookHandle, HookError> {
        self.install(HookKind::Pointer, handler)
    }

    pub fn uninstall_keyboard(&self) {
        self.uninstall(HookKind::Keyboard);
    }

    pub fn uninstall_pointer(&self) {
        self.uninstall(HookKind::Pointer);
    }

    pub fn is_installed(&self, kind: HookKind) -> bool {
        self.slot(kind).lock().is_some()
    }

    /// Releases every hook still installed.
    pub fn shutdown(&self) {
        self.uninstall_pointer();
        self.uninstall_keyboard();
    }

    fn install(
        &self,
        kind: HookKind,
        handler: Arc<dyn HookHandler>,
    ) -> Result<HookHandle, HookError> {
        let mut slot = self.slot(kind).lock();
        if slot.is_some() {
            return Err(HookError::AlreadyInstalled(kind));
        }
        let handle = self.hooks.install(kind, handler)?;
        info!(%kind, id = handle.id(), "global hook installed");
        *slot = Some(handle);
        Ok(handle)
    }

    fn uninstall(&self, kind: HookKind) {
        // Take the handle first so the slot lock is not held across the
        // platform call.
        let handle = self.slot(kind).lock().take();
        if let Some(handle) = handle {
            self.hooks.uninstall(handle);
            info!(%kind, id = handle.id(), "global hook removed");
        } else {
            debug!(%kind, "uninstall requested but no hook is installed");
        }
    }

    fn slot(&self, kind: HookKind) -> &Mutex<Option<HookHandle>> {
        match kind {
            HookKind::Keyboard => &self.keyboard,
            HookKind::Pointer => &self.pointer,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::mock::MockInputHooks;
    use super::*;

    struct Ignore;

    impl HookHandler for Ignore {
        fn handle(&self, _event: &InputEvent) -> Propagate {
            Propagate::Unhandled
        }
    }

    #[test]
    fn test_manager_rejects_second_install_of_same_kind() {
        // Arrange
        let hooks = Arc::new(MockInputHooks::new());
        let manager = HookManager::new(hooks.clone());
        manager.install_pointer(Arc::new(Ignore)).unwrap();

        // Act
        let result = manager.install_pointer(Arc::new(Ignore));

        // Assert
        assert!(matches!(result, Err(HookError::AlreadyInstalled(HookKind::Pointer))));
        assert_eq!(hooks.install_count(HookKind::Pointer), 1);
    }

    #[test]
    fn test_manager_installs_kinds_independently() {
        let hooks = Arc::new(MockInputHooks::new());
        let manager = HookManager::new(hooks.clone());

        manager.install_keyboard(Arc::new(Ignore)).unwrap();
        manager.install_pointer(Arc::new(Ignore)).unwrap();
        manager.uninstall_pointer();

        assert!(manager.is_installed(HookKind::Keyboard));
        assert!(!manager.is_installed(HookKind::Pointer));
        assert!(hooks.is_installed(HookKind::Keyboard));
        assert!(!hooks.is_installed(HookKind::Pointer));
    }

    #[test]
    fn test_manager_uninstall_is_idempotent() {
        // Arrange
        let hooks = Arc::new(MockInputHooks::new());
        let manager = HookManager::new(hooks.clone());
        manager.install_pointer(Arc::new(Ignore)).unwrap();

        // Act
        manager.uninstall_pointer();
        manager.uninstall_pointer();
        manager.shutdown();

        // Assert – the platform saw exactly one release
        assert_eq!(hooks.uninstall_count(HookKind::Pointer), 1);
    }

    #[test]
    fn test_manager_failed_install_leaves_slot_empty() {
        let hooks = Arc::new(MockInputHooks::new());
        hooks.set_fail_installs(true);
        let manager = HookManager::new(hooks.clone());

        let result = manager.install_keyboard(Arc::new(Ignore));

        assert!(matches!(result, Err(HookError::InstallFailed { .. })));
        assert!(!manager.is_installed(HookKind::Keyboard));
    }

    #[test]
    fn test_unsupported_hooks_report_unsupported_platform() {
        let manager = HookManager::new(Arc::new(UnsupportedHooks));

        let result = manager.install_keyboard(Arc::new(Ignore));

        assert!(matches!(result, Err(HookError::UnsupportedPlatform)));
    }

    #[test]
    fn test_hook_error_messages_name_the_hook_kind() {
        let err = HookError::AlreadyInstalled(HookKind::Keyboard);
        assert_eq!(err.to_string(), "keyboard hook is already installed");
    }
}
