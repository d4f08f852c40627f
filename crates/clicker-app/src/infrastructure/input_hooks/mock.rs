//! Mock input hooks for unit testing.
//!
//! Allows tests to deliver synthetic [`InputEvent`]s to installed handlers
//! without a Windows message loop, and to inspect the install/uninstall
//! history.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{HookError, HookHandle, HookHandler, HookKind, InputEvent, InputHooks, Propagate};

/// One entry in the mock's registration history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCall {
    Install(HookKind),
    Uninstall(HookKind),
}

/// A mock implementation of [`InputHooks`].
pub struct MockInputHooks {
    next_id: AtomicU64,
    installed: Mutex<HashMap<u64, (HookKind, Arc<dyn HookHandler>)>>,
    history: Mutex<Vec<HookCall>>,
    fail_installs: AtomicBool,
}

impl MockInputHooks {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            installed: Mutex::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
            fail_installs: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `install` fail with [`HookError::InstallFailed`].
    pub fn set_fail_installs(&self, fail: bool) {
        self.fail_installs.store(fail, Ordering::SeqCst);
    }

    /// Delivers `event` to the handler installed for `kind`, as if the OS had
    /// called the hook.
    ///
    /// Returns `None` when no hook of that kind is installed (the event is
    /// lost, exactly as with a real unhooked OS).
    pub fn emit(&self, kind: HookKind, event: InputEvent) -> Option<Propagate> {
        // Clone the handler out so it can re-enter `uninstall` while running.
        let handler = self
            .installed
            .lock()
            .values()
            .find(|(k, _)| *k == kind)
            .map(|(_, h)| Arc::clone(h))?;
        Some(handler.handle(&event))
    }

    pub fn is_installed(&self, kind: HookKind) -> bool {
        self.installed.lock().values().any(|(k, _)| *k == kind)
    }

    pub fn history(&self) -> Vec<HookCall> {
        self.history.lock().clone()
    }

    pub fn install_count(&self, kind: HookKind) -> usize {
        self.count(HookCall::Install(kind))
    }

    pub fn uninstall_count(&self, kind: HookKind) -> usize {
        self.count(HookCall::Uninstall(kind))
    }

    fn count(&self, call: HookCall) -> usize {
        self.history.lock().iter().filter(|c| **c == call).count()
    }
}

impl Default for MockInputHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHooks for MockInputHooks {
    fn install(
        &self,
        kind: HookKind,
        handler: Arc<dyn HookHandler>,
    ) -> Result<HookHandle, HookError> {
        if self.fail_installs.load(Ordering::SeqCst) {
            return Err(HookError::InstallFailed {
                kind,
                reason: "mock install failure".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.installed.lock().insert(id, (kind, handler));
        self.history.lock().push(HookCall::Install(kind));
        Ok(HookHandle::new(id, kind))
    }

    fn uninstall(&self, handle: HookHandle) {
        if self.installed.lock().remove(&handle.id()).is_some() {
            self.history.lock().push(HookCall::Uninstall(handle.kind()));
        }
    }
}
