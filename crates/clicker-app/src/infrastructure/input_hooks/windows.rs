//! Windows low-level keyboard and mouse hook implementation.
//!
//! Each installed hook gets its own Win32 message-loop thread.  The thread
//! keeps its [`HookHandler`] in a thread-local slot, installs the hook with
//! `SetWindowsHookExW`, reports its thread id back to the installer, and then
//! pumps messages until `WM_QUIT` is posted by [`WindowsInputHooks::uninstall`].
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{error, trace, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, KBDLLHOOKSTRUCT, MSG, MSLLHOOKSTRUCT,
    PM_NOREMOVE, WH_KEYBOARD_LL, WH_MOUSE_LL, WINDOWS_HOOK_ID, WM_KEYDOWN, WM_LBUTTONDOWN,
    WM_MBUTTONDOWN, WM_MOUSEMOVE, WM_QUIT, WM_RBUTTONDOWN, WM_SYSKEYDOWN, WM_USER,
};

use super::{HookError, HookHandle, HookHandler, HookKind, InputEvent, InputHooks, PointerKind};

type HookProc = unsafe extern "system" fn(i32, WPARAM, LPARAM) -> LRESULT;

thread_local! {
    /// Handler for the hook owned by the current hook thread.
    static HANDLER: RefCell<Option<Arc<dyn HookHandler>>> = const { RefCell::new(None) };
}

/// Windows global hooks.
pub struct WindowsInputHooks {
    next_id: AtomicU64,
    /// Handle id → Win32 thread id of the owning message loop.
    threads: Mutex<HashMap<u64, u32>>,
}

impl WindowsInputHooks {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            threads: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WindowsInputHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHooks for WindowsInputHooks {
    fn install(
        &self,
        kind: HookKind,
        handler: Arc<dyn HookHandler>,
    ) -> Result<HookHandle, HookError> {
        let install_failed = |reason: String| HookError::InstallFailed { kind, reason };
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        thread::Builder::new()
            .name(format!("clicker-{kind}-hook"))
            .spawn(move || run_hook_thread(kind, handler, ready_tx))
            .map_err(|e| install_failed(e.to_string()))?;

        let thread_id = ready_rx
            .recv()
            .map_err(|_| install_failed("hook thread exited before reporting".to_string()))?
            .map_err(install_failed)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.threads.lock().insert(id, thread_id);
        Ok(HookHandle::new(id, kind))
    }

    fn uninstall(&self, handle: HookHandle) {
        let Some(thread_id) = self.threads.lock().remove(&handle.id()) else {
            return;
        };
        post_quit(thread_id);
    }
}

impl Drop for WindowsInputHooks {
    fn drop(&mut self) {
        for (_, thread_id) in self.threads.lock().drain() {
            post_quit(thread_id);
        }
    }
}

fn post_quit(thread_id: u32) {
    // SAFETY: Posting to a thread id is harmless even if the thread has
    // already exited; the call then fails and we log it.
    if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
        warn!(thread_id, "failed to stop hook thread: {e}");
    }
}

/// Entry point for one hook's message-loop thread.
fn run_hook_thread(
    kind: HookKind,
    handler: Arc<dyn HookHandler>,
    ready: SyncSender<Result<u32, String>>,
) {
    HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));

    let (hook_id, hook_proc): (WINDOWS_HOOK_ID, HookProc) = match kind {
        HookKind::Keyboard => (WH_KEYBOARD_LL, keyboard_hook_proc),
        HookKind::Pointer => (WH_MOUSE_LL, mouse_hook_proc),
    };

    let mut msg = MSG::default();
    // SAFETY: Creates this thread's message queue so a later
    // PostThreadMessageW(WM_QUIT) always has somewhere to land.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }

    // SAFETY: Low-level hooks need no module handle; the thread pumps
    // messages below for as long as the hook is installed.
    let hook = match unsafe { SetWindowsHookExW(hook_id, Some(hook_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    // SAFETY: No preconditions.
    let thread_id = unsafe { GetCurrentThreadId() };
    let installer_alive = ready.send(Ok(thread_id)).is_ok();

    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop; exits on WM_QUIT.
    unsafe {
        if installer_alive {
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                DispatchMessageW(&msg);
            }
        }
        UnhookWindowsHookEx(hook).ok();
    }

    HANDLER.with(|slot| slot.borrow_mut().take());
}

/// Runs the thread's handler on `event`.
///
/// A panic must never unwind into the OS callback frame, so it is caught,
/// logged and turned into a process abort.
fn dispatch(event: InputEvent) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        HANDLER.with(|slot| slot.borrow().as_ref().map(|handler| handler.handle(&event)))
    }));

    match outcome {
        Ok(Some(result)) => trace!(?event, ?result, "hook event dispatched"),
        Ok(None) => {}
        Err(_) => {
            error!(?event, "input hook handler panicked; aborting");
            std::process::abort();
        }
    }
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows on the hook thread; must return quickly.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 && matches!(w_param.0 as u32, WM_KEYDOWN | WM_SYSKEYDOWN) {
        // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
        let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
        dispatch(InputEvent::KeyDown { code: kbs.vkCode });
    }

    // SAFETY: Every event is forwarded to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows on the hook thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
        let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);
        dispatch(InputEvent::Pointer {
            kind: pointer_kind(w_param.0 as u32),
            x: mhs.pt.x,
            y: mhs.pt.y,
        });
    }

    // SAFETY: Every event is forwarded to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}

fn pointer_kind(message: u32) -> PointerKind {
    match message {
        WM_MOUSEMOVE => PointerKind::Move,
        WM_LBUTTONDOWN => PointerKind::PrimaryDown,
        WM_RBUTTONDOWN => PointerKind::SecondaryDown,
        WM_MBUTTONDOWN => PointerKind::MiddleDown,
        _ => PointerKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_kind_maps_button_downs() {
        assert_eq!(pointer_kind(WM_MOUSEMOVE), PointerKind::Move);
        assert_eq!(pointer_kind(WM_LBUTTONDOWN), PointerKind::PrimaryDown);
        assert_eq!(pointer_kind(WM_RBUTTONDOWN), PointerKind::SecondaryDown);
        assert_eq!(pointer_kind(WM_MBUTTONDOWN), PointerKind::MiddleDown);
    }

    #[test]
    fn test_pointer_kind_treats_button_up_as_other() {
        use windows::Win32::UI::WindowsAndMessaging::WM_LBUTTONUP;
        assert_eq!(pointer_kind(WM_LBUTTONUP), PointerKind::Other);
    }
}
