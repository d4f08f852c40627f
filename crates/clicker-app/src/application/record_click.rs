//! ClickRecorder: turns the next real primary click into a stored click.
//!
//! The recorder is armed from the command surface.  While armed it owns the
//! pointer hook: pointer moves update a live position readout, and the first
//! primary-button-down appends a new enabled [`SavedClick`] and disarms.
//!
//! Arming and capture race with each other across threads (the command
//! thread and the pointer hook thread), so every transition is decided under
//! the shared state lock: whichever of capture or cancel sees `Recording`
//! first wins and the other becomes a no-op.

use std::sync::Arc;

use clicker_core::{PlaybackState, SavedClick};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::{SharedState, SharedStore};
use crate::infrastructure::input_hooks::{
    HookError, HookHandler, HookManager, InputEvent, PointerKind, Propagate,
};

/// Error type for the recording use case.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("a recording is already in progress")]
    AlreadyRecording,
    #[error("cannot record while playback is active")]
    RecordingWhilePlaying,
    #[error("could not start recording: {0}")]
    HookInstallFailed(#[from] HookError),
}

/// Captures one click position per arm.
pub struct ClickRecorder {
    store: SharedStore,
    state: SharedState,
    hooks: Arc<HookManager>,
    live_position: Mutex<Option<(i32, i32)>>,
}

impl ClickRecorder {
    pub fn new(store: SharedStore, state: SharedState, hooks: Arc<HookManager>) -> Self {
        Self {
            store,
            state,
            hooks,
            live_position: Mutex::new(None),
        }
    }

    /// Arms the recorder and installs the pointer hook.
    ///
    /// The state moves to `Recording` before the hook is installed, so the
    /// first pointer event can never observe an unarmed recorder.
    ///
    /// # Errors
    ///
    /// - [`RecordError::AlreadyRecording`] if already armed.
    /// - [`RecordError::RecordingWhilePlaying`] during playback.
    /// - [`RecordError::HookInstallFailed`] if the pointer hook could not be
    ///   registered; the state is rolled back.
    pub fn arm(self: &Arc<Self>) -> Result<(), RecordError> {
        let previous = {
            let mut state = self.state.lock();
            match *state {
                PlaybackState::Recording => return Err(RecordError::AlreadyRecording),
                PlaybackState::Playing | PlaybackState::Paused => {
                    return Err(RecordError::RecordingWhilePlaying)
                }
                PlaybackState::Idle => {}
            }
            *self.live_position.lock() = None;
            std::mem::replace(&mut *state, PlaybackState::Recording)
        };

        let handler: Arc<dyn HookHandler> = Arc::clone(self) as Arc<dyn HookHandler>;
        if let Err(e) = self.hooks.install_pointer(handler) {
            let mut state = self.state.lock();
            if *state == PlaybackState::Recording {
                *state = previous;
            }
            warn!("recording aborted: {e}");
            return Err(e.into());
        }

        // A cancel that ran before the install found no hook to remove.
        if *self.state.lock() != PlaybackState::Recording {
            self.hooks.uninstall_pointer();
            info!("recording cancelled while arming");
            return Ok(());
        }

        info!("recording armed; waiting for a primary click");
        Ok(())
    }

    /// Disarms without creating a click and removes the pointer hook.
    ///
    /// Callable in any state; a no-op when not recording.
    pub fn cancel(&self) {
        let cancelled = {
            let mut state = self.state.lock();
            if *state == PlaybackState::Recording {
                *state = PlaybackState::Idle;
                true
            } else {
                false
            }
        };
        *self.live_position.lock() = None;
        self.hooks.uninstall_pointer();
        if cancelled {
            info!("recording cancelled");
        }
    }

    /// `true` while armed.
    pub fn is_armed(&self) -> bool {
        *self.state.lock() == PlaybackState::Recording
    }

    /// Last pointer position observed while armed.
    pub fn live_position(&self) -> Option<(i32, i32)> {
        *self.live_position.lock()
    }

    /// Feeds one pointer event to the recorder.
    ///
    /// Returns `true` if the event completed the recording.
    pub fn on_pointer_event(&self, kind: PointerKind, x: i32, y: i32) -> bool {
        match kind {
            PointerKind::Move => {
                if self.is_armed() {
                    *self.live_position.lock() = Some((x, y));
                }
                false
            }
            PointerKind::PrimaryDown => self.capture(x, y),
            _ => false,
        }
    }

    fn capture(&self, x: i32, y: i32) -> bool {
        let id = {
            let mut state = self.state.lock();
            if *state != PlaybackState::Recording {
                debug!(x, y, "primary click ignored: recorder not armed");
                return false;
            }
            let id = self.store.write().add(SavedClick::new(x, y));
            *state = PlaybackState::Idle;
            id
        };

        *self.live_position.lock() = None;
        self.hooks.uninstall_pointer();
        info!(%id, x, y, "click recorded");
        true
    }
}

impl HookHandler for ClickRecorder {
    fn handle(&self, event: &InputEvent) -> Propagate {
        match *event {
            InputEvent::Pointer { kind, x, y } if self.on_pointer_event(kind, x, y) => {
                Propagate::Handled
            }
            _ => Propagate::Unhandled,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
