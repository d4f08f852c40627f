//! ClickerSession: the one object that owns a running clicker.
//!
//! The session wires the shared click store, settings and playback state to
//! the recorder, scheduler and hotkey listener, and exposes the command
//! surface.  Every command maps to exactly one operation and returns that
//! operation's error unchanged inside [`SessionError`].
//!
//! # Lifecycle
//!
//! ```text
//! ClickerSession::new()        -- no OS resources yet
//!  └─ install_hotkey_hook()    -- keyboard hook for the whole run
//!  └─ execute(...)             -- pointer hook comes and goes with recording
//!  └─ shutdown() / Drop        -- stops playback, releases both hooks
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clicker_core::{
    ClickStore, PlaybackState, PolicyError, RepeatPolicy, RepeatType, SavedClick, Settings,
    StoreError,
};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::info;

use crate::application::commands::{HumanizeTarget, RepeatSetting, SessionCommand};
use crate::application::hotkey::{HotkeyError, HotkeyListener};
use crate::application::playback::{PlaybackError, PlaybackScheduler};
use crate::application::record_click::{ClickRecorder, RecordError};
use crate::application::status::StatusSnapshot;
use crate::application::{SharedSettings, SharedState, SharedStore};
use crate::infrastructure::input_hooks::{HookError, HookHandler, HookManager, InputHooks};
use crate::infrastructure::storage::document::{
    load_document, save_document, ClickDocument, StorageError,
};
use crate::infrastructure::synthetic_input::SyntheticInput;

/// Every failure the command surface can report.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Hook(#[from] HookError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no click at index {0}")]
    NoClickAt(usize),
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    Status(StatusSnapshot),
    Clicks(Vec<SavedClick>),
    Help,
    Quit,
}

/// A running clicker.
pub struct ClickerSession {
    store: SharedStore,
    settings: SharedSettings,
    state: SharedState,
    hooks: Arc<HookManager>,
    recorder: Arc<ClickRecorder>,
    scheduler: Arc<PlaybackScheduler>,
    hotkey: Arc<HotkeyListener>,
    shut_down: AtomicBool,
}

impl ClickerSession {
    /// Builds a session.  Playback tasks are spawned on `runtime`.
    pub fn new(
        runtime: Handle,
        hooks: Arc<dyn InputHooks>,
        injector: Arc<dyn SyntheticInput>,
        settings: Settings,
    ) -> Self {
        let store: SharedStore = Arc::new(RwLock::new(ClickStore::new()));
        let settings: SharedSettings = Arc::new(RwLock::new(settings));
        let state: SharedState = Arc::new(Mutex::new(PlaybackState::Idle));
        let hooks = Arc::new(HookManager::new(hooks));

        let recorder = Arc::new(ClickRecorder::new(
            Arc::clone(&store),
            Arc::clone(&state),
            Arc::clone(&hooks),
        ));
        let scheduler = Arc::new(PlaybackScheduler::new(
            runtime,
            injector,
            Arc::clone(&store),
            Arc::clone(&state),
        ));
        let hotkey = Arc::new(HotkeyListener::new(
            Arc::clone(&settings),
            Arc::clone(&state),
            Arc::clone(&scheduler),
        ));

        Self {
            store,
            settings,
            state,
            hooks,
            recorder,
            scheduler,
            hotkey,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Installs the session-long keyboard hook that feeds the hotkey listener.
    ///
    /// # Errors
    ///
    /// Returns the hook error if the keyboard hook cannot be registered.
    pub fn install_hotkey_hook(&self) -> Result<(), SessionError> {
        let handler: Arc<dyn HookHandler> = Arc::clone(&self.hotkey) as Arc<dyn HookHandler>;
        self.hooks.install_keyboard(handler)?;
        Ok(())
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying operation.
    pub fn execute(&self, command: SessionCommand) -> Result<CommandOutcome, SessionError> {
        match command {
            SessionCommand::StartRecording => self.start_recording()?,
            SessionCommand::CancelRecording => self.cancel_recording(),
            SessionCommand::TogglePlayPause => {
                self.toggle_play_pause()?;
            }
            SessionCommand::Stop => self.stop(),
            SessionCommand::Clear => self.clear(),
            SessionCommand::DeleteSelected => {
                self.delete_selected();
            }
            SessionCommand::SetHotkey(code) => self.set_hotkey(code)?,
            SessionCommand::Load(path) => self.load(&path)?,
            SessionCommand::Save(path) => self.save(&path)?,
            SessionCommand::Status => return Ok(CommandOutcome::Status(self.status())),
            SessionCommand::List => return Ok(CommandOutcome::Clicks(self.clicks())),
            SessionCommand::ToggleEnabled => self.toggle_enabled_scope(),
            SessionCommand::ToggleSelected => self.toggle_selected_scope(),
            SessionCommand::Select(index) => self.toggle_selection(index)?,
            SessionCommand::Enable(index) => self.set_enabled(index, true)?,
            SessionCommand::Disable(index) => self.set_enabled(index, false)?,
            SessionCommand::MoveClick { index, x, y } => self.move_click(index, x, y)?,
            SessionCommand::SetDelay(ms) => self.set_delay_ms(ms),
            SessionCommand::SetRepeat(repeat) => self.set_repeat(repeat)?,
            SessionCommand::SetHumanize(target, on) => self.set_humanize(target, on),
            SessionCommand::Help => return Ok(CommandOutcome::Help),
            SessionCommand::Quit => return Ok(CommandOutcome::Quit),
        }
        Ok(CommandOutcome::Done)
    }

    // ── Recording ─────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// See [`ClickRecorder::arm`].
    pub fn start_recording(&self) -> Result<(), SessionError> {
        self.recorder.arm()?;
        Ok(())
    }

    pub fn cancel_recording(&self) {
        self.recorder.cancel();
    }

    // ── Playback ──────────────────────────────────────────────────────────────

    /// Starts, pauses or resumes playback with the current settings.
    ///
    /// # Errors
    ///
    /// See [`PlaybackScheduler::toggle`].
    pub fn toggle_play_pause(&self) -> Result<PlaybackState, SessionError> {
        let settings = self.settings.read().clone();
        Ok(self.scheduler.toggle(&settings)?)
    }

    /// Stops playback, or cancels recording when recording.
    pub fn stop(&self) {
        if self.state() == PlaybackState::Recording {
            self.recorder.cancel();
        } else {
            self.scheduler.stop();
        }
    }

    // ── Click list edits ──────────────────────────────────────────────────────

    pub fn clear(&self) {
        self.store.write().clear();
        info!("click list cleared");
    }

    /// Removes the selected clicks and returns how many were removed.
    pub fn delete_selected(&self) -> usize {
        let removed = self.store.write().remove_selected();
        info!(removed, "selected clicks deleted");
        removed
    }

    pub fn toggle_enabled_scope(&self) {
        self.store.write().toggle_enabled_scope();
    }

    pub fn toggle_selected_scope(&self) {
        self.store.write().toggle_selected_scope();
    }

    /// Flips the selection of the click at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoClickAt`] for an out-of-range index.
    pub fn toggle_selection(&self, index: usize) -> Result<(), SessionError> {
        let mut store = self.store.write();
        let id = store.id_at(index).ok_or(SessionError::NoClickAt(index))?;
        let selected = store.get(id).map_or(false, |click| click.is_selected);
        store.set_selected(id, !selected)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NoClickAt`] for an out-of-range index.
    pub fn set_enabled(&self, index: usize, enabled: bool) -> Result<(), SessionError> {
        let mut store = self.store.write();
        let id = store.id_at(index).ok_or(SessionError::NoClickAt(index))?;
        store.set_enabled(id, enabled)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NoClickAt`] for an out-of-range index.
    pub fn move_click(&self, index: usize, x: i32, y: i32) -> Result<(), SessionError> {
        let mut store = self.store.write();
        let id = store.id_at(index).ok_or(SessionError::NoClickAt(index))?;
        store.set_position(id, x, y)?;
        info!(%id, x, y, "click moved");
        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────────────────────

    /// Sets (`Some`) or clears (`None`) the play/pause hotkey.
    ///
    /// # Errors
    ///
    /// Returns [`HotkeyError::RecordingInProgress`] while recording.
    pub fn set_hotkey(&self, code: Option<u32>) -> Result<(), SessionError> {
        match code {
            Some(code) => self.hotkey.set_trigger(code)?,
            None => self.hotkey.clear_trigger()?,
        }
        Ok(())
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.settings.write().delay_ms = delay_ms;
    }

    /// # Errors
    ///
    /// Returns [`PolicyError::ZeroRepeatCount`] for a count of zero.
    pub fn set_repeat(&self, repeat: RepeatSetting) -> Result<(), SessionError> {
        let mut settings = self.settings.write();
        match repeat {
            RepeatSetting::Count(n) => {
                RepeatPolicy::count(n)?;
                settings.repeat_type = RepeatType::Count;
                settings.repeat_count = n;
            }
            RepeatSetting::Continuous => settings.repeat_type = RepeatType::Continuous,
        }
        Ok(())
    }

    pub fn set_humanize(&self, target: HumanizeTarget, on: bool) {
        let mut settings = self.settings.write();
        if matches!(target, HumanizeTarget::Both | HumanizeTarget::Delay) {
            settings.humanize_delay = on;
        }
        if matches!(target, HumanizeTarget::Both | HumanizeTarget::ClickSpot) {
            settings.humanize_click_spot = on;
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Replaces the settings and the click list with a document's contents.
    ///
    /// The document is fully parsed and validated before anything changes.
    ///
    /// # Errors
    ///
    /// - [`StorageError::ReadFailed`] for unreadable or malformed documents.
    /// - [`HotkeyError::RecordingInProgress`] while recording.
    pub fn load(&self, path: &Path) -> Result<(), SessionError> {
        let document = load_document(path)?;

        let state = self.state.lock();
        if *state == PlaybackState::Recording {
            return Err(HotkeyError::RecordingInProgress.into());
        }
        *self.settings.write() = document.settings.clone();
        self.store.write().replace_all(document.saved_clicks());
        drop(state);

        info!(path = %path.display(), clicks = document.clicks.len(), "click document loaded");
        Ok(())
    }

    /// Writes the settings and click positions to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WriteFailed`] on failure.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let document = ClickDocument::new(self.settings(), self.store.read().positions());
        save_document(path, &document)?;
        info!(path = %path.display(), clicks = document.clicks.len(), "click document saved");
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn status(&self) -> StatusSnapshot {
        let (count, count_enabled, count_selected) = {
            let store = self.store.read();
            (store.count(), store.count_enabled(), store.count_selected())
        };
        StatusSnapshot {
            count,
            count_enabled,
            count_selected,
            state: self.state(),
            live_position: self.recorder.live_position(),
            hotkey: self.settings.read().hotkey(),
        }
    }

    /// Copies of every click in playback order.
    pub fn clicks(&self) -> Vec<SavedClick> {
        self.store.read().iter().map(|(_, click)| *click).collect()
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────

    /// Stops playback, cancels recording and releases both hooks.
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.recorder.cancel();
        self.scheduler.stop();
        self.hooks.shutdown();
        info!("clicker session shut down");
    }
}

impl Drop for ClickerSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
