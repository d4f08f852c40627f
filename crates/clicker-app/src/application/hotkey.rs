//! HotkeyListener: toggles playback when the trigger key is pressed.
//!
//! The trigger code lives in the shared [`Settings`] so that it is saved and
//! loaded with click documents.  The listener runs on the keyboard hook
//! thread; start failures there have no caller to return to and are logged.

use std::sync::Arc;

use clicker_core::{HotkeyConfig, PlaybackState};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::playback::PlaybackScheduler;
use crate::application::{SharedSettings, SharedState};
use crate::infrastructure::input_hooks::{HookHandler, InputEvent, Propagate};

/// Error type for hotkey configuration.
#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("cannot change the hotkey while recording")]
    RecordingInProgress,
}

/// Watches key-down events for the configured trigger.
pub struct HotkeyListener {
    settings: SharedSettings,
    state: SharedState,
    scheduler: Arc<PlaybackScheduler>,
}

impl HotkeyListener {
    pub fn new(
        settings: SharedSettings,
        state: SharedState,
        scheduler: Arc<PlaybackScheduler>,
    ) -> Self {
        Self {
            settings,
            state,
            scheduler,
        }
    }

    /// Sets the trigger key.
    ///
    /// # Errors
    ///
    /// Returns [`HotkeyError::RecordingInProgress`] while recording.
    pub fn set_trigger(&self, code: u32) -> Result<(), HotkeyError> {
        self.replace_trigger(Some(code))
    }

    /// Removes the trigger key.
    ///
    /// # Errors
    ///
    /// Returns [`HotkeyError::RecordingInProgress`] while recording.
    pub fn clear_trigger(&self) -> Result<(), HotkeyError> {
        self.replace_trigger(None)
    }

    pub fn trigger(&self) -> HotkeyConfig {
        self.settings.read().hotkey()
    }

    /// Reacts to one key press.
    ///
    /// Returns `true` if `code` was the trigger and playback was toggled.
    pub fn on_key_down(&self, code: u32) -> bool {
        if !self.trigger().matches(code) {
            return false;
        }
        if *self.state.lock() == PlaybackState::Recording {
            debug!(code, "hotkey ignored while recording");
            return false;
        }

        let settings = self.settings.read().clone();
        match self.scheduler.toggle(&settings) {
            Ok(state) => {
                info!(%state, "hotkey toggled playback");
                true
            }
            Err(e) => {
                warn!("hotkey could not toggle playback: {e}");
                false
            }
        }
    }

    fn replace_trigger(&self, code: Option<u32>) -> Result<(), HotkeyError> {
        // Hold the state lock so a recording cannot start mid-change.
        let state = self.state.lock();
        if *state == PlaybackState::Recording {
            return Err(HotkeyError::RecordingInProgress);
        }
        self.settings.write().hotkey_code = code;
        info!(hotkey = %HotkeyConfig::from_code(code), "hotkey changed");
        Ok(())
    }
}

impl HookHandler for HotkeyListener {
    fn handle(&self, event: &InputEvent) -> Propagate {
        match *event {
            InputEvent::KeyDown { code } if self.on_key_down(code) => Propagate::Handled,
            _ => Propagate::Unhandled,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SharedStore;
    use crate::infrastructure::synthetic_input::mock::MockInjector;
    use clicker_core::{ClickStore, RepeatType, SavedClick, Settings};
    use parking_lot::{Mutex, RwLock};
    use std::time::Duration;
    use tokio::runtime::Handle;

    const F9: u32 = 0x78;

    struct Fixture {
        injector: Arc<MockInjector>,
        state: SharedState,
        settings: SharedSettings,
        listener: HotkeyListener,
    }

    fn fixture() -> Fixture {
        let injector = Arc::new(MockInjector::new());
        let mut clicks = ClickStore::new();
        clicks.add(SavedClick::new(10, 20));
        let store: SharedStore = Arc::new(RwLock::new(clicks));
        let state: SharedState = Arc::new(Mutex::new(PlaybackState::Idle));
        let settings: SharedSettings = Arc::new(RwLock::new(Settings {
            hotkey_code: Some(F9),
            repeat_type: RepeatType::Continuous,
            delay_ms: 100,
            ..Settings::default()
        }));
        let scheduler = Arc::new(PlaybackScheduler::new(
            Handle::current(),
            injector.clone(),
            store,
            state.clone(),
        ));
        let listener = HotkeyListener::new(settings.clone(), state.clone(), scheduler);
        Fixture {
            injector,
            state,
            settings,
            listener,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_toggles_play_pause_resume() {
        // Arrange
        let f = fixture();

        // Act / Assert
        assert!(f.listener.on_key_down(F9));
        assert_eq!(*f.state.lock(), PlaybackState::Playing);
        assert!(f.listener.on_key_down(F9));
        assert_eq!(*f.state.lock(), PlaybackState::Paused);
        assert!(f.listener.on_key_down(F9));
        assert_eq!(*f.state.lock(), PlaybackState::Playing);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(f.injector.calls(), vec![(10, 20)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_keys_are_ignored() {
        let f = fixture();

        assert!(!f.listener.on_key_down(0x41));

        assert_eq!(*f.state.lock(), PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_ignored_while_recording() {
        let f = fixture();
        *f.state.lock() = PlaybackState::Recording;

        let result = f.listener.handle(&InputEvent::KeyDown { code: F9 });

        assert_eq!(result, Propagate::Unhandled);
        assert_eq!(*f.state.lock(), PlaybackState::Recording);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unset_trigger_matches_nothing() {
        let f = fixture();
        f.listener.clear_trigger().unwrap();

        assert!(!f.listener.on_key_down(F9));
        assert_eq!(f.listener.trigger(), HotkeyConfig::Unset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_trigger_rejected_while_recording() {
        // Arrange
        let f = fixture();
        *f.state.lock() = PlaybackState::Recording;

        // Act
        let set = f.listener.set_trigger(0x41);
        let clear = f.listener.clear_trigger();

        // Assert
        assert!(matches!(set, Err(HotkeyError::RecordingInProgress)));
        assert!(matches!(clear, Err(HotkeyError::RecordingInProgress)));
        assert_eq!(f.settings.read().hotkey_code, Some(F9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_in_hook_is_swallowed() {
        let f = fixture();
        f.settings.write().repeat_type = RepeatType::Count;
        f.settings.write().repeat_count = 0;

        let result = f.listener.handle(&InputEvent::KeyDown { code: F9 });

        assert_eq!(result, Propagate::Unhandled);
        assert_eq!(*f.state.lock(), PlaybackState::Idle);
    }
}
