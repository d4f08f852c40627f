//! The persisted settings record.
//!
//! `Settings` is the flat, serialisable form of the playback configuration.
//! It is stored alongside the click list in a click document and converted
//! into the typed [`RepeatPolicy`] / [`DelayPolicy`] pair when a run starts.
//!
//! Fields annotated with `#[serde(default = "...")]` fall back to their
//! default value when absent, so documents written by older versions still load.

use serde::{Deserialize, Serialize};

use super::policy::{DelayPolicy, PolicyError, RepeatPolicy};
use super::state::HotkeyConfig;

/// Persisted form of [`RepeatPolicy`]'s variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatType {
    #[default]
    Count,
    Continuous,
}

/// Playback settings saved with a click document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Virtual-key code of the play/pause trigger; absent means unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey_code: Option<u32>,
    #[serde(default)]
    pub repeat_type: RepeatType,
    /// Number of passes when `repeat_type` is `Count`.
    #[serde(default = "default_repeat_count")]
    pub repeat_count: u32,
    /// Base delay between clicks in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub humanize_delay: bool,
    #[serde(default)]
    pub humanize_click_spot: bool,
}

fn default_repeat_count() -> u32 {
    1
}
fn default_delay_ms() -> u64 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey_code: None,
            repeat_type: RepeatType::default(),
            repeat_count: default_repeat_count(),
            delay_ms: default_delay_ms(),
            humanize_delay: false,
            humanize_click_spot: false,
        }
    }
}

impl Settings {
    /// Builds the repeat policy these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::ZeroRepeatCount`] for `Count` with a count of zero.
    pub fn repeat_policy(&self) -> Result<RepeatPolicy, PolicyError> {
        match self.repeat_type {
            RepeatType::Count => RepeatPolicy::count(self.repeat_count),
            RepeatType::Continuous => Ok(RepeatPolicy::Continuous),
        }
    }

    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy {
            base_delay_ms: self.delay_ms,
            humanize_delay: self.humanize_delay,
            humanize_click_spot: self.humanize_click_spot,
        }
    }

    pub fn hotkey(&self) -> HotkeyConfig {
        HotkeyConfig::from_code(self.hotkey_code)
    }

    /// Checks the settings without building anything.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::repeat_policy`].
    pub fn validate(&self) -> Result<(), PolicyError> {
        self.repeat_policy().map(|_| ())
    }
}
