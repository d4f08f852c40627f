//! Session-wide state values.

use std::fmt;

/// The single playback state of a running session.
///
/// ```text
///            arm            capture / cancel
///   Idle ─────────► Recording ─────────────► Idle
///    │
///    │ start          pause            resume
///    └──────► Playing ───────► Paused ───────► Playing
///               │                 │
///               └──── stop ───────┴──────────► Idle
/// ```
///
/// `Recording` and `Playing`/`Paused` are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Recording,
    Playing,
    Paused,
}

impl PlaybackState {
    /// `true` while a playback run exists (playing or paused).
    pub fn is_playback_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlaybackState::Idle => "IDLE",
            PlaybackState::Recording => "RECORDING",
            PlaybackState::Playing => "PLAYING",
            PlaybackState::Paused => "PAUSED",
        };
        f.write_str(label)
    }
}

/// The configured play/pause trigger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotkeyConfig {
    /// No trigger; key presses never toggle playback.
    #[default]
    Unset,
    /// Platform virtual-key code of the trigger.
    Code(u32),
}

impl HotkeyConfig {
    pub fn from_code(code: Option<u32>) -> Self {
        code.map_or(HotkeyConfig::Unset, HotkeyConfig::Code)
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            HotkeyConfig::Unset => None,
            HotkeyConfig::Code(code) => Some(*code),
        }
    }

    /// `true` if `code` is the configured trigger.
    pub fn matches(&self, code: u32) -> bool {
        *self == HotkeyConfig::Code(code)
    }
}

impl fmt::Display for HotkeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyConfig::Unset => f.write_str("NONE"),
            HotkeyConfig::Code(code) => write!(f, "0x{code:02X}"),
        }
    }
}
