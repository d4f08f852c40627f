//! Pull-model status feed.
//!
//! A [`StatusSnapshot`] is a point-in-time copy of everything a status line
//! or UI needs.  Callers poll it after each command; it holds no locks.

use std::fmt;

use clicker_core::{HotkeyConfig, PlaybackState};

/// Point-in-time view of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub count: usize,
    pub count_enabled: usize,
    pub count_selected: usize,
    pub state: PlaybackState,
    /// Pointer position while recording, if one has been observed.
    pub live_position: Option<(i32, i32)>,
    pub hotkey: HotkeyConfig,
}

impl StatusSnapshot {
    /// Label for the bulk enable toggle: it acts on the selection only when
    /// some, but not all, clicks are selected.
    pub fn enabled_toggle_label(&self) -> &'static str {
        if self.count_selected == 0 || self.count_selected == self.count {
            "Toggle Enabled (All)"
        } else {
            "Toggle Enabled (Sel)"
        }
    }

    /// Text for the record button.
    pub fn recording_label(&self) -> String {
        match (self.state, self.live_position) {
            (PlaybackState::Recording, Some((x, y))) => {
                format!("RECORDING: Awaiting click.. {x}:{y}")
            }
            (PlaybackState::Recording, None) => "RECORDING: Awaiting click..".to_string(),
            _ => "Record new click...".to_string(),
        }
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count_selected > 0 {
            write!(f, "Sel: {}, ", self.count_selected)?;
        }
        write!(f, "{} enabled | ", self.count_enabled)?;
        if self.state == PlaybackState::Recording {
            f.write_str(&self.recording_label())?;
        } else {
            write!(f, "{}", self.state)?;
        }
        write!(f, " | hotkey {}", self.hotkey)
    }
}
