//! Windows click injection via `SetCursorPos` and `SendInput`.
//!
//! Coordinates are raw virtual-screen pixels, so no normalisation to the
//! `[0, 65535]` absolute range is needed: the cursor is placed first and the
//! button events carry no position.

#![cfg(target_os = "windows")]

use tracing::debug;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEINPUT, MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::SetCursorPos;

use super::SyntheticInput;

/// Windows implementation of [`SyntheticInput`].
pub struct WindowsInjector;

impl WindowsInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticInput for WindowsInjector {
    fn click(&self, x: i32, y: i32) {
        // SAFETY: SetCursorPos has no pointer arguments.
        if let Err(e) = unsafe { SetCursorPos(x, y) } {
            debug!(x, y, "SetCursorPos failed: {e}");
        }

        let inputs = [button_input(MOUSEEVENTF_LEFTDOWN), button_input(MOUSEEVENTF_LEFTUP)];
        // SAFETY: inputs is a valid slice of INPUT structures on the stack.
        let inserted = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if inserted as usize != inputs.len() {
            debug!(x, y, inserted, "SendInput inserted fewer events than requested");
        }
    }
}

fn button_input(flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_input_is_mouse_input_without_motion() {
        let input = button_input(MOUSEEVENTF_LEFTDOWN);

        assert_eq!(input.r#type, INPUT_MOUSE);
        // SAFETY: the union was written through the `mi` member.
        let mi = unsafe { input.Anonymous.mi };
        assert_eq!(mi.dx, 0);
        assert_eq!(mi.dy, 0);
        assert_eq!(mi.dwFlags, MOUSEEVENTF_LEFTDOWN);
    }
}
