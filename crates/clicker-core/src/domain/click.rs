//! Recorded click entity.

use std::fmt;

/// Store-assigned identifier for a click.
///
/// Ids increase monotonically and are never reused within one [`ClickStore`].
///
/// [`ClickStore`]: super::store::ClickStore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClickId(pub(crate) u64);

impl fmt::Display for ClickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One recorded click target.
///
/// `x` and `y` are absolute screen coordinates.  They are signed because
/// monitors placed left of or above the primary display have negative
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedClick {
    pub x: i32,
    pub y: i32,
    /// Participates in playback.
    pub is_enabled: bool,
    /// UI selection state; scopes bulk toggles but never affects playback.
    pub is_selected: bool,
}

impl SavedClick {
    /// Creates an enabled, unselected click at `(x, y)`.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_enabled: true,
            is_selected: false,
        }
    }

    /// Returns the click's coordinates as an `(x, y)` pair.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_click_is_enabled_and_unselected() {
        let click = SavedClick::new(300, 220);
        assert!(click.is_enabled);
        assert!(!click.is_selected);
        assert_eq!(click.position(), (300, 220));
    }

    #[test]
    fn test_negative_coordinates_are_preserved() {
        let click = SavedClick::new(-1920, -40);
        assert_eq!(click.position(), (-1920, -40));
    }
}
