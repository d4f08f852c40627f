//! Click document persistence.
//!
//! A click document is the settings record plus the ordered click
//! coordinates, stored as TOML:
//!
//! ```toml
//! [settings]
//! hotkey_code = 120
//! repeat_type = "Count"
//! repeat_count = 3
//! delay_ms = 250
//! humanize_delay = true
//! humanize_click_spot = false
//!
//! [[clicks]]
//! x = 120
//! y = 45
//!
//! [[clicks]]
//! x = 300
//! y = 220
//! ```
//!
//! Only coordinates are stored.  Enabled/selected flags are session state and
//! every loaded click starts enabled and unselected.

use std::path::{Path, PathBuf};

use clicker_core::{PolicyError, SavedClick, Settings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a document could not be read or written.
#[derive(Debug, Error)]
pub enum DocumentFault {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] PolicyError),
}

/// Error type for click document operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read click document {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: DocumentFault,
    },
    #[error("failed to write click document {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: DocumentFault,
    },
}

/// One persisted click position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRecord {
    pub x: i32,
    pub y: i32,
}

/// The on-disk document: settings plus clicks in playback order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClickDocument {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub clicks: Vec<ClickRecord>,
}

impl ClickDocument {
    /// Builds a document from settings and click positions.
    pub fn new(settings: Settings, positions: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            settings,
            clicks: positions
                .into_iter()
                .map(|(x, y)| ClickRecord { x, y })
                .collect(),
        }
    }

    /// Fresh store entries for the document's clicks: enabled, unselected.
    pub fn saved_clicks(&self) -> impl Iterator<Item = SavedClick> + '_ {
        self.clicks.iter().map(|c| SavedClick::new(c.x, c.y))
    }
}

/// Reads and validates a document.
///
/// Nothing is returned unless the whole file parsed and its settings are
/// valid, so callers can apply the result atomically.
///
/// # Errors
///
/// Returns [`StorageError::ReadFailed`] for unreadable files, malformed TOML
/// or settings that fail validation.
pub fn load_document(path: &Path) -> Result<ClickDocument, StorageError> {
    read_document(path).map_err(|source| StorageError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `document` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns [`StorageError::WriteFailed`] for file-system or serialization
/// failures.
pub fn save_document(path: &Path, document: &ClickDocument) -> Result<(), StorageError> {
    write_document(path, document).map_err(|source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn read_document(path: &Path) -> Result<ClickDocument, DocumentFault> {
    let content = std::fs::read_to_string(path)?;
    let document: ClickDocument = toml::from_str(&content)?;
    document.settings.validate()?;
    Ok(document)
}

fn write_document(path: &Path, document: &ClickDocument) -> Result<(), DocumentFault> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(document)?;
    std::fs::write(path, content)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clicker_core::RepeatType;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clicker_doc_{}_{name}", std::process::id()))
    }

    fn sample_document() -> ClickDocument {
        ClickDocument::new(
            Settings {
                hotkey_code: Some(0x78),
                repeat_type: RepeatType::Count,
                repeat_count: 3,
                delay_ms: 250,
                humanize_delay: true,
                humanize_click_spot: false,
            },
            [(120, 45), (-300, 220)],
        )
    }

    #[test]
    fn test_save_then_load_reproduces_document() {
        // Arrange
        let dir = temp_dir("round_trip");
        let path = dir.join("clicks.toml");
        let document = sample_document();

        // Act
        save_document(&path, &document).expect("save");
        let loaded = load_document(&path).expect("load");

        // Assert
        assert_eq!(loaded, document);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_creates_missing_parent_directories() {
        let dir = temp_dir("nested");
        let path = dir.join("a").join("b").join("clicks.toml");

        save_document(&path, &ClickDocument::default()).expect("save");

        assert!(path.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_is_read_failure() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/clicks.toml");

        let result = load_document(&path);

        assert!(matches!(
            result,
            Err(StorageError::ReadFailed { source: DocumentFault::Io(_), .. })
        ));
    }

    #[test]
    fn test_load_malformed_toml_is_read_failure() {
        // Arrange
        let dir = temp_dir("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clicks.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        // Act
        let result = load_document(&path);

        // Assert
        assert!(matches!(
            result,
            Err(StorageError::ReadFailed { source: DocumentFault::Parse(_), .. })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_zero_repeat_count_is_read_failure() {
        let dir = temp_dir("zero_count");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clicks.toml");
        std::fs::write(&path, "[settings]\nrepeat_type = \"Count\"\nrepeat_count = 0\n").unwrap();

        let result = load_document(&path);

        assert!(matches!(
            result,
            Err(StorageError::ReadFailed {
                source: DocumentFault::InvalidSettings(PolicyError::ZeroRepeatCount),
                ..
            })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let document: ClickDocument = toml::from_str("").expect("empty document parses");

        assert_eq!(document.settings, Settings::default());
        assert!(document.clicks.is_empty());
    }

    #[test]
    fn test_unset_hotkey_is_omitted_from_toml() {
        let document = ClickDocument::new(Settings::default(), [(1, 2)]);

        let text = toml::to_string_pretty(&document).expect("serialize");

        assert!(!text.contains("hotkey_code"));
        assert!(text.contains("[[clicks]]"));
    }

    #[test]
    fn test_saved_clicks_are_enabled_and_unselected() {
        let document = sample_document();

        let clicks: Vec<SavedClick> = document.saved_clicks().collect();

        assert_eq!(clicks.len(), 2);
        assert!(clicks.iter().all(|c| c.is_enabled && !c.is_selected));
        assert_eq!(clicks[1].position(), (-300, 220));
    }
}
