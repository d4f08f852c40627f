//! Application layer use cases for the clicker.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules in `clicker_core`) and the infrastructure (OS hooks,
//! synthetic input, files).  Use cases here orchestrate domain objects to
//! fulfil a user goal and depend on infrastructure only through traits
//! (`InputHooks`, `SyntheticInput`), so tests can swap in mocks.
//!
//! # Sub-modules
//!
//! - **`record_click`** – Arms on demand and turns the next real primary
//!   click into a stored click.
//!
//! - **`playback`** – The timed replay loop with pause, resume and stop.
//!   This is the most timing-sensitive code in the crate.
//!
//! - **`hotkey`** – Toggles playback when the trigger key is pressed.
//!
//! - **`session`** – Owns everything above plus the shared state, and maps
//!   each command to one operation.
//!
//! - **`status`** / **`commands`** – The status snapshot and the text
//!   command parser used by the headless binary.
//!
//! # Shared state
//!
//! The click store, the settings and the playback state are each shared
//! behind one `parking_lot` lock.  `parking_lot` locks do not poison, which
//! matters because they are also taken from OS hook callbacks.

use std::sync::Arc;

use clicker_core::{ClickStore, PlaybackState, Settings};
use parking_lot::{Mutex, RwLock};

pub mod commands;
pub mod hotkey;
pub mod playback;
pub mod record_click;
pub mod session;
pub mod status;

/// The click list shared by the recorder, the scheduler and the session.
pub type SharedStore = Arc<RwLock<ClickStore>>;

/// The current settings, read at each playback start.
pub type SharedSettings = Arc<RwLock<Settings>>;

/// The single playback state of the session.
pub type SharedState = Arc<Mutex<PlaybackState>>;
