//! # clicker-core
//!
//! Shared domain library for Multi-Clicker: the ordered click store, the
//! repeat and delay policies that drive playback, the session state values,
//! and the humanization math that perturbs click timing and position.
//!
//! This crate has zero dependencies on OS APIs, UI frameworks, or async
//! runtimes.  Everything here can be unit-tested on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! Multi-Clicker records points on the screen by watching real mouse clicks,
//! keeps them in an ordered list, and later replays them as synthetic clicks
//! on a timer.  The application crate (`clicker-app`) owns the OS hooks and
//! the playback task; this crate defines the data they operate on:
//!
//! - **`domain`** – The click list (`ClickStore`) with its enable/select flags
//!   and bulk-toggle rules, the `RepeatPolicy`/`DelayPolicy` pair that
//!   configures a playback run, the `PlaybackState` machine values, and the
//!   persisted `Settings` record.
//!
//! - **`humanize`** – Bounded random jitter for inter-click delays and click
//!   positions, so replayed clicks are not perfectly uniform.

pub mod domain;
pub mod humanize;

// Re-export the most-used types at the crate root so callers can write
// `clicker_core::ClickStore` instead of `clicker_core::domain::store::ClickStore`.
pub use domain::click::{ClickId, SavedClick};
pub use domain::policy::{DelayPolicy, PolicyError, RepeatPolicy};
pub use domain::settings::{RepeatType, Settings};
pub use domain::state::{HotkeyConfig, PlaybackState};
pub use domain::store::{Aggregate, ClickStore, StoreError};
pub use humanize::Humanizer;
