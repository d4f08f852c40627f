//! Domain entities for Multi-Clicker.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What lives here? (for beginners)
//!
//! The domain is the innermost layer of the application.  It knows what a
//! recorded click is, how the list of clicks behaves when the user toggles
//! flags, and how a playback run is configured.  It does **not** know how
//! clicks are captured from the OS or injected back into it; that is the
//! job of the infrastructure layer in `clicker-app`.

/// A single recorded click target and its store-assigned id.
pub mod click;

/// Repeat and delay policies that configure one playback run.
pub mod policy;

/// The persisted settings record.
pub mod settings;

/// Session-wide state values: playback state and hotkey configuration.
pub mod state;

/// The ordered click store with flag aggregates and bulk toggles.
///
/// See [`store::ClickStore`] for the main type.
pub mod store;
