//! Storage infrastructure: file persistence.
//!
//! - `document` – click documents (settings plus click coordinates) that the
//!   user loads and saves explicitly.
//! - `config` – the application config file read at startup from the
//!   platform-appropriate directory, with defaults on first run.

pub mod config;
pub mod document;
