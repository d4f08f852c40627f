//! Infrastructure layer for the clicker.
//!
//! Contains OS-facing adapters: global input hooks, synthetic click
//! injection and file-system storage.
//!
//! **Dependency rule**: this layer may depend on `clicker_core`, but MUST
//! NOT be imported by the domain layer.

pub mod input_hooks;
pub mod storage;
pub mod synthetic_input;
