//! Configuration module.
//!
//! Manages operator settings stored as JSON.

mod settings;

pub use settings::{DebugAdapterSettings, Settings};
