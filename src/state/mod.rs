//! State management module
//!
//! This module contains the host-side application state wrapping the timer
//! engine, and persistence of the settings it runs with.

pub mod app_state;
pub mod settings_store;

// Re-export main types
pub use app_state::{AppState, ApplySettingsError};
pub use settings_store::{load_settings, save_settings};
