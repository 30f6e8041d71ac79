//! Timer core
//!
//! Pure, tick-driven state machine plus the settings it reads. Nothing in
//! here touches the clock, audio or storage.

pub mod engine;
pub mod settings;
pub mod types;

pub use engine::TimerEngine;
pub use settings::{SettingsError, TimerSettings, NO_SOUND};
pub use types::{PhaseCompleted, TimerMode, TimerSnapshot, TimerStatus};

/// Format seconds as `MM:SS`; minutes are not wrapped at an hour
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
