//! Focus Timer - A Pomodoro timer daemon
//!
//! This library provides a tick-driven timer engine (focus, short break,
//! long break and count-up modes), the completion sound dispatcher and the
//! host pieces that drive them: application state, the 1 Hz ticker task and
//! an HTTP control surface.

pub mod config;
pub mod timer;
pub mod sound;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use timer::{TimerEngine, TimerMode, TimerSettings, TimerSnapshot, TimerStatus};
pub use sound::SoundDispatcher;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
