//! Completion sound module
//!
//! This module contains the audio backend seam and the dispatcher that plays
//! the cue when a phase completes.

pub mod dispatcher;
pub mod player;

// Re-export main types
pub use dispatcher::{SoundDispatcher, REPEAT_GAP};
pub use player::{check_player_available, AudioPlayer, CommandPlayer, PlaybackError, DEFAULT_PLAYER};
