//! Completion cue dispatch
//!
//! Plays the configured clip `repeat_count` times in a background task. The
//! caller never waits on playback and never sees playback errors.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{runtime::Handle, task::JoinHandle, time::sleep};
use tracing::{debug, error, warn};

use super::player::AudioPlayer;
use crate::timer::TimerSettings;

/// Pause between two consecutive plays of the cue
pub const REPEAT_GAP: Duration = Duration::from_millis(500);

/// Fire-and-forget player for the phase completion sound
pub struct SoundDispatcher {
    player: Arc<dyn AudioPlayer>,
    gap: Duration,
    /// Sequence currently playing, aborted before a new one starts
    current: Mutex<Option<JoinHandle<()>>>,
}

impl SoundDispatcher {
    /// Create a dispatcher using the default gap between repeats
    pub fn new(player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            player,
            gap: REPEAT_GAP,
            current: Mutex::new(None),
        }
    }

    /// Use a different pause between repeats
    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    /// Play the completion cue. Returns false when nothing was started.
    pub fn dispatch(&self, settings: &TimerSettings) -> bool {
        if settings.is_silent() {
            debug!("Completion sound skipped (muted or no sound selected)");
            return false;
        }
        self.spawn_sequence(settings.sound.trim(), settings.gain(), settings.repeat_count.max(1))
    }

    /// Play the selected clip once, for trying out a sound
    pub fn preview(&self, settings: &TimerSettings) -> bool {
        if settings.is_silent() {
            debug!("Sound preview skipped (muted or no sound selected)");
            return false;
        }
        self.spawn_sequence(settings.sound.trim(), settings.gain(), 1)
    }

    /// Stop the sequence in progress, if any
    pub fn cancel(&self) {
        match self.current.lock() {
            Ok(mut current) => {
                if let Some(handle) = current.take() {
                    if !handle.is_finished() {
                        debug!("Cancelling sound sequence in progress");
                    }
                    handle.abort();
                }
            }
            Err(e) => error!("Failed to lock sound sequence: {}", e),
        }
    }

    /// Check if a sequence is still playing
    pub fn is_playing(&self) -> bool {
        self.current
            .lock()
            .map(|current| current.as_ref().map_or(false, |handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    fn spawn_sequence(&self, clip: &str, gain: f32, plays: u32) -> bool {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("No async runtime to play {}: {}", clip, e);
                return false;
            }
        };

        let mut current = match self.current.lock() {
            Ok(current) => current,
            Err(e) => {
                error!("Failed to lock sound sequence: {}", e);
                return false;
            }
        };

        if let Some(previous) = current.take() {
            previous.abort();
        }

        debug!("Playing {} x{} at gain {:.2}", clip, plays, gain);
        *current = Some(runtime.spawn(play_sequence(
            Arc::clone(&self.player),
            clip.to_string(),
            gain,
            plays,
            self.gap,
        )));
        true
    }
}

impl Drop for SoundDispatcher {
    fn drop(&mut self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(handle) = current.take() {
                handle.abort();
            }
        }
    }
}

impl std::fmt::Debug for SoundDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundDispatcher")
            .field("gap", &self.gap)
            .field("playing", &self.is_playing())
            .finish()
    }
}

async fn play_sequence(player: Arc<dyn AudioPlayer>, clip: String, gain: f32, plays: u32, gap: Duration) {
    for round in 1..=plays {
        if round > 1 {
            sleep(gap).await;
        }
        if let Err(e) = player.play(&clip, gain).await {
            // Retrying a missing or blocked clip would fail the same way
            warn!("Sound playback failed ({}/{}): {}", round, plays, e);
            return;
        }
    }
    debug!("Sound sequence for {} finished", clip);
}
