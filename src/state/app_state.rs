//! Main application state management

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::settings_store::save_settings;
use crate::{
    sound::SoundDispatcher,
    timer::{PhaseCompleted, SettingsError, TimerEngine, TimerMode, TimerSettings, TimerSnapshot, TimerStatus},
};

/// Why a settings update was refused
#[derive(Debug, Error)]
pub enum ApplySettingsError {
    #[error("Invalid settings: {0}")]
    Invalid(#[from] SettingsError),

    #[error("{0}")]
    State(String),
}

/// Host state: the timer engine, the sound dispatcher and server metadata
#[derive(Debug)]
pub struct AppState {
    /// The one engine instance, only touched under this lock
    engine: Mutex<TimerEngine>,
    /// Completion cue player
    pub sound: SoundDispatcher,
    /// Where settings are persisted, if anywhere
    pub settings_path: Option<PathBuf>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel that only fires when the status changes
    pub status_tx: watch::Sender<TimerStatus>,
}

impl AppState {
    /// Create a new AppState around an engine and a sound dispatcher
    pub fn new(
        engine: TimerEngine,
        sound: SoundDispatcher,
        port: u16,
        host: String,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let (status_tx, _) = watch::channel(engine.status());

        Self {
            engine: Mutex::new(engine),
            sound,
            settings_path,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            status_tx,
        }
    }

    /// Apply a user action to the engine, record it and notify watchers
    pub fn update_engine<F, R>(&self, action: &str, updater: F) -> Result<(TimerSnapshot, R), String>
    where
        F: FnOnce(&mut TimerEngine) -> R,
    {
        let result = self.with_engine(updater)?;
        self.record_action(action);
        Ok(result)
    }

    /// Start or resume the countdown
    pub fn start(&self) -> Result<TimerSnapshot, String> {
        let (snapshot, _) = self.update_engine("start", |engine| engine.start())?;
        info!("Timer started: {} {}", snapshot.mode, snapshot.display);
        Ok(snapshot)
    }

    /// Pause the countdown
    pub fn pause(&self) -> Result<TimerSnapshot, String> {
        let (snapshot, _) = self.update_engine("pause", |engine| engine.pause())?;
        info!("Timer paused: {} {}", snapshot.mode, snapshot.display);
        Ok(snapshot)
    }

    /// Reset the clock of the current mode
    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        let (snapshot, _) = self.update_engine("reset", |engine| engine.reset())?;
        info!("Timer reset: {} {}", snapshot.mode, snapshot.display);
        Ok(snapshot)
    }

    /// Switch to another mode with a fresh clock
    pub fn switch_mode(&self, mode: TimerMode) -> Result<TimerSnapshot, String> {
        let (snapshot, _) = self.update_engine(&format!("mode-{}", mode), |engine| engine.switch_mode(mode))?;
        info!("Timer switched to {} ({})", snapshot.mode, snapshot.display);
        Ok(snapshot)
    }

    /// Advance the engine by one second and play the cue on completion
    pub fn tick(&self) -> Result<Option<PhaseCompleted>, String> {
        let (snapshot, completed) = self.with_engine(|engine| {
            engine
                .tick()
                .map(|completed| (completed, engine.settings().clone()))
        })?;

        let Some((completed, settings)) = completed else {
            debug!("Tick: {} {}", snapshot.mode, snapshot.display);
            return Ok(None);
        };

        info!(
            "{} finished, {} sessions completed, next up: {} ({})",
            completed.finished, completed.sessions_completed, completed.next, snapshot.display
        );
        self.sound.dispatch(&settings);

        Ok(Some(completed))
    }

    /// Validate and hand new settings to the engine, then persist them.
    ///
    /// An idle engine is reset so the new durations show right away; a
    /// running or paused clock keeps its time until the next reset.
    pub fn apply_settings(&self, settings: TimerSettings) -> Result<TimerSnapshot, ApplySettingsError> {
        settings.validate()?;

        let (snapshot, applied) = self
            .update_engine("settings", |engine| {
                engine.update_settings(settings);
                if engine.status() == TimerStatus::Idle {
                    engine.reset();
                }
                engine.settings().clone()
            })
            .map_err(ApplySettingsError::State)?;

        if let Some(path) = &self.settings_path {
            if let Err(e) = save_settings(path, &applied) {
                warn!("Failed to persist settings: {:#}", e);
            }
        }

        info!("Settings updated: {} {}", snapshot.mode, snapshot.display);
        Ok(snapshot)
    }

    /// Get current timer state
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine
            .lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Get the settings the engine is using
    pub fn settings(&self) -> Result<TimerSettings, String> {
        self.engine
            .lock()
            .map(|engine| engine.settings().clone())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Play the selected sound once. Returns false when it is muted or "none".
    pub fn preview_sound(&self) -> Result<bool, String> {
        let settings = self.settings()?;
        self.record_action("sound-preview");
        Ok(self.sound.preview(&settings))
    }

    /// Stop any playing cue
    pub fn stop_sound(&self) {
        self.record_action("sound-stop");
        self.sound.cancel();
    }

    /// Watch status changes only
    pub fn subscribe_status(&self) -> watch::Receiver<TimerStatus> {
        self.status_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Run `updater` under the engine lock, then publish any status change
    fn with_engine<F, R>(&self, updater: F) -> Result<(TimerSnapshot, R), String>
    where
        F: FnOnce(&mut TimerEngine) -> R,
    {
        let mut engine = self.engine.lock().map_err(|e| {
            error!("Failed to lock timer engine: {}", e);
            format!("Failed to lock timer engine: {}", e)
        })?;

        let result = updater(&mut engine);
        let snapshot = engine.snapshot();
        drop(engine); // Release the lock early

        self.status_tx.send_if_modified(|status| {
            if *status == snapshot.status {
                return false;
            }
            *status = snapshot.status;
            true
        });

        Ok((snapshot, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{AudioPlayer, PlaybackError};
    use futures::future::BoxFuture;

    #[derive(Default)]
    struct CountingPlayer {
        clips: Mutex<Vec<String>>,
    }

    impl AudioPlayer for CountingPlayer {
        fn play(&self, clip: &str, _gain: f32) -> BoxFuture<'static, Result<(), PlaybackError>> {
            self.clips.lock().unwrap().push(clip.to_string());
            Box::pin(async { Ok(()) })
        }
    }

    fn state_with(settings: TimerSettings, player: Arc<CountingPlayer>) -> AppState {
        AppState::new(
            TimerEngine::new(settings),
            SoundDispatcher::new(player),
            0,
            "127.0.0.1".to_string(),
            None,
        )
    }

    fn one_minute() -> TimerSettings {
        TimerSettings {
            work_duration: 1,
            break_duration: 1,
            ..TimerSettings::default()
        }
    }

    #[tokio::test]
    async fn actions_are_recorded() {
        let state = state_with(one_minute(), Arc::default());
        state.start().unwrap();
        state.pause().unwrap();

        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("pause"));
        assert!(at.is_some());
    }

    #[tokio::test]
    async fn status_channel_only_fires_on_change() {
        let state = state_with(one_minute(), Arc::default());
        let mut status_rx = state.subscribe_status();
        status_rx.borrow_and_update();

        state.start().unwrap();
        assert!(status_rx.has_changed().unwrap());
        assert_eq!(*status_rx.borrow_and_update(), TimerStatus::Running);

        state.tick().unwrap();
        state.start().unwrap();
        assert!(!status_rx.has_changed().unwrap());
        assert_eq!(state.snapshot().unwrap().time_left, 59);
    }

    #[tokio::test]
    async fn completion_plays_the_cue() {
        let player = Arc::new(CountingPlayer::default());
        let state = state_with(one_minute(), player.clone());
        state.start().unwrap();

        let completions: Vec<PhaseCompleted> =
            (0..60).filter_map(|_| state.tick().unwrap()).collect();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        assert_eq!(completions.len(), 1);
        assert_eq!(*player.clips.lock().unwrap(), vec!["Sound_1.mp3".to_string()]);
        assert_eq!(state.snapshot().unwrap().mode, TimerMode::ShortBreak);
    }

    #[tokio::test]
    async fn invalid_settings_are_rejected() {
        let state = state_with(one_minute(), Arc::default());
        let result = state.apply_settings(TimerSettings {
            sessions_before_long_break: 0,
            ..TimerSettings::default()
        });
        assert!(matches!(result, Err(ApplySettingsError::Invalid(SettingsError::SessionsBeforeLongBreak))));
        assert_eq!(state.settings().unwrap(), one_minute());
    }

    #[tokio::test]
    async fn settings_reset_idle_engine_but_not_running_one() {
        let state = state_with(one_minute(), Arc::default());
        let snapshot = state
            .apply_settings(TimerSettings {
                work_duration: 2,
                ..one_minute()
            })
            .unwrap();
        assert_eq!(snapshot.time_left, 120);

        state.start().unwrap();
        state.tick().unwrap();
        let snapshot = state
            .apply_settings(TimerSettings {
                work_duration: 3,
                ..one_minute()
            })
            .unwrap();
        assert_eq!(snapshot.time_left, 119);
        assert_eq!(snapshot.status, TimerStatus::Running);
    }

    #[tokio::test]
    async fn settings_are_persisted_when_a_path_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let state = AppState::new(
            TimerEngine::default(),
            SoundDispatcher::new(Arc::new(CountingPlayer::default())),
            0,
            "127.0.0.1".to_string(),
            Some(path.clone()),
        );

        state
            .apply_settings(TimerSettings {
                volume: 10,
                ..TimerSettings::default()
            })
            .unwrap();

        let saved = crate::state::settings_store::load_settings(&path);
        assert_eq!(saved.volume, 10);
    }

    #[test]
    fn settings_are_not_persisted_when_the_engine_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let state = AppState::new(
            TimerEngine::default(),
            SoundDispatcher::new(Arc::new(CountingPlayer::default())),
            0,
            "127.0.0.1".to_string(),
            Some(path.clone()),
        );

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _engine = state.engine.lock().unwrap();
            panic!("engine lock poisoned");
        }));
        assert!(poisoned.is_err());

        let result = state.apply_settings(TimerSettings {
            volume: 10,
            ..TimerSettings::default()
        });
        assert!(matches!(result, Err(ApplySettingsError::State(_))));
        assert!(!path.exists());
    }
}
