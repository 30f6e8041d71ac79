//! Countdown / count-up state machine
//!
//! The engine owns no scheduler. The host calls `tick()` once per second while
//! the status is `Running` and reads the state back afterwards.
//!
//! ```text
//! Focus --(completes)--> ShortBreak | LongBreak --(completes)--> Focus
//! Infinite counts up and never completes
//! ```
//!
//! On the tick that finishes a phase the next phase is loaded immediately:
//! callers read the new mode, idle, with its full duration.

use super::{
    settings::TimerSettings,
    types::{PhaseCompleted, TimerMode, TimerSnapshot, TimerStatus},
};

/// Timer engine driven by host ticks
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: TimerSettings,
    mode: TimerMode,
    status: TimerStatus,
    time_left: u64,
    total_time: u64,
    sessions_completed: u64,
}

impl TimerEngine {
    /// Create an idle engine in focus mode from a settings snapshot
    pub fn new(settings: TimerSettings) -> Self {
        let settings = settings.sanitized();
        let total_time = Self::duration_for(TimerMode::Focus, &settings);
        Self {
            settings,
            mode: TimerMode::Focus,
            status: TimerStatus::Idle,
            time_left: total_time,
            total_time,
            sessions_completed: 0,
        }
    }

    /// Duration budget of a mode in seconds, 0 for infinite
    pub fn duration_for(mode: TimerMode, settings: &TimerSettings) -> u64 {
        let minutes = match mode {
            TimerMode::Focus => settings.work_duration,
            TimerMode::ShortBreak => settings.break_duration,
            TimerMode::LongBreak => settings.long_break_duration,
            TimerMode::Infinite => return 0,
        };
        u64::from(minutes) * 60
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Elapsed fraction of the current phase, 0.0 for infinite
    pub fn progress(&self) -> f64 {
        if self.total_time == 0 {
            return 0.0;
        }
        1.0 - (self.time_left as f64 / self.total_time as f64)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(
            self.mode,
            self.status,
            self.time_left,
            self.total_time,
            self.sessions_completed,
            self.progress(),
        )
    }

    /// Start or resume counting from the current `time_left`
    pub fn start(&mut self) {
        self.status = TimerStatus::Running;
    }

    /// Halt the clock, keeping `time_left`. No-op unless running.
    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
        }
    }

    /// Reload the clock for the current mode and go idle
    pub fn reset(&mut self) {
        self.switch_mode(self.mode);
    }

    /// Load a mode with a fresh clock and go idle. Sessions are kept.
    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.load_mode(mode);
        self.status = TimerStatus::Idle;
    }

    /// Replace the settings snapshot.
    ///
    /// The running clock is left alone; new durations apply from the next
    /// `reset`, `switch_mode` or phase transition.
    pub fn update_settings(&mut self, settings: TimerSettings) {
        self.settings = settings.sanitized();
    }

    /// Advance the clock by one second.
    ///
    /// Returns the completion when this tick finished a focus or break phase.
    /// Does nothing unless the engine is running.
    pub fn tick(&mut self) -> Option<PhaseCompleted> {
        if self.status != TimerStatus::Running {
            return None;
        }

        if self.mode == TimerMode::Infinite {
            self.time_left = self.time_left.saturating_add(1);
            return None;
        }

        if self.time_left > 1 {
            self.time_left -= 1;
            return None;
        }

        let finished = self.mode;
        self.status = TimerStatus::Idle;

        let next = if finished == TimerMode::Focus {
            self.sessions_completed += 1;
            // sanitized() guarantees a non-zero modulus
            if self.sessions_completed % u64::from(self.settings.sessions_before_long_break) == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            }
        } else {
            TimerMode::Focus
        };
        self.load_mode(next);

        Some(PhaseCompleted {
            finished,
            next,
            sessions_completed: self.sessions_completed,
        })
    }

    fn load_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.total_time = Self::duration_for(mode, &self.settings);
        self.time_left = if mode == TimerMode::Infinite { 0 } else { self.total_time };
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
