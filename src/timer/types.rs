//! Timer mode, status and snapshot structures

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::format_clock;

/// Timer phase, determines which duration the engine counts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
    /// Counts up without a target
    Infinite,
}

impl TimerMode {
    /// Path-friendly name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "shortbreak",
            TimerMode::LongBreak => "longbreak",
            TimerMode::Infinite => "infinite",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "focus" => Ok(TimerMode::Focus),
            "shortbreak" | "short-break" | "short_break" => Ok(TimerMode::ShortBreak),
            "longbreak" | "long-break" | "long_break" => Ok(TimerMode::LongBreak),
            "infinite" => Ok(TimerMode::Infinite),
            other => Err(format!("Unknown timer mode: {}", other)),
        }
    }
}

/// Whether the clock is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the engine, published to the host after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub status: TimerStatus,
    /// Seconds left (finite modes) or seconds elapsed (infinite)
    pub time_left: u64,
    /// Duration budget of the current mode, 0 for infinite
    pub total_time: u64,
    pub sessions_completed: u64,
    /// Elapsed fraction of the phase, 0.0 to 1.0 (always 0.0 for infinite)
    pub progress: f64,
    /// `time_left` rendered as MM:SS
    pub display: String,
}

impl TimerSnapshot {
    pub fn new(
        mode: TimerMode,
        status: TimerStatus,
        time_left: u64,
        total_time: u64,
        sessions_completed: u64,
        progress: f64,
    ) -> Self {
        Self {
            mode,
            status,
            time_left,
            total_time,
            sessions_completed,
            progress,
            display: format_clock(time_left),
        }
    }
}

/// Reported by `TimerEngine::tick` on the tick that finishes a finite phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCompleted {
    /// Mode that just ran out
    pub finished: TimerMode,
    /// Mode the engine has already switched to (idle, full duration)
    pub next: TimerMode,
    pub sessions_completed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_path_aliases() {
        assert_eq!("focus".parse::<TimerMode>(), Ok(TimerMode::Focus));
        assert_eq!("ShortBreak".parse::<TimerMode>(), Ok(TimerMode::ShortBreak));
        assert_eq!("short-break".parse::<TimerMode>(), Ok(TimerMode::ShortBreak));
        assert_eq!("long_break".parse::<TimerMode>(), Ok(TimerMode::LongBreak));
        assert_eq!("INFINITE".parse::<TimerMode>(), Ok(TimerMode::Infinite));
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn mode_display_round_trips_through_from_str() {
        for mode in [
            TimerMode::Focus,
            TimerMode::ShortBreak,
            TimerMode::LongBreak,
            TimerMode::Infinite,
        ] {
            assert_eq!(mode.to_string().parse::<TimerMode>(), Ok(mode));
        }
    }

    #[test]
    fn snapshot_serializes_in_camel_case() {
        let snapshot = TimerSnapshot::new(TimerMode::ShortBreak, TimerStatus::Idle, 240, 300, 1, 0.2);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["mode"], "shortBreak");
        assert_eq!(json["status"], "idle");
        assert_eq!(json["timeLeft"], 240);
        assert_eq!(json["totalTime"], 300);
        assert_eq!(json["sessionsCompleted"], 1);
        assert_eq!(json["progress"], 0.2);
        assert_eq!(json["display"], "04:00");
    }
}
