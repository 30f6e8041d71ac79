//! Timer settings, validation and clamping

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sound identifier meaning "play nothing"
pub const NO_SOUND: &str = "none";

pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 999;
pub const MAX_VOLUME: u8 = 100;
pub const MIN_REPEAT_COUNT: u32 = 1;
pub const MAX_REPEAT_COUNT: u32 = 5;

/// Rejected settings, one variant per offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{field} must be between 1 and 999 minutes, got {value}")]
    Duration { field: &'static str, value: u32 },

    #[error("sessionsBeforeLongBreak must be at least 1")]
    SessionsBeforeLongBreak,

    #[error("volume must be between 0 and 100, got {0}")]
    Volume(u8),

    #[error("repeatCount must be between 1 and 5, got {0}")]
    RepeatCount(u32),
}

/// Configuration snapshot the engine reads on every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    /// Focus phase length in minutes
    pub work_duration: u32,
    /// Short break length in minutes
    pub break_duration: u32,
    /// Long break length in minutes
    pub long_break_duration: u32,
    /// Every Nth completed focus session is followed by a long break
    pub sessions_before_long_break: u32,
    /// Clip file name, or `"none"`
    pub sound: String,
    /// Playback volume, 0-100
    pub volume: u8,
    pub is_muted: bool,
    /// Total number of plays of the completion cue
    pub repeat_count: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            sessions_before_long_break: 4,
            sound: "Sound_1.mp3".to_string(),
            volume: 50,
            is_muted: false,
            repeat_count: 1,
        }
    }
}

impl TimerSettings {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in self.durations() {
            if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&value) {
                return Err(SettingsError::Duration { field, value });
            }
        }
        if self.sessions_before_long_break == 0 {
            return Err(SettingsError::SessionsBeforeLongBreak);
        }
        if self.volume > MAX_VOLUME {
            return Err(SettingsError::Volume(self.volume));
        }
        if !(MIN_REPEAT_COUNT..=MAX_REPEAT_COUNT).contains(&self.repeat_count) {
            return Err(SettingsError::RepeatCount(self.repeat_count));
        }
        Ok(())
    }

    /// Copy with every field clamped into its allowed range.
    ///
    /// A zero `sessions_before_long_break` becomes 1, so every focus
    /// completion is followed by a long break instead of dividing by zero.
    /// Zero durations become one minute.
    pub fn sanitized(&self) -> Self {
        let duration = |minutes: u32| minutes.clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES);
        Self {
            work_duration: duration(self.work_duration),
            break_duration: duration(self.break_duration),
            long_break_duration: duration(self.long_break_duration),
            sessions_before_long_break: self.sessions_before_long_break.max(1),
            sound: self.sound.trim().to_string(),
            volume: self.volume.min(MAX_VOLUME),
            is_muted: self.is_muted,
            repeat_count: self.repeat_count.clamp(MIN_REPEAT_COUNT, MAX_REPEAT_COUNT),
        }
    }

    /// Playback gain in [0, 1]
    pub fn gain(&self) -> f32 {
        f32::from(self.volume.min(MAX_VOLUME)) / 100.0
    }

    /// True when a completion should not produce any audio
    pub fn is_silent(&self) -> bool {
        let sound = self.sound.trim();
        self.is_muted || sound.is_empty() || sound.eq_ignore_ascii_case(NO_SOUND)
    }

    fn durations(&self) -> [(&'static str, u32); 3] {
        [
            ("workDuration", self.work_duration),
            ("breakDuration", self.break_duration),
            ("longBreakDuration", self.long_break_duration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = TimerSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.sanitized(), settings);
    }

    #[test]
    fn validate_reports_offending_field() {
        let settings = TimerSettings {
            break_duration: 0,
            ..TimerSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::Duration { field: "breakDuration", value: 0 })
        );

        let settings = TimerSettings {
            sessions_before_long_break: 0,
            ..TimerSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::SessionsBeforeLongBreak));

        let settings = TimerSettings {
            volume: 101,
            ..TimerSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::Volume(101)));

        let settings = TimerSettings {
            repeat_count: 0,
            ..TimerSettings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::RepeatCount(0)));
    }

    #[test]
    fn sanitized_clamps_into_range() {
        let settings = TimerSettings {
            work_duration: 0,
            break_duration: 5000,
            long_break_duration: 15,
            sessions_before_long_break: 0,
            sound: "  Sound_2.mp3 ".to_string(),
            volume: 250,
            is_muted: false,
            repeat_count: 9,
        }
        .sanitized();

        assert_eq!(settings.work_duration, 1);
        assert_eq!(settings.break_duration, MAX_DURATION_MINUTES);
        assert_eq!(settings.sessions_before_long_break, 1);
        assert_eq!(settings.sound, "Sound_2.mp3");
        assert_eq!(settings.volume, 100);
        assert_eq!(settings.repeat_count, MAX_REPEAT_COUNT);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn silence_covers_mute_and_sentinel() {
        let mut settings = TimerSettings::default();
        assert!(!settings.is_silent());

        settings.sound = "none".to_string();
        assert!(settings.is_silent());

        settings.sound = String::new();
        assert!(settings.is_silent());

        settings.sound = "Sound_3.mp3".to_string();
        settings.is_muted = true;
        assert!(settings.is_silent());
    }

    #[test]
    fn gain_scales_volume() {
        let settings = TimerSettings {
            volume: 75,
            ..TimerSettings::default()
        };
        assert!((settings.gain() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: TimerSettings =
            serde_json::from_str(r#"{"workDuration": 50, "isMuted": true}"#).unwrap();

        assert_eq!(settings.work_duration, 50);
        assert!(settings.is_muted);
        assert_eq!(settings.break_duration, 5);
        assert_eq!(settings.sessions_before_long_break, 4);
        assert_eq!(settings.sound, "Sound_1.mp3");
    }
}
