//! Settings file persistence

use std::{fs, io::ErrorKind, path::Path};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::timer::TimerSettings;

/// Load settings from a JSON file, falling back to defaults.
///
/// Missing fields take their default values. A missing or unreadable file
/// yields the defaults; out-of-range values are clamped.
pub fn load_settings(path: &Path) -> TimerSettings {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No settings file at {}, using defaults", path.display());
            return TimerSettings::default();
        }
        Err(e) => {
            warn!("Failed to read settings from {}: {}, using defaults", path.display(), e);
            return TimerSettings::default();
        }
    };

    let settings = match serde_json::from_str::<TimerSettings>(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Ignoring malformed settings file {}: {}", path.display(), e);
            return TimerSettings::default();
        }
    };

    if let Err(e) = settings.validate() {
        warn!("Clamping settings from {}: {}", path.display(), e);
    }

    info!("Loaded settings from {}", path.display());
    settings.sanitized()
}

/// Write settings as pretty JSON, creating parent directories
pub fn save_settings(path: &Path, settings: &TimerSettings) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, json).with_context(|| format!("Failed to write settings to {}", path.display()))?;

    info!("Settings saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("absent.json"));
        assert_eq!(settings, TimerSettings::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_settings(&path), TimerSettings::default());
    }

    #[test]
    fn partial_file_is_merged_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"breakDuration": 10, "sound": "none", "repeatCount": 3}"#).unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.break_duration, 10);
        assert_eq!(settings.sound, "none");
        assert_eq!(settings.repeat_count, 3);
        assert_eq!(settings.work_duration, 25);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"workDuration": 0, "sessionsBeforeLongBreak": 0}"#).unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.work_duration, 1);
        assert_eq!(settings.sessions_before_long_break, 1);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = TimerSettings {
            work_duration: 45,
            volume: 20,
            is_muted: true,
            ..TimerSettings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }
}
