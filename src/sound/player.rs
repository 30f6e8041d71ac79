//! Clip playback through an external player process

use std::{
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};
use futures::future::BoxFuture;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Player used when none is configured
pub const DEFAULT_PLAYER: &str = "ffplay";

/// Playback failure, never propagated past the dispatcher
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Invalid sound clip name: {0}")]
    InvalidClip(String),

    #[error("Sound clip not found: {}", .0.display())]
    MissingClip(PathBuf),

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Audio backend that plays a clip once and resolves when it has finished
pub trait AudioPlayer: Send + Sync {
    fn play(&self, clip: &str, gain: f32) -> BoxFuture<'static, Result<(), PlaybackError>>;
}

/// Plays clips from a directory by running a command-line player.
///
/// Argument placeholders: `{path}` (clip file), `{volume}` (0-100) and
/// `{gain}` (0.00-1.00).
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    pub program: String,
    pub args: Vec<String>,
    pub sounds_dir: PathBuf,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>, sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            sounds_dir: sounds_dir.into(),
        }
    }

    /// ffplay without a window, exiting when the clip ends
    pub fn ffplay(sounds_dir: impl Into<PathBuf>) -> Self {
        Self::new(DEFAULT_PLAYER, Self::default_args(), sounds_dir)
    }

    pub fn default_args() -> Vec<String> {
        ["-nodisp", "-autoexit", "-loglevel", "quiet", "-volume", "{volume}", "{path}"]
            .iter()
            .map(|arg| arg.to_string())
            .collect()
    }

    /// Resolve a clip name inside the sounds directory
    pub fn clip_path(&self, clip: &str) -> Result<PathBuf, PlaybackError> {
        let name = Path::new(clip);
        let is_plain_file_name = name.file_name().map_or(false, |file| file == name.as_os_str());
        if clip.is_empty() || !is_plain_file_name {
            return Err(PlaybackError::InvalidClip(clip.to_string()));
        }
        Ok(self.sounds_dir.join(name))
    }

    /// Substitute the placeholders in the configured arguments
    pub fn render_args(&self, path: &Path, gain: f32) -> Vec<String> {
        let gain = gain.clamp(0.0, 1.0);
        let volume = (gain * 100.0).round() as u32;
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{path}", &path.to_string_lossy())
                    .replace("{volume}", &volume.to_string())
                    .replace("{gain}", &format!("{:.2}", gain))
            })
            .collect()
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&self, clip: &str, gain: f32) -> BoxFuture<'static, Result<(), PlaybackError>> {
        let program = self.program.clone();
        let prepared = self
            .clip_path(clip)
            .map(|path| (self.render_args(&path, gain), path));

        Box::pin(async move {
            let (args, path) = prepared?;
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Err(PlaybackError::MissingClip(path));
            }

            debug!("Playing {} with {}", path.display(), program);

            // Dropping this future (sequence cancelled) kills the player
            let output = Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|source| PlaybackError::Spawn {
                    program: program.clone(),
                    source,
                })?;

            if !output.status.success() {
                return Err(PlaybackError::Exit {
                    program,
                    status: output.status,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            Ok(())
        })
    }
}

/// Check that the player program can be executed
pub async fn check_player_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| format!("{} is not available ({}). Completion sounds will be skipped.", program, e))?;

    info!("{} is available", program);
    Ok(())
}
