//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::sound::{CommandPlayer, DEFAULT_PLAYER};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A Pomodoro timer daemon controlled over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "25250")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON file settings are loaded from and saved to
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Directory containing the sound clips
    #[arg(long, default_value = "sounds")]
    pub sounds_dir: PathBuf,

    /// Program used to play sound clips
    #[arg(long, default_value = DEFAULT_PLAYER)]
    pub player: String,

    /// Player argument, repeatable; supports {path}, {volume} and {gain}
    #[arg(long = "player-arg", allow_hyphen_values = true)]
    pub player_args: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the clip player; ffplay arguments are used when none are given
    pub fn player(&self) -> CommandPlayer {
        let args = if self.player_args.is_empty() && self.player == DEFAULT_PLAYER {
            CommandPlayer::default_args()
        } else if self.player_args.is_empty() {
            vec!["{path}".to_string()]
        } else {
            self.player_args.clone()
        };
        CommandPlayer::new(self.player.clone(), args, self.sounds_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["focus-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:25250");
        assert_eq!(config.log_level(), "info");
        assert!(config.settings.is_none());

        let player = config.player();
        assert_eq!(player.program, "ffplay");
        assert_eq!(player.args, CommandPlayer::default_args());
    }

    #[test]
    fn custom_player_defaults_to_path_only() {
        let config = Config::try_parse_from(["focus-timer", "--player", "paplay", "-v"]).unwrap();
        assert_eq!(config.player().args, vec!["{path}".to_string()]);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn player_args_are_kept_in_order() {
        let config = Config::try_parse_from([
            "focus-timer",
            "--player",
            "mpv",
            "--player-arg",
            "--no-video",
            "--player-arg",
            "--volume={volume}",
            "--player-arg",
            "{path}",
        ])
        .unwrap();
        assert_eq!(config.player().args, vec!["--no-video", "--volume={volume}", "{path}"]);
    }
}
