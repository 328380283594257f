//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::services::{status_bar::DEFAULT_SCREEN_WIDTH, AlertCommands};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomobar")]
#[command(about = "A headless work/break timer daemon that drives status bar widgets over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the control server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Preferences file (defaults to <config dir>/pomobar/preferences.json)
    #[arg(long)]
    pub preferences: Option<PathBuf>,

    /// Screen width used to size the status item when clients do not send one
    #[arg(long, default_value_t = DEFAULT_SCREEN_WIDTH)]
    pub screen_width: f64,

    /// Program used to show the "time's up" notification
    #[arg(long, default_value = "notify-send")]
    pub notify_command: String,

    /// Command line used to play the completion sound
    #[arg(long, default_value = "canberra-gtk-play -i complete")]
    pub sound_command: String,

    /// Do not start the work timer on launch
    #[arg(long)]
    pub no_start: bool,

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

    /// Explicit preferences path, or the platform default
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences
            .clone()
            .or_else(crate::state::Preferences::default_path)
    }

    pub fn alert_commands(&self) -> AlertCommands {
        AlertCommands {
            notify: self.notify_command.clone(),
            sound: self.sound_command.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["pomobar"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.screen_width, DEFAULT_SCREEN_WIDTH);
        assert!(!config.no_start);
        assert_eq!(config.alert_commands().notify, "notify-send");
    }

    #[test]
    fn explicit_values() {
        let config = Config::try_parse_from([
            "pomobar",
            "-p",
            "9000",
            "--preferences",
            "/tmp/prefs.json",
            "--screen-width",
            "1280",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.preferences_path(), Some(PathBuf::from("/tmp/prefs.json")));
        assert_eq!(config.screen_width, 1280.0);
        assert_eq!(config.log_level(), "debug");
    }
}
