//! User preferences and their on-disk JSON form

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Directory name used under the platform config dir
pub const APP_DIR: &str = "pomobar";
const PREFERENCES_FILE: &str = "preferences.json";

/// Longest accepted work session, one day
pub const MAX_WORK_TIME_MINS: u64 = 24 * 60;
/// Longest accepted break, one day
pub const MAX_BREAK_TIME_SECONDS: u64 = 24 * 60 * 60;

/// User-configurable settings. Keys missing from the file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub show_time_in_menu_bar: bool,
    /// Break overlay background as `#RRGGBB`
    pub break_background_color: String,
    pub work_time_mins: u64,
    pub break_time_seconds: u64,
    pub break_message: String,
    pub launch_at_startup: bool,
    pub play_sound_at_end: bool,
    pub fade_in_break: bool,
    pub pause_at_mouse_idle: bool,
    pub enable_standup_break: bool,
    pub adaptive_status_bar: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_time_in_menu_bar: true,
            break_background_color: "#000000".to_string(),
            work_time_mins: 20,
            break_time_seconds: 20,
            break_message: "Take a Break.!".to_string(),
            launch_at_startup: false,
            play_sound_at_end: false,
            fade_in_break: false,
            pause_at_mouse_idle: false,
            enable_standup_break: false,
            adaptive_status_bar: true,
        }
    }
}

impl Preferences {
    /// Default file location, `<config dir>/pomobar/preferences.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFERENCES_FILE))
    }

    pub fn work_duration_seconds(&self) -> u64 {
        self.work_time_mins.saturating_mul(60)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WORK_TIME_MINS).contains(&self.work_time_mins) {
            bail!("work_time_mins must be between 1 and {}", MAX_WORK_TIME_MINS);
        }
        if !(1..=MAX_BREAK_TIME_SECONDS).contains(&self.break_time_seconds) {
            bail!("break_time_seconds must be between 1 and {}", MAX_BREAK_TIME_SECONDS);
        }
        if !is_hex_color(&self.break_background_color) {
            bail!(
                "break_background_color must look like #RRGGBB, got {:?}",
                self.break_background_color
            );
        }
        Ok(())
    }

    /// Load preferences, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
        let prefs: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse preferences in {}", path.display()))?;
        prefs.validate()?;

        info!("Loaded preferences from {}", path.display());
        Ok(prefs)
    }

    /// Write preferences next to the target and rename into place
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to move preferences into {}", path.display()))?;

        debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let prefs = Preferences::default();
        prefs.validate().unwrap();
        assert_eq!(prefs.work_duration_seconds(), 20 * 60);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{ "work_time_mins": 45, "pause_at_mouse_idle": true }"#).unwrap();
        assert_eq!(prefs.work_time_mins, 45);
        assert!(prefs.pause_at_mouse_idle);
        assert_eq!(prefs.break_message, "Take a Break.!");
        assert!(prefs.adaptive_status_bar);
    }

    #[test]
    fn rejects_invalid_values() {
        let zero_work = Preferences { work_time_mins: 0, ..Preferences::default() };
        assert!(zero_work.validate().is_err());

        let zero_break = Preferences { break_time_seconds: 0, ..Preferences::default() };
        assert!(zero_break.validate().is_err());

        for color in ["black", "#00000", "#GG0000", "000000#"] {
            let prefs = Preferences {
                break_background_color: color.to_string(),
                ..Preferences::default()
            };
            assert!(prefs.validate().is_err(), "{color} should be rejected");
        }
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Preferences::load(&path).is_err());
    }

    #[test]
    fn rejects_oversized_durations() {
        let huge_work = Preferences { work_time_mins: u64::MAX / 30, ..Preferences::default() };
        assert!(huge_work.validate().is_err());
        assert_eq!(huge_work.work_duration_seconds(), u64::MAX);

        let huge_break = Preferences {
            break_time_seconds: MAX_BREAK_TIME_SECONDS + 1,
            ..Preferences::default()
        };
        assert!(huge_break.validate().is_err());

        let longest = Preferences {
            work_time_mins: MAX_WORK_TIME_MINS,
            break_time_seconds: MAX_BREAK_TIME_SECONDS,
            ..Preferences::default()
        };
        assert!(longest.validate().is_ok());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = Preferences {
            work_time_mins: 50,
            break_background_color: "#1a2B3c".to_string(),
            enable_standup_break: true,
            ..Preferences::default()
        };

        prefs.save(&path).await.unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }
}
