//! Break session state

use serde::{Deserialize, Serialize};

use super::Preferences;

pub const STANDUP_TITLE: &str = "Time to Stand Up!";
pub const STANDUP_SUBTITLE: &str = "Take a moment to stretch and move around";

/// What the break overlay should show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakSession {
    pub remaining_seconds: u64,
    pub message: String,
    pub subtitle: Option<String>,
    pub standup: bool,
    pub background_color: String,
    pub fade_in: bool,
    /// Bumped on every new break so a stale ticker can tell it was replaced
    #[serde(skip)]
    pub id: u64,
}

impl BreakSession {
    /// Build a break from the current preferences
    pub fn from_preferences(prefs: &Preferences, id: u64) -> Self {
        let (message, subtitle) = if prefs.enable_standup_break {
            (STANDUP_TITLE.to_string(), Some(STANDUP_SUBTITLE.to_string()))
        } else {
            (prefs.break_message.clone(), None)
        };

        Self {
            remaining_seconds: prefs.break_time_seconds.max(1),
            message,
            subtitle,
            standup: prefs.enable_standup_break,
            background_color: prefs.break_background_color.clone(),
            fade_in: prefs.fade_in_break,
            id,
        }
    }

    /// Count down one second. Returns true once the break is over.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_uses_configured_message() {
        let prefs = Preferences {
            break_time_seconds: 3,
            break_message: "Look away".to_string(),
            ..Preferences::default()
        };
        let mut session = BreakSession::from_preferences(&prefs, 1);
        assert_eq!(session.message, "Look away");
        assert_eq!(session.subtitle, None);

        assert!(!session.tick());
        assert!(!session.tick());
        assert!(session.tick());
    }

    #[test]
    fn standup_break_overrides_message() {
        let prefs = Preferences {
            enable_standup_break: true,
            ..Preferences::default()
        };
        let session = BreakSession::from_preferences(&prefs, 1);
        assert!(session.standup);
        assert_eq!(session.message, STANDUP_TITLE);
        assert_eq!(session.subtitle.as_deref(), Some(STANDUP_SUBTITLE));
    }
}
