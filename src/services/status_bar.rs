//! Status bar rendering with adaptive width fallback

use serde::{Deserialize, Serialize};

use crate::state::Preferences;

/// Space taken by everything else in a typical status bar
pub const RESERVED_STATUS_BAR_WIDTH: f64 = 400.0;
pub const MIN_ITEM_WIDTH: f64 = 60.0;
pub const MAX_ITEM_WIDTH: f64 = 120.0;
/// Used when the caller does not know the screen width
pub const DEFAULT_SCREEN_WIDTH: f64 = 1920.0;

pub const CLOCK_ICON: &str = "clock";
pub const TIMER_ICON: &str = "timer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Icon followed by MM:SS
    Full,
    /// MM:SS only
    Short,
    IconOnly,
}

impl DisplayMode {
    /// Modes in the order they are tried
    pub const PREFERENCE: [DisplayMode; 3] =
        [DisplayMode::Full, DisplayMode::Short, DisplayMode::IconOnly];
}

/// Simulated text metrics used to size a status item without a real toolkit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthMetrics {
    pub icon_width: f64,
    pub char_width: f64,
    /// Gap between icon and title
    pub spacing: f64,
    /// Horizontal padding around the whole item
    pub padding: f64,
}

impl Default for WidthMetrics {
    fn default() -> Self {
        Self {
            icon_width: 18.0,
            char_width: 7.5,
            spacing: 4.0,
            padding: 8.0,
        }
    }
}

impl WidthMetrics {
    pub fn rendered_width(&self, mode: DisplayMode, time_text: &str) -> f64 {
        let text_width = time_text.chars().count() as f64 * self.char_width;
        let content = match mode {
            DisplayMode::Full => self.icon_width + self.spacing + text_width,
            DisplayMode::Short => text_width,
            DisplayMode::IconOnly => self.icon_width,
        };
        content + self.padding
    }
}

/// Width budget for our item: `clamp(screen_width - 400, 60, 120)`
pub fn available_width(screen_width: f64) -> f64 {
    (screen_width - RESERVED_STATUS_BAR_WIDTH).clamp(MIN_ITEM_WIDTH, MAX_ITEM_WIDTH)
}

/// First mode whose rendered width fits the budget; icon-only always qualifies
pub fn select_display_mode(time_text: &str, budget: f64, metrics: &WidthMetrics) -> DisplayMode {
    DisplayMode::PREFERENCE
        .into_iter()
        .find(|&mode| {
            mode == DisplayMode::IconOnly || metrics.rendered_width(mode, time_text) <= budget
        })
        .unwrap_or(DisplayMode::IconOnly)
}

/// Format seconds as zero-padded MM:SS
pub fn format_clock(remaining_seconds: u64) -> String {
    format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

/// Everything a status bar needs to draw the item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    pub mode: DisplayMode,
    pub icon: Option<String>,
    pub title: String,
    pub tooltip: Option<String>,
}

impl StatusLine {
    pub fn render(
        remaining_seconds: u64,
        prefs: &Preferences,
        screen_width: f64,
        metrics: &WidthMetrics,
    ) -> Self {
        let time_text = format_clock(remaining_seconds);
        let tooltip = Some(format!("Pomodoro Timer: {}", time_text));

        if !prefs.show_time_in_menu_bar {
            return Self {
                mode: DisplayMode::IconOnly,
                icon: Some(CLOCK_ICON.to_string()),
                title: String::new(),
                tooltip,
            };
        }

        let mode = if prefs.adaptive_status_bar {
            select_display_mode(&time_text, available_width(screen_width), metrics)
        } else {
            DisplayMode::Full
        };

        match mode {
            DisplayMode::Full => Self {
                mode,
                icon: Some(CLOCK_ICON.to_string()),
                title: time_text,
                tooltip,
            },
            DisplayMode::Short => Self {
                mode,
                icon: None,
                title: time_text,
                tooltip,
            },
            DisplayMode::IconOnly => Self {
                mode,
                icon: Some(TIMER_ICON.to_string()),
                title: String::new(),
                tooltip,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(20 * 60), "20:00");
        assert_eq!(format_clock(125 * 60 + 7), "125:07");
    }

    #[test]
    fn budget_is_clamped() {
        assert_eq!(available_width(1920.0), 120.0);
        assert_eq!(available_width(480.0), 80.0);
        assert_eq!(available_width(300.0), 60.0);
    }

    #[test]
    fn ample_width_gives_full_mode() {
        let metrics = WidthMetrics::default();
        assert_eq!(select_display_mode("25:00", 120.0, &metrics), DisplayMode::Full);
    }

    #[test]
    fn falls_back_to_short_then_icon() {
        let metrics = WidthMetrics::default();
        let full = metrics.rendered_width(DisplayMode::Full, "25:00");
        let short = metrics.rendered_width(DisplayMode::Short, "25:00");
        let icon = metrics.rendered_width(DisplayMode::IconOnly, "25:00");
        assert!(icon < short && short < full);

        assert_eq!(select_display_mode("25:00", full - 1.0, &metrics), DisplayMode::Short);
        assert_eq!(select_display_mode("25:00", short - 1.0, &metrics), DisplayMode::IconOnly);
        assert_eq!(select_display_mode("25:00", icon, &metrics), DisplayMode::IconOnly);
    }

    #[test]
    fn icon_only_is_always_returned_as_last_resort() {
        let metrics = WidthMetrics::default();
        assert_eq!(select_display_mode("25:00", 0.0, &metrics), DisplayMode::IconOnly);
    }

    #[test]
    fn narrow_screen_drops_the_icon() {
        let prefs = Preferences::default();
        let line = StatusLine::render(1500, &prefs, 400.0, &WidthMetrics::default());
        assert_eq!(line.mode, DisplayMode::Short);
        assert_eq!(line.icon, None);
        assert_eq!(line.title, "25:00");
    }

    #[test]
    fn icon_only_keeps_time_in_tooltip() {
        let metrics = WidthMetrics { char_width: 25.0, ..WidthMetrics::default() };
        let line = StatusLine::render(61, &Preferences::default(), 1920.0, &metrics);
        assert_eq!(line.mode, DisplayMode::IconOnly);
        assert_eq!(line.icon.as_deref(), Some(TIMER_ICON));
        assert!(line.title.is_empty());
        assert_eq!(line.tooltip.as_deref(), Some("Pomodoro Timer: 01:01"));
    }

    #[test]
    fn non_adaptive_always_renders_full() {
        let prefs = Preferences { adaptive_status_bar: false, ..Preferences::default() };
        let line = StatusLine::render(90, &prefs, 100.0, &WidthMetrics::default());
        assert_eq!(line.mode, DisplayMode::Full);
        assert_eq!(line.icon.as_deref(), Some(CLOCK_ICON));
        assert_eq!(line.title, "01:30");
    }

    #[test]
    fn hidden_time_shows_clock_icon() {
        let prefs = Preferences { show_time_in_menu_bar: false, ..Preferences::default() };
        let line = StatusLine::render(90, &prefs, 1920.0, &WidthMetrics::default());
        assert_eq!(line.mode, DisplayMode::IconOnly);
        assert_eq!(line.icon.as_deref(), Some(CLOCK_ICON));
        assert!(line.title.is_empty());
    }
}
