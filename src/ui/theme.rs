use ratatui::style::Color;

use crate::report::GoalStatus;

/// Unified color theme for the application
pub struct Theme;

impl Theme {
    /// Branding color
    pub fn primary() -> Color {
        Color::Magenta
    }

    /// Borders and section titles
    pub fn secondary() -> Color {
        Color::Cyan
    }

    /// Completed tasks, days within goal
    pub fn success() -> Color {
        Color::Green
    }

    /// Running stopwatch
    pub fn active() -> Color {
        Color::LightGreen
    }

    /// Status messages, days under the minimum goal
    pub fn warn() -> Color {
        Color::Yellow
    }

    /// Days over the maximum goal
    pub fn over() -> Color {
        Color::Red
    }

    pub fn highlight() -> Color {
        Color::Cyan
    }

    pub fn selection_marker() -> Color {
        Color::Green
    }

    pub fn dim() -> Color {
        Color::DarkGray
    }

    pub fn text() -> Color {
        Color::White
    }

    /// Hours, totals and other numbers
    pub fn accent() -> Color {
        Color::LightBlue
    }

    pub fn goal(status: GoalStatus) -> Color {
        match status {
            GoalStatus::Unset => Self::accent(),
            GoalStatus::Below => Self::warn(),
            GoalStatus::Within => Self::success(),
            GoalStatus::Above => Self::over(),
        }
    }
}
