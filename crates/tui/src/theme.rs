//! Color scheme and styling helpers for the dashboard.

use ratatui::style::{Color, Modifier, Style};

/// Accent color for focus indicators and highlights.
pub const ACCENT: Color = Color::Rgb(38, 148, 232);
/// Primary foreground for normal text.
pub const FG: Color = Color::Rgb(224, 224, 230);
/// Muted foreground for hints and secondary labels.
pub const FG_MUTED: Color = Color::Rgb(168, 168, 175);
/// Border color for unfocused elements.
pub const BORDER: Color = Color::Rgb(72, 72, 80);
/// Passed steps and success badges.
pub const OK: Color = Color::Rgb(92, 190, 120);
/// Failed steps, errors, and validation problems.
pub const WARN: Color = Color::Rgb(220, 96, 110);
/// Background hint for the focused form row.
pub const BG_HIGHLIGHT: Color = Color::Rgb(20, 32, 44);

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn title_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(FG)
}

pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(FG).bg(BG_HIGHLIGHT)
}

pub fn list_highlight_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn ok_style() -> Style {
    Style::default().fg(OK)
}

pub fn warn_style() -> Style {
    Style::default().fg(WARN)
}

/// Style for a pass/fail status string from the service.
pub fn status_style(status: &str) -> Style {
    if status.eq_ignore_ascii_case("passed") || status.eq_ignore_ascii_case("pass") {
        ok_style()
    } else {
        warn_style()
    }
}
