//! Harbor palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const HARBOR_BLUE: Color = Color::Rgb(94, 174, 255); // #5eaeff
pub const SEAFOAM: Color = Color::Rgb(118, 228, 196); // #76e4c4
pub const AMBER: Color = Color::Rgb(255, 196, 92); // #ffc45c
pub const SUCCESS_GREEN: Color = Color::Rgb(112, 224, 134); // #70e086
pub const ERROR_RED: Color = Color::Rgb(247, 108, 108); // #f76c6c

// ── Extended Palette ──────────────────────────────────────────────────

pub const FOG: Color = Color::Rgb(178, 186, 200); // #b2bac8
pub const BORDER_SLATE: Color = Color::Rgb(86, 100, 130); // #566482
pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 44, 58); // #262c3a
pub const BG_DARK: Color = Color::Rgb(24, 28, 38); // #181c26

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(HARBOR_BLUE).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(SEAFOAM)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_SLATE)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(HARBOR_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(FOG)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(SEAFOAM)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Checked-row marker (part of a bulk selection).
pub fn row_checked() -> Style {
    Style::default().fg(AMBER)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(SEAFOAM).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(FOG)
}

/// Filter chip text.
pub fn chip() -> Style {
    Style::default().fg(BG_DARK).bg(AMBER)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_SLATE)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(HARBOR_BLUE).add_modifier(Modifier::BOLD)
}
