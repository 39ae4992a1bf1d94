use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Key bindings",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit",
        "?: Toggle help",
        "Tab/Shift+Tab: Next/previous view",
        "h/t/p/c/w: Home, Timers, Projects, Categories, Report",
        "r: Reload everything from the store",
        "esc: Back",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Lists"));
    lines.extend(section_lines(&["Up/Down: Move selection"]));

    lines.push(Line::from(""));
    lines.push(section_title("Home"));
    lines.extend(section_lines(&[
        "n: New task",
        "space: Mark selected task done/undone",
        "d: Delete selected task",
        "g: Edit daily goals",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Timers/Categories/Report"));
    lines.extend(section_lines(&[
        "[ or Left: Previous week",
        "] or Right: Next week",
        "n: Log time (timers), new category (categories)",
        "g: Edit daily goals (report)",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Projects"));
    lines.extend(section_lines(&["n: New project"]));

    lines.push(Line::from(""));
    lines.push(section_title("Popups"));
    lines.extend(section_lines(&[
        "Tab/Up/Down: Switch field",
        "Enter: Save",
        "Esc: Cancel",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Command line"));
    lines.extend(section_lines(&[
        "kronos timer start / stop / cancel: Stopwatch",
        "kronos --help: Everything else",
    ]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
