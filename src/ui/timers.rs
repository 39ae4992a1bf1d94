use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, format_hours, marker, row_style};
use super::theme::Theme;
use crate::app::App;

pub fn build_timers_text(app: &App) -> Text<'_> {
    let timers = app.timers_in_range();
    if timers.is_empty() {
        return Text::from(Line::from(Span::styled(
            "  No timers in this week. Press 'n' to log time or [/] to change week.",
            Style::default().fg(Theme::dim()),
        )));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "  {:<11} {:<11} {:<16} {:<14} {:>7}  {}",
                "Date", "Time", "Project", "Category", "Hours", "Description"
            ),
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "  {:<11} {:<11} {:<16} {:<14} {:>7}  {}",
                "----------", "-----------", "----------------", "--------------", "-------", "-----------"
            ),
            Style::default().fg(Theme::dim()),
        )),
    ];

    for (index, record) in timers.iter().copied().enumerate() {
        let timer = &record.data;
        let selected = index == app.selected_timer_index;
        let image = if timer.image_base64.is_some() { " [img]" } else { "" };
        lines.push(Line::from(vec![
            marker(selected),
            Span::styled(format!("{:<11} ", timer.date), Style::default().fg(Theme::dim())),
            Span::styled(
                format!("{:<11} ", format!("{}-{}", timer.start_time, timer.end_time)),
                Style::default().fg(Theme::dim()),
            ),
            Span::styled(clamp_name(&timer.project, 16), row_style(selected)),
            Span::raw(" "),
            Span::styled(clamp_name(&timer.category, 14), row_style(selected)),
            Span::raw(" "),
            Span::styled(
                format!("{:>7}", format_hours(timer.hours)),
                Style::default().fg(Theme::accent()),
            ),
            Span::raw("  "),
            Span::styled(timer.description.as_str(), Style::default().fg(Theme::text())),
            Span::styled(image, Style::default().fg(Theme::dim())),
        ]));
    }

    let total: f64 = timers.iter().map(|record| record.data.hours).sum();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Total: ", Style::default().fg(Theme::dim())),
        Span::styled(
            format_hours(total),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    Text::from(lines)
}
