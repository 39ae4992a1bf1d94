use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{format_hours, marker, row_style};
use super::theme::Theme;
use crate::app::App;
use crate::report::GoalStatus;

pub fn build_home_text(app: &App) -> Text<'_> {
    let mut lines = vec![section_title("Daily goals")];
    let (min, max) = app.goals.thresholds();
    lines.push(Line::from(vec![
        Span::styled("  Min: ", Style::default().fg(Theme::dim())),
        Span::styled(goal_text(min), Style::default().fg(Theme::accent())),
        Span::styled("  Max: ", Style::default().fg(Theme::dim())),
        Span::styled(goal_text(max), Style::default().fg(Theme::accent())),
    ]));

    let today = chrono::Local::now().date_naive();
    let worked_today: f64 = app
        .timers
        .values()
        .iter()
        .filter(|timer| crate::dates::parse_date(&timer.date).ok() == Some(today))
        .map(|timer| timer.hours)
        .sum();
    let status = GoalStatus::classify(worked_today, min, max);
    lines.push(Line::from(vec![
        Span::styled("  Today: ", Style::default().fg(Theme::dim())),
        Span::styled(
            format_hours(worked_today),
            Style::default()
                .fg(Theme::goal(status))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));

    lines.push(section_title("Tasks"));
    if app.tasks.items().is_empty() {
        lines.push(Line::from(Span::styled(
            "  No tasks yet. Press 'n' to add one.",
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    for (index, record) in app.tasks.items().iter().enumerate() {
        let task = &record.data;
        let selected = index == app.selected_task_index;
        let (check, check_style) = if task.is_completed {
            ("[x] ", Style::default().fg(Theme::success()))
        } else {
            ("[ ] ", Style::default().fg(Theme::dim()))
        };
        let mut title_style = row_style(selected);
        if task.is_completed {
            title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
        }
        lines.push(Line::from(vec![
            marker(selected),
            Span::styled(check, check_style),
            Span::styled(task.title.as_str(), title_style),
            Span::raw("  "),
            Span::styled(task.description.as_str(), Style::default().fg(Theme::dim())),
        ]));
    }
    Text::from(lines)
}

fn goal_text(goal: Option<f64>) -> String {
    goal.map(format_hours).unwrap_or_else(|| "-".to_string())
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}
