use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::format_hours;
use super::theme::Theme;
use crate::app::App;
use crate::report::{self, GoalStatus};

const BAR_WIDTH: usize = 40;

pub fn build_report_text(app: &App) -> Text<'_> {
    let weekly = app.weekly_report();
    if weekly.is_empty() {
        return Text::from(Line::from(Span::styled(
            "  No data available for the selected week.",
            Style::default().fg(Theme::dim()),
        )));
    }

    let (min, max) = app.goals.thresholds();
    let mut lines = Vec::new();
    for day in &weekly.days {
        let status = GoalStatus::classify(day.hours, min, max);
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<10} ", report::weekday_name(day.weekday)),
                Style::default().fg(Theme::text()),
            ),
            Span::styled(
                bar(day.hours, app.chart_max_hours, min, max),
                Style::default().fg(Theme::goal(status)),
            ),
            Span::styled(
                format!(" {:>7}", format_hours(day.hours)),
                Style::default().fg(Theme::accent()),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Total: ", Style::default().fg(Theme::dim())),
        Span::styled(
            format_hours(weekly.total_hours()),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  (axis 0-{}h, bars in half hours)", app.chart_max_hours),
            Style::default().fg(Theme::dim()),
        ),
    ]));
    lines.push(legend_line(min, max));
    Text::from(lines)
}

/// A fixed-width bar with `|` where the min and max goals fall. Goals at or
/// beyond the axis ceiling sit on the last cell.
fn bar(hours: f64, max_hours: f64, min: Option<f64>, max: Option<f64>) -> String {
    let filled = report::bar_cells(hours, max_hours, BAR_WIDTH);
    let goal_cells = [min, max]
        .into_iter()
        .flatten()
        .map(|goal| report::bar_cells(goal, max_hours, BAR_WIDTH).min(BAR_WIDTH - 1))
        .collect::<Vec<_>>();
    (0..BAR_WIDTH)
        .map(|cell| {
            if goal_cells.contains(&cell) {
                '|'
            } else if cell < filled {
                '█'
            } else {
                '·'
            }
        })
        .collect()
}

fn legend_line(min: Option<f64>, max: Option<f64>) -> Line<'static> {
    if min.is_none() && max.is_none() {
        return Line::from(Span::styled(
            "  No daily goals set. Press 'g' to set them.",
            Style::default().fg(Theme::dim()),
        ));
    }
    let goal = |value: Option<f64>| value.map(format_hours).unwrap_or_else(|| "-".to_string());
    Line::from(vec![
        Span::styled(
            format!("  Goals: min {} max {}  ", goal(min), goal(max)),
            Style::default().fg(Theme::dim()),
        ),
        Span::styled("below ", Style::default().fg(Theme::goal(GoalStatus::Below))),
        Span::styled("within ", Style::default().fg(Theme::goal(GoalStatus::Within))),
        Span::styled("above", Style::default().fg(Theme::goal(GoalStatus::Above))),
    ])
}
