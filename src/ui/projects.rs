use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, marker, row_style};
use super::theme::Theme;
use crate::app::App;

pub fn build_projects_text(app: &App) -> Text<'_> {
    if app.projects.items().is_empty() {
        return Text::from(Line::from(Span::styled(
            "  No projects found. Press 'n' to create one.",
            Style::default().fg(Theme::dim()),
        )));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {:<24} {:<18} {}", "Project", "Client", "Description"),
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "  {:<24} {:<18} {}",
                "------------------------", "------------------", "-----------"
            ),
            Style::default().fg(Theme::dim()),
        )),
    ];
    let project_lines = app
        .projects
        .items()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let project = &record.data;
            let selected = index == app.selected_project_index;
            Line::from(vec![
                marker(selected),
                Span::styled(clamp_name(&project.project_name, 24), row_style(selected)),
                Span::raw(" "),
                Span::styled(
                    clamp_name(&project.client, 18),
                    Style::default().fg(Theme::accent()),
                ),
                Span::raw(" "),
                Span::styled(project.description.as_str(), Style::default().fg(Theme::dim())),
            ])
        });
    lines.extend(project_lines);
    Text::from(lines)
}
