use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, format_hours, hex_to_color, marker};
use super::theme::Theme;
use crate::app::App;

pub fn build_categories_text(app: &App) -> Text<'_> {
    let totals = app.category_totals();
    if totals.is_empty() {
        return Text::from(Line::from(Span::styled(
            "  No categories found. Press 'n' to create one.",
            Style::default().fg(Theme::dim()),
        )));
    }

    let mut lines = totals
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let selected = index == app.selected_category_index;
            let name_style = hex_to_color(&category.color)
                .map(|color| Style::default().fg(color).add_modifier(Modifier::BOLD))
                .unwrap_or_else(|| Style::default().fg(Theme::text()));
            Line::from(vec![
                marker(selected),
                Span::styled(clamp_name(&category.name, 20), name_style),
                Span::raw(" "),
                Span::styled(
                    format!("{:>8}", format_hours(category.total_hours)),
                    Style::default().fg(Theme::accent()),
                ),
                Span::raw("  "),
                Span::styled(category.color.clone(), Style::default().fg(Theme::dim())),
            ])
        })
        .collect::<Vec<_>>();

    let total: f64 = totals.iter().map(|category| category.total_hours).sum();
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
