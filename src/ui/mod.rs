mod categories;
mod help;
mod helpers;
mod home;
mod projects;
mod report;
mod theme;
mod timers;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, AppView, FormKind, FormPopup, TABS};
use crate::dates;
use theme::Theme;

use helpers::{format_duration, hex_to_color};

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let body_text = match app.view {
        AppView::Home => home::build_home_text(app),
        AppView::Timers => timers::build_timers_text(app),
        AppView::Projects => projects::build_projects_text(app),
        AppView::Categories => categories::build_categories_text(app),
        AppView::Report => report::build_report_text(app),
        AppView::Help => help::build_help_text(),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let signed_in = app
        .user
        .as_ref()
        .map(|user| user.email.clone())
        .unwrap_or_else(|| "not signed in".to_string());
    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Kronos  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "time tracker",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(signed_in, Style::default().fg(Theme::dim())),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(header, layout[0]);

    let mut body_lines = vec![
        tabs_line(app),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}{}", app.view.title(), range_suffix(app)),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(status) = &app.status {
        body_lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(Theme::warn()),
        )));
        body_lines.push(Line::from(""));
    }
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::dim()),
    )));
    body_lines.extend(keybinds_lines(app));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(Text::from(stopwatch_line(app)))
        .alignment(Alignment::Left)
        .block(rounded_block());
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.form_popup {
        render_form_popup(frame, popup);
    }
}

fn rounded_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::secondary()))
}

fn range_suffix(app: &App) -> String {
    match app.view {
        AppView::Timers | AppView::Categories | AppView::Report => {
            let (start, end) = app.range();
            format!(
                "  {} - {}",
                dates::format_date(start),
                dates::format_date(end)
            )
        }
        _ => String::new(),
    }
}

fn render_form_popup(frame: &mut Frame, popup: &FormPopup) {
    let percent_y = if popup.fields.len() > 3 { 60 } else { 40 };
    let area = centered_rect(60, percent_y, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            popup.kind.title(),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (index, label) in popup.kind.labels().iter().enumerate() {
        let value = popup.fields[index].as_str();
        let style = if popup.field == index {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::text())
        };
        let mut spans = vec![
            Span::styled(format!("{label}: "), Style::default().fg(Theme::dim())),
            Span::styled(value, style),
        ];
        if popup.kind == FormKind::NewCategory && index == 1 {
            match hex_to_color(value) {
                Some(preview) => {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled("███", Style::default().fg(preview)));
                }
                None if value.is_empty() => spans.push(Span::styled(
                    "#RRGGBB (blank for random)",
                    Style::default().fg(Theme::dim()),
                )),
                None => {}
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/Up/Down: switch field. Enter: save. Esc: cancel.",
        Style::default().fg(Theme::dim()),
    )));

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(rounded_block().title(format!(" {} ", popup.kind.title())));
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn tabs_line(app: &App) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, view) in TABS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if *view == app.view {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
    }
    Line::from(spans)
}

fn stopwatch_line(app: &App) -> Line<'static> {
    match app.stopwatch_elapsed {
        Some(elapsed) => Line::from(vec![
            Span::styled(
                "● ",
                Style::default()
                    .fg(Theme::active())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Stopwatch running {}", format_duration(elapsed)),
                Style::default()
                    .fg(Theme::active())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  (kronos timer stop <project> <category> <description>)",
                Style::default().fg(Theme::dim()),
            ),
        ]),
        None => Line::from(Span::styled(
            "● No stopwatch running",
            Style::default().fg(Theme::dim()),
        )),
    }
}

fn keybinds_lines(app: &App) -> Vec<Line<'static>> {
    let primary = match app.view {
        AppView::Home => "Up/Down: Select  n: New task  space: Done/Undone  d: Delete  g: Goals",
        AppView::Timers => "Up/Down: Select  n: Log time  [/]: Previous/next week",
        AppView::Projects => "Up/Down: Select  n: New project",
        AppView::Categories => "Up/Down: Select  n: New category  [/]: Previous/next week",
        AppView::Report => "[/]: Previous/next week  g: Goals",
        AppView::Help => "Press ? or esc to close this help screen",
    };
    vec![
        Line::from(Span::styled(
            "Tab: Next view  h/t/p/c/w: Quick nav",
            Style::default().fg(Theme::highlight()),
        )),
        Line::from(Span::styled(primary, Style::default().fg(Theme::dim()))),
        Line::from(Span::styled(
            "esc: Back  r: Refresh  ?: Help  q: Quit",
            Style::default().fg(Theme::dim()),
        )),
    ]
}
