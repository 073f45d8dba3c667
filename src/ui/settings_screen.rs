//! Rendering for the tenant settings page

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::settings::controller::{Notice, NoticeLevel, SettingsStep};
use crate::settings::forms::FieldSet;

/// Everything the settings page needs for one frame
pub struct SettingsView<'a> {
    pub tenant: &'a str,
    pub step: SettingsStep,
    pub is_edit_mode: bool,
    pub save_in_flight: bool,
    pub notice: Option<&'a Notice>,
    pub fields: &'a mut FieldSet,
}

/// Render the full settings page
pub fn render(frame: &mut Frame, view: &mut SettingsView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // tabs
            Constraint::Min(4),    // form body
            Constraint::Length(1), // status bar
            Constraint::Length(1), // key hints
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view);
    render_tabs(frame, chunks[1], view.step);
    render_form(frame, chunks[2], view);
    render_status(frame, chunks[3], view);
    render_hints(frame, chunks[4], view.is_edit_mode);
}

fn render_header(frame: &mut Frame, area: Rect, view: &SettingsView) {
    let mode = if view.is_edit_mode { "editing" } else { "read-only" };
    let line = Line::from(vec![
        Span::styled(
            " tenantctl ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" tenant: "),
        Span::styled(view.tenant, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  [{mode}]"), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, step: SettingsStep) {
    let titles: Vec<Line> = SettingsStep::all()
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!(" F{} {} ", i + 1, s.title())))
        .collect();
    let selected = SettingsStep::all().iter().position(|s| *s == step).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::BOTTOM))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_form(frame: &mut Frame, area: Rect, view: &mut SettingsView) {
    if !view.is_edit_mode {
        render_read_only(frame, area, view);
        return;
    }

    let mut y = area.y;
    let focused = view.fields.focused;
    let errors = view.fields.errors.clone();
    for (i, entry) in view.fields.entries.iter_mut().enumerate() {
        let field_height = entry.field.render_height();
        let error = errors.for_field(entry.name).map(str::to_string);
        let needed = 1 + field_height + u16::from(error.is_some());
        if y + needed > area.y + area.height {
            break;
        }

        let is_focused = i == focused;
        let label_style = if is_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_focused { "> " } else { "  " };
        let label_area = Rect {
            y,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{marker}{}", entry.label),
                label_style,
            ))),
            label_area,
        );
        y += 1;

        let field_area = Rect {
            x: area.x + 4,
            y,
            width: area.width.saturating_sub(4),
            height: field_height,
        };
        entry.field.render(frame, field_area, is_focused);
        y += field_height;

        // Inline validation error stays next to the offending field
        if let Some(message) = error {
            let error_area = Rect {
                x: area.x + 4,
                y,
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    message,
                    Style::default().fg(Color::Red),
                ))),
                error_area,
            );
            y += 1;
        }
    }
}

fn render_read_only(frame: &mut Frame, area: Rect, view: &mut SettingsView) {
    let mut lines: Vec<Line> = Vec::new();
    for entry in &view.fields.entries {
        let value = entry.field.value();
        let display = if value.is_empty() {
            "(not set)".to_string()
        } else {
            value
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<26}", entry.label),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(display),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "  Press Ctrl+E to edit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status(frame: &mut Frame, area: Rect, view: &SettingsView) {
    let line = if view.save_in_flight {
        Line::from(Span::styled(
            " saving… ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ))
    } else if let Some(notice) = view.notice {
        let (fg, bg) = match notice.level {
            NoticeLevel::Info => (Color::Black, Color::Blue),
            NoticeLevel::Success => (Color::Black, Color::Green),
            NoticeLevel::Warning => (Color::Black, Color::Yellow),
            NoticeLevel::Error => (Color::White, Color::Red),
        };
        Line::from(Span::styled(
            format!(" {} ", notice.message),
            Style::default().fg(fg).bg(bg),
        ))
    } else if let Some((field, message)) = view.fields.errors.iter().next() {
        // Summarize the first inline error so it is visible even when the
        // offending field is scrolled off
        Line::from(Span::styled(
            format!(" {field}: {message} ({} to fix) ", view.fields.errors.len()),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_hints(frame: &mut Frame, area: Rect, is_edit_mode: bool) {
    let hints = if is_edit_mode {
        " Tab/Shift+Tab fields · F1-F3 steps · Ctrl+S save · Ctrl+D dismiss · Ctrl+Q quit"
    } else {
        " F1-F3 steps · Ctrl+E edit · Ctrl+Q quit"
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}
