//! Reusable form field widgets for the settings forms

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::settings::preview::LogoPreview;

/// A form field widget that can handle different input types
pub enum FormField {
    /// Single-line text input
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
        max_length: Option<usize>,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
    /// Enum selection from predefined options
    EnumSelect {
        options: Vec<String>,
        selected: usize,
        list_state: ListState,
    },
    /// Boolean toggle
    Toggle {
        value: bool,
        true_label: String,
        false_label: String,
    },
    /// File path input with a locally decoded image preview
    PathInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
        preview: Option<LogoPreview>,
    },
}

impl FormField {
    /// Create a single-line text input
    pub fn text(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
            max_length: None,
        }
    }

    /// Create a single-line text input with a length cap
    pub fn text_with_max(placeholder: &str, max_length: usize) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
            max_length: Some(max_length),
        }
    }

    /// Create a multi-line text area
    pub fn multiline(placeholder: &str) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.to_string(),
        }
    }

    /// Create an enum selector with the first option selected
    pub fn select(options: &[&str]) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        FormField::EnumSelect {
            options: options.iter().map(|s| (*s).to_string()).collect(),
            selected: 0,
            list_state,
        }
    }

    /// Create a boolean toggle
    pub fn toggle(true_label: &str, false_label: &str) -> Self {
        FormField::Toggle {
            value: false,
            true_label: true_label.to_string(),
            false_label: false_label.to_string(),
        }
    }

    /// Create a file path input
    pub fn path(placeholder: &str) -> Self {
        FormField::PathInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
            preview: None,
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
            FormField::EnumSelect {
                options, selected, ..
            } => options.get(*selected).cloned().unwrap_or_default(),
            FormField::Toggle { value, .. } => value.to_string(),
            FormField::PathInput { value, .. } => value.clone(),
        }
    }

    /// Set the value from a string
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
            } => {
                if let Some(idx) = options.iter().position(|o| o == new_value) {
                    *selected = idx;
                    list_state.select(Some(idx));
                }
            }
            FormField::Toggle { value, .. } => {
                *value = new_value == "true" || new_value == "yes";
            }
            FormField::PathInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
        }
    }

    /// Get the boolean value of a toggle field
    pub fn bool_value(&self) -> bool {
        match self {
            FormField::Toggle { value, .. } => *value,
            _ => false,
        }
    }

    /// Attach or clear the preview of a path field
    pub fn set_preview(&mut self, new_preview: Option<LogoPreview>) {
        if let FormField::PathInput { preview, .. } = self {
            *preview = new_preview;
        }
    }

    /// Preview of a path field, if decoded
    pub fn preview(&self) -> Option<&LogoPreview> {
        match self {
            FormField::PathInput { preview, .. } => preview.as_ref(),
            _ => None,
        }
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                max_length,
                ..
            } => edit_line(value, cursor_pos, *max_length, key),
            FormField::TextArea { textarea, .. } => {
                // TextArea handles its own key events
                textarea.input(crossterm::event::KeyEvent::new(
                    key,
                    crossterm::event::KeyModifiers::NONE,
                ));
                true
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
            } => match key {
                KeyCode::Up => {
                    if *selected > 0 {
                        *selected -= 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                KeyCode::Down => {
                    if *selected < options.len().saturating_sub(1) {
                        *selected += 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                _ => false,
            },
            FormField::Toggle { value, .. } => match key {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    *value = !*value;
                    true
                }
                KeyCode::Left => {
                    *value = false;
                    true
                }
                KeyCode::Right => {
                    *value = true;
                    true
                }
                _ => false,
            },
            FormField::PathInput {
                value, cursor_pos, ..
            } => edit_line(value, cursor_pos, None, key),
        }
    }

    /// Get the height needed to render this field
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => 1,
            FormField::TextArea { .. } => 4,
            FormField::EnumSelect { options, .. } => (options.len() as u16).min(4),
            FormField::Toggle { .. } => 1,
            // Path plus preview line
            FormField::PathInput { .. } => 2,
        }
    }

    /// Render the field
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                max_length,
            } => {
                let suffix = max_length
                    .map(|m| format!(" ({}/{})", value.chars().count(), m))
                    .unwrap_or_default();
                render_line_input(frame, area, value, *cursor_pos, placeholder, &suffix, focused);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                if textarea.lines().iter().all(|l| l.is_empty()) && !focused {
                    textarea.set_placeholder_text(placeholder.clone());
                    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
                }
                frame.render_widget(&**textarea, area);
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
            } => {
                let items: Vec<ListItem> = options
                    .iter()
                    .enumerate()
                    .map(|(i, opt)| {
                        let style = if i == *selected {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        ListItem::new(Span::styled(opt, style))
                    })
                    .collect();

                let list = List::new(items)
                    .highlight_style(
                        Style::default()
                            .add_modifier(Modifier::REVERSED)
                            .fg(Color::Cyan),
                    )
                    .highlight_symbol("> ");

                frame.render_stateful_widget(list, area, list_state);
            }
            FormField::Toggle {
                value,
                true_label,
                false_label,
            } => {
                let yes_style = if *value {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let no_style = if !*value {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };

                let line = Line::from(vec![
                    Span::styled(format!("[{true_label}]"), yes_style),
                    Span::raw(" / "),
                    Span::styled(format!("[{false_label}]"), no_style),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            FormField::PathInput {
                value,
                cursor_pos,
                placeholder,
                preview,
            } => {
                let input_area = Rect { height: 1, ..area };
                render_line_input(frame, input_area, value, *cursor_pos, placeholder, "", focused);

                if area.height > 1 {
                    let preview_area = Rect {
                        y: area.y + 1,
                        height: 1,
                        ..area
                    };
                    let preview_text = match preview {
                        Some(p) => Span::styled(
                            format!("  preview: {}", p.summary()),
                            Style::default().fg(Color::DarkGray),
                        ),
                        None => Span::styled("  no preview", Style::default().fg(Color::DarkGray)),
                    };
                    frame.render_widget(Paragraph::new(Line::from(preview_text)), preview_area);
                }
            }
        }
    }
}

/// Byte offset of the `char_pos`-th character, or the end of the string
fn byte_index(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map_or(value.len(), |(i, _)| i)
}

/// Shared single-line editing for text and path inputs.
///
/// `cursor_pos` counts characters, not bytes, so multi-byte input edits
/// cleanly.
fn edit_line(
    value: &mut String,
    cursor_pos: &mut usize,
    max_length: Option<usize>,
    key: KeyCode,
) -> bool {
    let char_count = value.chars().count();
    match key {
        KeyCode::Char(c) => {
            if max_length.map(|m| char_count < m).unwrap_or(true) {
                value.insert(byte_index(value, *cursor_pos), c);
                *cursor_pos += 1;
            }
            true
        }
        KeyCode::Backspace => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
                value.remove(byte_index(value, *cursor_pos));
            }
            true
        }
        KeyCode::Delete => {
            if *cursor_pos < char_count {
                value.remove(byte_index(value, *cursor_pos));
            }
            true
        }
        KeyCode::Left => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
            }
            true
        }
        KeyCode::Right => {
            if *cursor_pos < char_count {
                *cursor_pos += 1;
            }
            true
        }
        KeyCode::Home => {
            *cursor_pos = 0;
            true
        }
        KeyCode::End => {
            *cursor_pos = char_count;
            true
        }
        _ => false,
    }
}

fn render_line_input(
    frame: &mut Frame,
    area: Rect,
    value: &str,
    cursor_pos: usize,
    placeholder: &str,
    suffix: &str,
    focused: bool,
) {
    let content = if value.is_empty() && !focused {
        Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut text = value.to_string();
        if focused {
            text.insert(byte_index(&text, cursor_pos), '|');
        }
        Line::from(vec![
            Span::raw(text),
            Span::styled(suffix.to_string(), Style::default().fg(Color::DarkGray)),
        ])
    };

    let para = Paragraph::new(content).style(Style::default().fg(if focused {
        Color::White
    } else {
        Color::Gray
    }));
    frame.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_handles_chars() {
        let mut field = FormField::text("Company name");
        assert!(field.handle_key(KeyCode::Char('h')));
        assert!(field.handle_key(KeyCode::Char('i')));
        assert_eq!(field.value(), "hi");
    }

    #[test]
    fn test_text_input_handles_multibyte_chars() {
        let mut field = FormField::text("Company name");
        for c in "Müller".chars() {
            field.handle_key(KeyCode::Char(c));
        }
        field.handle_key(KeyCode::Char(' '));
        field.handle_key(KeyCode::Char('G'));
        assert_eq!(field.value(), "Müller G");

        field.handle_key(KeyCode::Backspace);
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "Müller");
    }

    #[test]
    fn test_cursor_moves_over_multibyte_chars() {
        let mut field = FormField::text("");
        field.set_value("café");

        // Cursor sits after the last character; step left past the 'é'
        field.handle_key(KeyCode::Left);
        field.handle_key(KeyCode::Left);
        field.handle_key(KeyCode::Char('f'));
        assert_eq!(field.value(), "caffé");

        // Delete consumes the duplicated 'f' under the cursor
        field.handle_key(KeyCode::Delete);
        assert_eq!(field.value(), "café");
        field.handle_key(KeyCode::End);
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "caf");
    }

    #[test]
    fn test_text_input_respects_max_length() {
        let mut field = FormField::text_with_max("code", 3);
        field.handle_key(KeyCode::Char('a'));
        field.handle_key(KeyCode::Char('b'));
        field.handle_key(KeyCode::Char('c'));
        field.handle_key(KeyCode::Char('d')); // Should be ignored
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn test_enum_select_navigation() {
        let mut field = FormField::select(&["light", "dark"]);
        assert_eq!(field.value(), "light");

        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "dark");

        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "dark");

        field.handle_key(KeyCode::Up);
        assert_eq!(field.value(), "light");
    }

    #[test]
    fn test_enum_set_value_ignores_unknown_option() {
        let mut field = FormField::select(&["light", "dark"]);
        field.set_value("dark");
        assert_eq!(field.value(), "dark");
        field.set_value("mauve");
        assert_eq!(field.value(), "dark");
    }

    #[test]
    fn test_toggle() {
        let mut field = FormField::toggle("Enabled", "Disabled");
        assert!(!field.bool_value());
        field.handle_key(KeyCode::Char(' '));
        assert!(field.bool_value());
        field.handle_key(KeyCode::Left);
        assert!(!field.bool_value());
    }

    #[test]
    fn test_path_input_edits_like_text() {
        let mut field = FormField::path("/path/to/logo.png");
        for c in "/tmp/a.png".chars() {
            field.handle_key(KeyCode::Char(c));
        }
        assert_eq!(field.value(), "/tmp/a.png");
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "/tmp/a.pn");
    }
}
