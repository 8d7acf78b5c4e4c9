/*
[INPUT]:  Modal state, fields, and key events
[OUTPUT]: Modal rendering output and modal action results
[POS]:    TUI UI modal module root
[UPDATE]: 2026-10-16 Task form and delete confirmation modals
[UPDATE]: 2026-10-17 Prompt and validation message lines; Shift+Tab and arrow navigation
*/

mod confirm_delete;
mod task_form;

pub(in crate::tui) use confirm_delete::ConfirmDeleteModal;
pub(in crate::tui) use task_form::{FormMode, TaskFormModal};

use ratatui::crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::runtime::border_style;

pub(in crate::tui) struct Modal {
    pub(super) title: String,
    /// Shown above the fields.
    pub(super) prompt: Option<String>,
    /// Validation feedback shown below the fields.
    pub(super) message: Option<String>,
    pub(super) focus_index: usize,
    pub(super) fields: Vec<Field>,
}

pub(in crate::tui) enum Field {
    TextInput {
        label: String,
        value: String,
    },
    Select {
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    Button {
        label: String,
        action: ModalAction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui) enum ModalAction {
    Submit,
    Cancel,
    None,
}

pub(in crate::tui) fn draw_modal(frame: &mut ratatui::Frame, area: Rect, modal: &Modal) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(modal.title.as_str());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(prompt) = &modal.prompt {
        lines.push(Line::from(prompt.as_str()));
        lines.push(Line::default());
    }

    lines.extend(modal.fields.iter().enumerate().map(|(index, field)| {
        let content = match field {
            Field::TextInput { label, value } => {
                let cursor = if index == modal.focus_index { "_" } else { "" };
                format!("{label}: {value}{cursor}")
            }
            Field::Select {
                label,
                options,
                selected,
            } => {
                let selected_value = options.get(*selected).map(String::as_str).unwrap_or("-");
                format!("{label}: < {selected_value} >")
            }
            Field::Button { label, .. } => format!("[{label}]"),
        };
        let style = if index == modal.focus_index {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        Line::from(Span::styled(content, style))
    }));

    if let Some(message) = &modal.message {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::LightRed),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

pub(in crate::tui) fn handle_modal_key(modal: &mut Modal, key: KeyCode) -> ModalAction {
    let field_count = modal.fields.len();
    match key {
        KeyCode::Esc => ModalAction::Cancel,
        KeyCode::Tab | KeyCode::Down => {
            if field_count > 0 {
                modal.focus_index = (modal.focus_index + 1) % field_count;
            }
            ModalAction::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            if field_count > 0 {
                modal.focus_index = (modal.focus_index + field_count - 1) % field_count;
            }
            ModalAction::None
        }
        KeyCode::Left => {
            if let Some(Field::Select {
                selected, options, ..
            }) = modal.fields.get_mut(modal.focus_index)
            {
                if !options.is_empty() {
                    *selected = selected.saturating_sub(1);
                }
            }
            ModalAction::None
        }
        KeyCode::Right => {
            if let Some(Field::Select {
                selected, options, ..
            }) = modal.fields.get_mut(modal.focus_index)
            {
                if *selected + 1 < options.len() {
                    *selected += 1;
                }
            }
            ModalAction::None
        }
        KeyCode::Backspace => {
            if let Some(Field::TextInput { value, .. }) = modal.fields.get_mut(modal.focus_index) {
                value.pop();
            }
            ModalAction::None
        }
        KeyCode::Char(ch) => {
            if let Some(Field::TextInput { value, .. }) = modal.fields.get_mut(modal.focus_index) {
                value.push(ch);
            }
            ModalAction::None
        }
        KeyCode::Enter => match modal.fields.get(modal.focus_index) {
            Some(Field::Button { action, .. }) => *action,
            Some(_) if field_count > 0 => {
                modal.focus_index = (modal.focus_index + 1) % field_count;
                ModalAction::None
            }
            _ => ModalAction::None,
        },
        _ => ModalAction::None,
    }
}
