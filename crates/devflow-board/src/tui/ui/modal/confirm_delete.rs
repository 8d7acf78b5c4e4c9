/*
[INPUT]:  Key events, the task about to be deleted
[OUTPUT]: Delete confirmation modal
[POS]:    TUI UI modal - explicit confirmation before a remote delete
[UPDATE]: 2026-10-16 Add delete confirmation modal
*/

use devflow_adapter::{Task, TaskId};
use ratatui::crossterm::event::KeyCode;

use super::{Field, Modal, ModalAction, handle_modal_key};

pub(in crate::tui) struct ConfirmDeleteModal {
    task_id: TaskId,
    title: String,
    focus_index: usize,
}

impl ConfirmDeleteModal {
    pub(in crate::tui) fn new(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            title: task.title.clone(),
            // Cancel is focused so a stray Enter does not delete.
            focus_index: 1,
        }
    }

    pub(in crate::tui) fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        Modal {
            title: String::from("Delete Task"),
            prompt: Some(format!(
                "Delete \"{}\"? This cannot be undone. [y/n]",
                self.title
            )),
            message: None,
            focus_index: self.focus_index,
            fields: vec![
                Field::Button {
                    label: String::from("Delete"),
                    action: ModalAction::Submit,
                },
                Field::Button {
                    label: String::from("Cancel"),
                    action: ModalAction::Cancel,
                },
            ],
        }
    }

    pub(in crate::tui) fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => ModalAction::Submit,
            KeyCode::Char('n') | KeyCode::Char('N') => ModalAction::Cancel,
            _ => {
                let mut modal = self.to_modal();
                let action = handle_modal_key(&mut modal, key);
                self.focus_index = modal.focus_index;
                action
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::ui::modal::Field;
    use chrono::Utc;
    use devflow_adapter::{TaskPriority, TaskStatus};

    fn modal() -> ConfirmDeleteModal {
        ConfirmDeleteModal::new(&Task {
            id: TaskId::new("t-1"),
            title: "Old chore".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            user_id: "u".to_string(),
            created_at: Utc::now(),
            start_date: None,
            end_date: None,
            tags: Default::default(),
        })
    }

    #[test]
    fn enter_defaults_to_cancel() {
        let mut confirm = modal();
        assert_eq!(confirm.handle_key(KeyCode::Enter), ModalAction::Cancel);
    }

    #[test]
    fn shortcuts_and_buttons() {
        let mut confirm = modal();
        assert_eq!(confirm.handle_key(KeyCode::Char('y')), ModalAction::Submit);
        assert_eq!(confirm.handle_key(KeyCode::Tab), ModalAction::None);
        assert_eq!(confirm.handle_key(KeyCode::Enter), ModalAction::Submit);
        assert!(matches!(
            confirm.to_modal().fields.first(),
            Some(Field::Button { .. })
        ));
        assert_eq!(confirm.task_id(), &TaskId::new("t-1"));
    }
}
