/*
[INPUT]:  Key events, an optional task to prefill from
[OUTPUT]: Task form modal and the validated TaskDraft it produces
[POS]:    TUI UI modal - create / edit task form
[UPDATE]: 2026-10-16 Replace order-oriented form with the task form
*/

use devflow_adapter::{Task, TaskId, TaskPriority};
use devflow_board::TaskDraft;
use devflow_board::draft::{parse_schedule, split_tags};
use ratatui::crossterm::event::KeyCode;

use super::{Field, Modal, ModalAction, handle_modal_key};

const SCHEDULE_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(in crate::tui) enum FormMode {
    Create,
    Edit(TaskId),
}

pub(in crate::tui) struct TaskFormModal {
    mode: FormMode,
    title: String,
    description: String,
    priority_index: usize,
    start: String,
    end: String,
    tags: String,
    focus_index: usize,
    error: Option<String>,
}

impl TaskFormModal {
    pub(in crate::tui) fn create() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            priority_index: priority_index(TaskPriority::default()),
            start: String::new(),
            end: String::new(),
            tags: String::new(),
            focus_index: 0,
            error: None,
        }
    }

    pub(in crate::tui) fn edit(task: &Task) -> Self {
        let format = |value: Option<chrono::DateTime<chrono::Utc>>| {
            value
                .map(|instant| instant.format(SCHEDULE_FORMAT).to_string())
                .unwrap_or_default()
        };
        Self {
            mode: FormMode::Edit(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            priority_index: priority_index(task.priority),
            start: format(task.start_date),
            end: format(task.end_date),
            tags: task.tags.iter().cloned().collect::<Vec<_>>().join(", "),
            focus_index: 0,
            error: None,
        }
    }

    pub(in crate::tui) fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub(in crate::tui) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub(in crate::tui) fn to_modal(&self) -> Modal {
        let title = match self.mode {
            FormMode::Create => "New Task",
            FormMode::Edit(_) => "Edit Task",
        };
        Modal {
            title: title.to_string(),
            prompt: Some("Dates: 2026-03-01T09:30 or 2026-03-01. Tags: comma separated.".to_string()),
            message: self.error.clone(),
            focus_index: self.focus_index,
            fields: vec![
                Field::TextInput {
                    label: String::from("Title"),
                    value: self.title.clone(),
                },
                Field::TextInput {
                    label: String::from("Description"),
                    value: self.description.clone(),
                },
                Field::Select {
                    label: String::from("Priority"),
                    options: TaskPriority::ALL
                        .iter()
                        .map(|priority| priority.to_string())
                        .collect(),
                    selected: self.priority_index,
                },
                Field::TextInput {
                    label: String::from("Start"),
                    value: self.start.clone(),
                },
                Field::TextInput {
                    label: String::from("End"),
                    value: self.end.clone(),
                },
                Field::TextInput {
                    label: String::from("Tags"),
                    value: self.tags.clone(),
                },
                Field::Button {
                    label: String::from("Save"),
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
        let mut modal = self.to_modal();
        let action = handle_modal_key(&mut modal, key);
        self.apply_modal_state(&modal);
        action
    }

    /// Parse the form into a draft. Title checks happen in the coordinator.
    pub(in crate::tui) fn draft(&self) -> devflow_board::Result<TaskDraft> {
        Ok(TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: TaskPriority::ALL
                .get(self.priority_index)
                .copied()
                .unwrap_or_default(),
            start_date: parse_schedule("start", &self.start)?,
            end_date: parse_schedule("end", &self.end)?,
            tags: split_tags(&self.tags),
        })
    }

    fn apply_modal_state(&mut self, modal: &Modal) {
        self.focus_index = modal.focus_index;
        let text = |index: usize| match modal.fields.get(index) {
            Some(Field::TextInput { value, .. }) => Some(value.clone()),
            _ => None,
        };
        if let Some(value) = text(0) {
            self.title = value;
        }
        if let Some(value) = text(1) {
            self.description = value;
        }
        if let Some(Field::Select { selected, .. }) = modal.fields.get(2) {
            self.priority_index = *selected;
        }
        if let Some(value) = text(3) {
            self.start = value;
        }
        if let Some(value) = text(4) {
            self.end = value;
        }
        if let Some(value) = text(5) {
            self.tags = value;
        }
    }
}

fn priority_index(priority: TaskPriority) -> usize {
    TaskPriority::ALL
        .iter()
        .position(|candidate| *candidate == priority)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use devflow_board::BoardError;

    fn type_text(form: &mut TaskFormModal, text: &str) {
        for ch in text.chars() {
            form.handle_key(KeyCode::Char(ch));
        }
    }

    #[test]
    fn create_form_builds_a_draft() {
        let mut form = TaskFormModal::create();
        type_text(&mut form, "Write report");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Left);
        form.handle_key(KeyCode::Tab);
        type_text(&mut form, "2026-03-01T09:30");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Tab);
        type_text(&mut form, "work, urgent");

        let draft = form.draft().unwrap();
        assert_eq!(draft.title, "Write report");
        assert_eq!(draft.priority, TaskPriority::High);
        assert_eq!(
            draft.start_date,
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap())
        );
        assert_eq!(draft.end_date, None);
        assert_eq!(draft.tags, vec!["work", " urgent"]);
    }

    #[test]
    fn bad_dates_are_reported() {
        let mut form = TaskFormModal::create();
        for _ in 0..3 {
            form.handle_key(KeyCode::Tab);
        }
        type_text(&mut form, "tomorrow");
        assert!(matches!(form.draft(), Err(BoardError::Validation(_))));
    }

    #[test]
    fn edit_form_prefills_from_the_task() {
        let task = Task {
            id: TaskId::new("t-1"),
            title: "Call Ana".to_string(),
            description: String::new(),
            status: devflow_adapter::TaskStatus::Pending,
            priority: TaskPriority::Low,
            user_id: "u".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            start_date: Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()),
            end_date: None,
            tags: ["home".to_string()].into_iter().collect(),
        };
        let form = TaskFormModal::edit(&task);
        assert_eq!(form.mode(), &FormMode::Edit(TaskId::new("t-1")));

        let draft = form.draft().unwrap();
        assert_eq!(draft, TaskDraft::from_task(&task));
    }
}
