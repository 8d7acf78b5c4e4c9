/*
[INPUT]:  Crossterm key / mouse events and settled remote outcomes
[OUTPUT]: AppState changes, drag gestures and coordinator calls
[POS]:    TUI event routing
[UPDATE]: 2026-10-16 Keyboard and mouse drag-and-drop on the board
[UPDATE]: 2026-10-17 Route modal submissions to create / edit / delete
[UPDATE]: 2026-10-19 Mouse drags start on movement; a plain click only selects
*/

use devflow_adapter::TaskStatus;
use devflow_board::collision::{self, Point};
use devflow_board::presenter::column_title;
use devflow_board::{DropTarget, Resolution, Settled};
use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::app::{ActiveModal, AppState, Grab, Press, Tab};
use super::ui::modal::{ConfirmDeleteModal, FormMode, ModalAction, TaskFormModal};

/// Handles one terminal event.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) fn handle_event(app: &mut AppState, event: Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Mouse(mouse) => {
            handle_mouse_event(app, mouse);
            false
        }
        _ => false,
    }
}

/// Reflect a settled remote outcome in the view state.
pub(super) fn handle_settled(app: &mut AppState, settled: &Settled) {
    match settled {
        Settled::Created(task) => {
            app.focus_task(&task.id);
            app.status_message = format!("Created \"{}\"", task.title);
        }
        Settled::Refreshed { count } => {
            app.status_message = format!("{count} tasks loaded");
        }
        Settled::Deleted { .. } => {
            app.status_message = "Task deleted".to_string();
        }
        _ => {}
    }
}

fn handle_key_event(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if app.active_modal.is_some() {
        handle_modal_key_event(app, key.code);
        return false;
    }
    if !app.drag.is_idle() {
        return handle_drag_key(app, key.code);
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Board),
        KeyCode::Char('2') => app.set_tab(Tab::List),
        KeyCode::Char('3') => app.set_tab(Tab::Stats),
        KeyCode::Char('4') => app.set_tab(Tab::Logs),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Left | KeyCode::Char('h') if app.current_tab == Tab::Board => {
            app.focus_column(TaskStatus::Pending);
        }
        KeyCode::Right | KeyCode::Char('l') if app.current_tab == Tab::Board => {
            app.focus_column(TaskStatus::Completed);
        }
        KeyCode::Char(' ') if app.current_tab == Tab::Board => pick_up(app),
        KeyCode::Char('n') => {
            app.active_modal = Some(ActiveModal::TaskForm(TaskFormModal::create()));
        }
        KeyCode::Char('e') => open_edit(app),
        KeyCode::Char('d') => open_delete(app),
        KeyCode::Char('t') => toggle_selected(app),
        KeyCode::Char('f') => {
            if app.current_tab != Tab::List {
                app.set_tab(Tab::List);
            }
            app.cycle_filter();
        }
        KeyCode::Char('r') => {
            app.coordinator.request_refresh();
            app.status_message = "Refreshing...".to_string();
        }
        KeyCode::Char('x') => {
            app.coordinator.notices_mut().dismiss_latest();
        }
        _ => {}
    }
    false
}

fn handle_drag_key(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Left | KeyCode::Char('h') => {
            app.drag.hover(Some(DropTarget::Column(TaskStatus::Pending)));
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.drag.hover(Some(DropTarget::Column(TaskStatus::Completed)));
        }
        KeyCode::Char(' ') | KeyCode::Enter => finish_drop(app),
        KeyCode::Esc => {
            app.drag.cancel();
            app.grab = None;
            app.pointer = None;
            app.status_message = "Move cancelled".to_string();
        }
        _ => {}
    }
    false
}

fn handle_mouse_event(app: &mut AppState, mouse: MouseEvent) {
    if app.active_modal.is_some() || app.current_tab != Tab::Board {
        return;
    }
    let point = Point::new(i32::from(mouse.column), i32::from(mouse.row));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !app.drag.is_idle() {
                return;
            }
            let Some(task_id) = app.droppables.card_at(point) else {
                return;
            };
            app.focus_task(&task_id);
            let grab = app
                .droppables
                .rect_of(&DropTarget::Card(task_id.clone()))
                .map(|rect| Grab {
                    offset_x: point.x - rect.x,
                    offset_y: point.y - rect.y,
                    width: rect.width,
                    height: rect.height,
                });
            app.press = Some(Press {
                task_id,
                origin: point,
                grab,
            });
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.drag.is_idle() && !activate_press(app, point) {
                return;
            }
            app.pointer = Some(point);
            let dragged = app
                .grab
                .map_or(collision::Rect::point(point), |grab| grab.rect_at(point));
            let over = app.droppables.closest(dragged);
            app.drag.hover(over);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.press = None;
            if !app.drag.is_idle() {
                finish_drop(app);
            }
        }
        _ => {}
    }
}

/// Turn a held press into a drag once the pointer has moved off its cell.
fn activate_press(app: &mut AppState, point: Point) -> bool {
    let Some(press) = app.press.take() else {
        return false;
    };
    if !press.activates_at(point) {
        app.press = Some(press);
        return false;
    }
    if !app.drag.begin(app.coordinator.store(), &press.task_id) {
        return false;
    }
    app.grab = press.grab;
    true
}

fn pick_up(app: &mut AppState) {
    let Some(task_id) = app.selected_board_task() else {
        return;
    };
    if app.drag.begin(app.coordinator.store(), &task_id) {
        app.grab = None;
        app.pointer = None;
        app.status_message = "Moving: choose a column, Space drops, Esc cancels".to_string();
    }
}

fn finish_drop(app: &mut AppState) {
    let Some(release) = app.drag.release() else {
        return;
    };
    let resolution = app
        .coordinator
        .apply_drop(&release.task_id, release.over.as_ref());
    app.drag.end();
    app.grab = None;
    app.pointer = None;

    match resolution {
        Resolution::Move(status) => {
            app.focus_task(&release.task_id);
            app.status_message = format!("Moved to {}", column_title(status));
        }
        Resolution::NoChange => {
            app.status_message = "No change".to_string();
        }
    }
}

fn toggle_selected(app: &mut AppState) {
    let Some(task_id) = app.selected_task() else {
        return;
    };
    match app.coordinator.toggle(&task_id) {
        Ok(status) => {
            if app.current_tab == Tab::Board {
                app.focus_task(&task_id);
            }
            app.status_message = format!("Marked {status}");
        }
        Err(err) => app.status_message = format!("toggle failed: {err}"),
    }
}

fn open_edit(app: &mut AppState) {
    let Some(task) = app
        .selected_task()
        .and_then(|task_id| app.coordinator.store().get(&task_id).cloned())
    else {
        return;
    };
    app.active_modal = Some(ActiveModal::TaskForm(TaskFormModal::edit(&task)));
}

fn open_delete(app: &mut AppState) {
    let Some(task) = app
        .selected_task()
        .and_then(|task_id| app.coordinator.store().get(&task_id).cloned())
    else {
        return;
    };
    app.active_modal = Some(ActiveModal::ConfirmDelete(ConfirmDeleteModal::new(&task)));
}

fn handle_modal_key_event(app: &mut AppState, key: KeyCode) {
    let Some(modal) = app.active_modal.as_mut() else {
        return;
    };
    match modal {
        ActiveModal::TaskForm(form) => match form.handle_key(key) {
            ModalAction::Cancel => app.close_modal(),
            ModalAction::Submit => submit_task_form(app),
            ModalAction::None => {}
        },
        ActiveModal::ConfirmDelete(confirm) => match confirm.handle_key(key) {
            ModalAction::Cancel => app.close_modal(),
            ModalAction::Submit => {
                let task_id = confirm.task_id().clone();
                app.close_modal();
                match app.coordinator.delete(&task_id) {
                    Ok(()) => app.status_message = "Deleting...".to_string(),
                    Err(err) => app.status_message = format!("delete failed: {err}"),
                }
            }
            ModalAction::None => {}
        },
    }
}

fn submit_task_form(app: &mut AppState) {
    let Some(ActiveModal::TaskForm(form)) = app.active_modal.as_mut() else {
        return;
    };
    let draft = match form.draft() {
        Ok(draft) => draft,
        Err(err) => {
            form.set_error(err.to_string());
            return;
        }
    };

    let result = match form.mode() {
        FormMode::Create => app.coordinator.create(draft),
        FormMode::Edit(task_id) => app.coordinator.edit(task_id, draft),
    };
    match result {
        Ok(()) => {
            app.status_message = match form.mode() {
                FormMode::Create => "Creating task...".to_string(),
                FormMode::Edit(_) => "Task updated".to_string(),
            };
            app.active_modal = None;
        }
        Err(err) => form.set_error(err.to_string()),
    }
}
