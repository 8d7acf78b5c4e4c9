/*
[INPUT]:  Coordinator, log buffer, UI settings
[OUTPUT]: AppState shared by the event handlers and renderers
[POS]:    TUI app state - tabs, selections, drag session, droppable regions, modal
[UPDATE]: 2026-10-16 Track the pointer and grab offset for mouse drags
[UPDATE]: 2026-10-17 Keep board and list selections apart
[UPDATE]: 2026-10-19 Hold a mouse press until the pointer moves before dragging
*/

use devflow_adapter::{TaskId, TaskStatus};
use devflow_board::collision::{DroppableRegistry, Point, Rect};
use devflow_board::config::DefaultView;
use devflow_board::presenter::{ListFilter, filtered};
use devflow_board::{Coordinator, DragTracker};
use ratatui::widgets::ListState;

use crate::tui::LogBufferHandle;
use crate::tui::ui::modal::{ConfirmDeleteModal, TaskFormModal};

pub(super) enum ActiveModal {
    TaskForm(TaskFormModal),
    ConfirmDelete(ConfirmDeleteModal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tab {
    Board,
    List,
    Stats,
    Logs,
}

impl Tab {
    pub(super) const ALL: [Tab; 4] = [Tab::Board, Tab::List, Tab::Stats, Tab::Logs];

    pub(super) fn title(self) -> &'static str {
        match self {
            Tab::Board => "Board",
            Tab::List => "List",
            Tab::Stats => "Stats",
            Tab::Logs => "Logs",
        }
    }

    pub(super) fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }
}

impl From<DefaultView> for Tab {
    fn from(view: DefaultView) -> Self {
        match view {
            DefaultView::Board => Tab::Board,
            DefaultView::List => Tab::List,
            DefaultView::Stats => Tab::Stats,
        }
    }
}

/// Where a mouse drag grabbed the card, relative to its top-left corner.
#[derive(Debug, Clone, Copy)]
pub(super) struct Grab {
    pub(super) offset_x: i32,
    pub(super) offset_y: i32,
    pub(super) width: u32,
    pub(super) height: u32,
}

impl Grab {
    pub(super) fn rect_at(&self, pointer: Point) -> Rect {
        Rect::new(
            pointer.x - self.offset_x,
            pointer.y - self.offset_y,
            self.width,
            self.height,
        )
    }
}

/// Left button held on a card that has not moved far enough to start a drag.
#[derive(Debug, Clone)]
pub(super) struct Press {
    pub(super) task_id: TaskId,
    pub(super) origin: Point,
    pub(super) grab: Option<Grab>,
}

impl Press {
    /// Cells the pointer must travel before the press becomes a drag.
    pub(super) const ACTIVATION_DISTANCE: i32 = 1;

    pub(super) fn activates_at(&self, point: Point) -> bool {
        let moved = (point.x - self.origin.x)
            .abs()
            .max((point.y - self.origin.y).abs());
        moved >= Self::ACTIVATION_DISTANCE
    }
}

pub(super) struct AppState {
    pub(super) coordinator: Coordinator,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) current_tab: Tab,
    /// Focused board column.
    pub(super) board_column: TaskStatus,
    /// Selected row per board column, indexed like `TaskStatus::ALL`.
    pub(super) board_rows: [usize; 2],
    pub(super) list_state: ListState,
    pub(super) filter: ListFilter,
    pub(super) drag: DragTracker,
    pub(super) droppables: DroppableRegistry,
    pub(super) pointer: Option<Point>,
    pub(super) grab: Option<Grab>,
    pub(super) press: Option<Press>,
    pub(super) active_modal: Option<ActiveModal>,
    pub(super) status_message: String,
}

impl AppState {
    pub(super) fn new(coordinator: Coordinator, log_buffer: LogBufferHandle, tab: Tab) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            coordinator,
            log_buffer,
            current_tab: tab,
            board_column: TaskStatus::Pending,
            board_rows: [0, 0],
            list_state,
            filter: ListFilter::All,
            drag: DragTracker::new(),
            droppables: DroppableRegistry::new(),
            pointer: None,
            grab: None,
            press: None,
            active_modal: None,
            status_message: "Loading tasks...".to_string(),
        }
    }

    pub(super) fn next_tab(&mut self) {
        let next = (self.current_tab.index() + 1) % Tab::ALL.len();
        self.set_tab(Tab::ALL[next]);
    }

    pub(super) fn set_tab(&mut self, tab: Tab) {
        if tab != Tab::Board {
            self.press = None;
        }
        if tab != Tab::Board && self.drag.cancel() {
            self.grab = None;
        }
        self.current_tab = tab;
    }

    pub(super) fn close_modal(&mut self) {
        self.active_modal = None;
    }

    pub(super) fn column_index(status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => 0,
            TaskStatus::Completed => 1,
        }
    }

    fn column_ids(&self, status: TaskStatus) -> Vec<TaskId> {
        self.coordinator
            .store()
            .with_status(status)
            .map(|task| task.id.clone())
            .collect()
    }

    fn list_ids(&self) -> Vec<TaskId> {
        filtered(self.coordinator.store(), self.filter)
            .into_iter()
            .map(|task| task.id.clone())
            .collect()
    }

    pub(super) fn selected_board_task(&self) -> Option<TaskId> {
        let row = self.board_rows[Self::column_index(self.board_column)];
        self.column_ids(self.board_column).get(row).cloned()
    }

    pub(super) fn selected_list_task(&self) -> Option<TaskId> {
        let row = self.list_state.selected()?;
        self.list_ids().get(row).cloned()
    }

    /// The task the action keys apply to on the current tab.
    pub(super) fn selected_task(&self) -> Option<TaskId> {
        match self.current_tab {
            Tab::Board => self.selected_board_task(),
            Tab::List => self.selected_list_task(),
            Tab::Stats | Tab::Logs => None,
        }
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        match self.current_tab {
            Tab::Board => {
                let len = self.column_ids(self.board_column).len();
                let row = &mut self.board_rows[Self::column_index(self.board_column)];
                *row = step(*row, delta, len);
            }
            Tab::List => {
                let len = self.list_ids().len();
                let current = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(step(current, delta, len)));
            }
            Tab::Stats | Tab::Logs => {}
        }
    }

    pub(super) fn focus_column(&mut self, status: TaskStatus) {
        self.board_column = status;
    }

    /// Focus the column holding `task_id` and select it there.
    pub(super) fn focus_task(&mut self, task_id: &TaskId) {
        let Some(task) = self.coordinator.store().get(task_id) else {
            return;
        };
        let status = task.status;
        if let Some(row) = self.column_ids(status).iter().position(|id| id == task_id) {
            self.board_column = status;
            self.board_rows[Self::column_index(status)] = row;
        }
    }

    /// Keep selections inside their lists after the store changed.
    pub(super) fn clamp_selection(&mut self) {
        for status in TaskStatus::ALL {
            let len = self.column_ids(status).len();
            let row = &mut self.board_rows[Self::column_index(status)];
            *row = (*row).min(len.saturating_sub(1));
        }

        let len = self.list_ids().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(selected) if selected >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    pub(super) fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.list_state.select(Some(0));
        self.clamp_selection();
        self.status_message = format!("Filter: {}", self.filter);
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_the_list() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(1, 1, 3), 2);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(step(5, 1, 0), 0);
    }

    #[test]
    fn grab_keeps_the_pointer_offset() {
        let grab = Grab {
            offset_x: 3,
            offset_y: 1,
            width: 20,
            height: 4,
        };
        assert_eq!(grab.rect_at(Point::new(10, 10)), Rect::new(7, 9, 20, 4));
    }

    #[test]
    fn press_activates_once_the_pointer_leaves_its_cell() {
        let press = Press {
            task_id: TaskId::new("a"),
            origin: Point::new(5, 2),
            grab: None,
        };
        assert!(!press.activates_at(Point::new(5, 2)));
        assert!(press.activates_at(Point::new(6, 2)));
        assert!(press.activates_at(Point::new(5, 1)));
        assert!(press.activates_at(Point::new(45, 2)));
    }

    #[test]
    fn tabs_cycle_in_order() {
        assert_eq!(Tab::Logs.index(), 3);
        assert_eq!(Tab::from(DefaultView::Stats), Tab::Stats);
    }
}
