/*
[INPUT]:  Pointer / keyboard drag gestures
[OUTPUT]: The active dragged task, its hover target, and the drop hand-off
[POS]:    Engine core - drag session state machine (render feedback only)
[UPDATE]: When drag gestures gain new phases
*/

use devflow_adapter::{Task, TaskId};

use crate::resolver::DropTarget;
use crate::store::TaskStore;

/// Drag lifecycle: `Idle -> Dragging -> Resolving -> Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        task_id: TaskId,
        over: Option<DropTarget>,
    },
    /// Released; the drop is being resolved and committed.
    Resolving { task_id: TaskId },
}

impl DragState {
    pub fn state_name(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Dragging { .. } => "dragging",
            DragState::Resolving { .. } => "resolving",
        }
    }
}

/// What a release hands to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub task_id: TaskId,
    pub over: Option<DropTarget>,
}

#[derive(Debug, Default)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Start dragging `task_id`. Ignored while another drag is active or when
    /// the task is not in the store. Returns whether a drag started.
    pub fn begin(&mut self, store: &TaskStore, task_id: &TaskId) -> bool {
        if !self.is_idle() {
            tracing::debug!(task_id = %task_id, state = self.state.state_name(), "Drag already active");
            return false;
        }
        if !store.contains(task_id) {
            tracing::debug!(task_id = %task_id, "Drag on unknown task ignored");
            return false;
        }

        tracing::debug!(task_id = %task_id, "Drag started");
        self.state = DragState::Dragging {
            task_id: task_id.clone(),
            over: None,
        };
        true
    }

    /// Record the current hover target. Only meaningful while dragging.
    pub fn hover(&mut self, target: Option<DropTarget>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    /// `Dragging -> Resolving`, handing back the task and its last hover target.
    pub fn release(&mut self) -> Option<Release> {
        let DragState::Dragging { task_id, over } = &self.state else {
            return None;
        };

        let release = Release {
            task_id: task_id.clone(),
            over: over.clone(),
        };
        self.state = DragState::Resolving {
            task_id: release.task_id.clone(),
        };
        Some(release)
    }

    /// Back to `Idle`, whatever the current state.
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }

    /// Abandon the drag without dropping. Returns whether a drag was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.is_idle();
        if was_active {
            tracing::debug!(state = self.state.state_name(), "Drag cancelled");
        }
        self.end();
        was_active
    }

    pub fn active(&self) -> Option<&TaskId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { task_id, .. } | DragState::Resolving { task_id } => Some(task_id),
        }
    }

    pub fn hovered(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            _ => None,
        }
    }

    /// The task to draw in the ghost layer while dragging.
    pub fn overlay<'a>(&self, store: &'a TaskStore) -> Option<&'a Task> {
        match &self.state {
            DragState::Dragging { task_id, .. } => store.get(task_id),
            _ => None,
        }
    }
}
