/*
[INPUT]:  The dragged task, the drop target under the pointer, the task store
[OUTPUT]: A target status or "no change"
[POS]:    Engine core - pure drop resolution, never mutates the store
[UPDATE]: When new kinds of drop targets are introduced
*/

use std::fmt;

use devflow_adapter::{Task, TaskId, TaskStatus};

use crate::store::TaskStore;

/// Something a card can be dropped onto.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    Column(TaskStatus),
    Card(TaskId),
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Column(status) => write!(f, "column:{status}"),
            DropTarget::Card(id) => write!(f, "card:{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    NoChange,
    Move(TaskStatus),
}

impl Resolution {
    pub fn target(self) -> Option<TaskStatus> {
        match self {
            Resolution::NoChange => None,
            Resolution::Move(status) => Some(status),
        }
    }
}

/// Map a drop onto the status the dragged task should take.
///
/// Dropping on a card adopts that card's column. Same-column drops, drops on
/// the dragged card itself, unknown cards and drops outside any target all
/// resolve to `NoChange`.
pub fn resolve(store: &TaskStore, dragged: &Task, over: Option<&DropTarget>) -> Resolution {
    let target_status = match over {
        None => return Resolution::NoChange,
        Some(DropTarget::Column(status)) => *status,
        Some(DropTarget::Card(id)) if id == &dragged.id => return Resolution::NoChange,
        Some(DropTarget::Card(id)) => match store.get(id) {
            Some(card) => card.status,
            None => return Resolution::NoChange,
        },
    };

    if target_status == dragged.status {
        Resolution::NoChange
    } else {
        Resolution::Move(target_status)
    }
}
