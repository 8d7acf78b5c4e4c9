/*
[INPUT]:  Fetched task lists, created records, coordinator writes
[OUTPUT]: Ordered, duplicate-free task collection with a revision feed
[POS]:    Engine leaf - single source of truth for rendering
[UPDATE]: When views need new queries over the task set
*/

use std::collections::HashSet;

use devflow_adapter::{Task, TaskId, TaskStatus};
use tokio::sync::watch;

/// In-memory task collection, newest first, at most one entry per id.
///
/// Owned by a single writer. Every mutation bumps a revision published on a
/// watch channel so views can redraw on change.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    revision: watch::Sender<u64>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            tasks: Vec::new(),
            revision,
        }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.replace_all(tasks);
        store
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks with the given status, in list order.
    pub fn with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| task.status == status)
    }

    /// Replace everything. Sorted newest first; later duplicates of an id are dropped.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::new();
        let mut tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|task| seen.insert(task.id.clone()))
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.tasks = tasks;
        self.bump();
    }

    /// Add a record at the head. An existing record with the same id is replaced in place.
    pub fn insert_front(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            *existing = task;
        } else {
            self.tasks.insert(0, task);
        }
        self.bump();
    }

    /// Overwrite the record carrying `task.id`. Returns false when it is absent.
    pub fn put(&mut self, task: Task) -> bool {
        let Some(existing) = self.tasks.iter_mut().find(|existing| existing.id == task.id) else {
            return false;
        };
        if *existing != task {
            *existing = task;
            self.bump();
        }
        true
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| &task.id == id)?;
        let removed = self.tasks.remove(index);
        self.bump();
        Some(removed)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::task;

    #[test]
    fn replace_all_orders_newest_first_and_dedupes() {
        let store = TaskStore::from_tasks(vec![
            task("old", TaskStatus::Pending, 1),
            task("new", TaskStatus::Completed, 3),
            task("old", TaskStatus::Completed, 2),
        ]);

        let ids: Vec<_> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(store.get(&"old".into()).map(|t| t.status), Some(TaskStatus::Pending));
    }

    #[test]
    fn put_never_inserts() {
        let mut store = TaskStore::from_tasks(vec![task("a", TaskStatus::Pending, 1)]);
        assert!(!store.put(task("b", TaskStatus::Pending, 2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_front_keeps_ids_unique() {
        let mut store = TaskStore::from_tasks(vec![task("a", TaskStatus::Pending, 1)]);
        store.insert_front(task("b", TaskStatus::Pending, 2));
        store.insert_front(task("a", TaskStatus::Completed, 1));

        let ids: Vec<_> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(store.get(&"a".into()).map(|t| t.status), Some(TaskStatus::Completed));
    }

    #[test]
    fn revision_moves_on_every_change_only() {
        let mut store = TaskStore::new();
        let rx = store.subscribe();
        store.replace_all(vec![task("a", TaskStatus::Pending, 1)]);
        let after_replace = store.revision();

        assert!(store.put(task("a", TaskStatus::Pending, 1)));
        assert_eq!(store.revision(), after_replace);

        store.remove(&"a".into());
        assert_eq!(*rx.borrow(), after_replace + 1);
    }
}
