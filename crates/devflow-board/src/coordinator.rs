/*
[INPUT]:  Status commits, drops, edits, creates, deletes, refreshes; remote outcomes
[OUTPUT]: Optimistic store writes, rollbacks, notices and settled results
[POS]:    Engine core - the only writer of the task store besides a full refetch
[UPDATE]: When mutation kinds or reconciliation rules change
[UPDATE]: 2026-10-12 Queued mutations apply optimistically at once; only the remote call waits
[UPDATE]: 2026-10-19 Background listings no longer undo writes settled after they were requested
*/

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use devflow_adapter::{DevflowError, Task, TaskBackend, TaskId, TaskPatch, TaskStatus};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::draft::TaskDraft;
use crate::error::{BoardError, Result};
use crate::notice::NoticeQueue;
use crate::resolver::{DropTarget, Resolution, resolve};
use crate::store::TaskStore;

/// One optimistic mutation: the patch and the record to restore if it fails.
#[derive(Debug, Clone)]
struct Mutation {
    seq: u64,
    patch: TaskPatch,
    snapshot: Task,
}

/// Per-task queue. Only `head` has a remote call in flight.
#[derive(Debug)]
struct InFlight {
    head: Mutation,
    queued: VecDeque<Mutation>,
}

/// Completion of a spawned remote call, applied by `settle`.
#[derive(Debug)]
pub struct Outcome {
    kind: OutcomeKind,
}

#[derive(Debug)]
enum OutcomeKind {
    Updated {
        task_id: TaskId,
        seq: u64,
        result: std::result::Result<Task, DevflowError>,
    },
    Created(std::result::Result<Task, DevflowError>),
    Deleted {
        task_id: TaskId,
        result: std::result::Result<(), DevflowError>,
    },
    Listed {
        generation: u64,
        result: std::result::Result<Vec<Task>, DevflowError>,
    },
}

/// What applying an outcome did.
#[derive(Debug)]
pub enum Settled {
    /// The remote accepted the head mutation.
    Confirmed { task_id: TaskId },
    /// The remote rejected the head mutation; the store was reverted.
    RolledBack { task_id: TaskId, error: DevflowError },
    /// The task left the store while the call was in flight.
    Discarded { task_id: TaskId },
    Created(Task),
    CreateFailed { error: DevflowError },
    Deleted { task_id: TaskId },
    DeleteFailed { task_id: TaskId, error: DevflowError },
    Refreshed { count: usize },
    RefreshFailed { error: DevflowError },
}

impl Settled {
    pub fn error(&self) -> Option<&DevflowError> {
        match self {
            Settled::RolledBack { error, .. }
            | Settled::CreateFailed { error }
            | Settled::DeleteFailed { error, .. }
            | Settled::RefreshFailed { error } => Some(error),
            _ => None,
        }
    }
}

/// Optimistic update coordinator.
///
/// Owned by the UI loop. Remote calls run on spawned tasks that hold only a
/// backend handle; their outcomes come back through an internal channel and
/// are applied with `settle`.
pub struct Coordinator {
    store: TaskStore,
    backend: Arc<dyn TaskBackend>,
    in_flight: HashMap<TaskId, InFlight>,
    deleting: HashSet<TaskId>,
    /// Sequence number of the last settled write per task, for discarding stale listings.
    settled_at: HashMap<TaskId, u64>,
    /// Generations of listings requested but not applied yet.
    pending_listings: Vec<u64>,
    notices: NoticeQueue,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    outstanding: usize,
    next_seq: u64,
}

impl Coordinator {
    pub fn new(backend: Arc<dyn TaskBackend>) -> Self {
        Self::with_store(backend, TaskStore::new())
    }

    pub fn with_store(backend: Arc<dyn TaskBackend>, store: TaskStore) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            store,
            backend,
            in_flight: HashMap::new(),
            deleting: HashSet::new(),
            settled_at: HashMap::new(),
            pending_listings: Vec::new(),
            notices: NoticeQueue::new(),
            outcome_tx,
            outcome_rx,
            outstanding: 0,
            next_seq: 0,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeQueue {
        &mut self.notices
    }

    /// True while a remote write for `task_id` is in flight or queued.
    pub fn is_syncing(&self, task_id: &TaskId) -> bool {
        self.in_flight.contains_key(task_id) || self.deleting.contains(task_id)
    }

    /// Remote calls whose outcome has not been settled yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Change a task's status optimistically.
    ///
    /// Returns `Ok(false)` when the task already has `status`.
    pub fn commit(&mut self, task_id: &TaskId, status: TaskStatus) -> Result<bool> {
        let current = self
            .store
            .get(task_id)
            .ok_or_else(|| BoardError::NotFound(task_id.clone()))?;
        if current.status == status {
            debug!(task_id = %task_id, ?status, "Commit skipped, status unchanged");
            return Ok(false);
        }

        info!(task_id = %task_id, from = ?current.status, to = ?status, "Committing status change");
        self.enqueue(task_id, TaskPatch::status(status))?;
        Ok(true)
    }

    /// Resolve a drop and commit the result. Unknown tasks are ignored.
    pub fn apply_drop(&mut self, task_id: &TaskId, over: Option<&DropTarget>) -> Resolution {
        let Some(dragged) = self.store.get(task_id) else {
            debug!(task_id = %task_id, "Drop for unknown task ignored");
            return Resolution::NoChange;
        };

        let resolution = resolve(&self.store, dragged, over);
        debug!(task_id = %task_id, over = ?over, ?resolution, "Drop resolved");
        if let Resolution::Move(status) = resolution {
            if let Err(err) = self.commit(task_id, status) {
                debug!(task_id = %task_id, error = %err, "Drop commit ignored");
            }
        }
        resolution
    }

    /// Flip between pending and completed.
    pub fn toggle(&mut self, task_id: &TaskId) -> Result<TaskStatus> {
        let status = self
            .store
            .get(task_id)
            .map(|task| task.status.toggled())
            .ok_or_else(|| BoardError::NotFound(task_id.clone()))?;
        self.commit(task_id, status)?;
        Ok(status)
    }

    /// Optimistic field edit through the same per-task queue as status changes.
    pub fn edit(&mut self, task_id: &TaskId, draft: TaskDraft) -> Result<()> {
        let patch = draft.into_patch()?;
        if !self.store.contains(task_id) {
            return Err(BoardError::NotFound(task_id.clone()));
        }

        info!(task_id = %task_id, "Committing edit");
        self.enqueue(task_id, patch)
    }

    /// Validate and send a create. The record appears once the backend returns it.
    pub fn create(&mut self, draft: TaskDraft) -> Result<()> {
        let new_task = draft.into_new_task()?;
        info!(title = %new_task.title, "Creating task");

        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            OutcomeKind::Created(backend.create_task(&new_task).await)
        });
        Ok(())
    }

    /// Send a delete. The row is removed only after the backend confirms.
    ///
    /// Callers are expected to have asked the user for confirmation.
    pub fn delete(&mut self, task_id: &TaskId) -> Result<()> {
        if !self.store.contains(task_id) {
            return Err(BoardError::NotFound(task_id.clone()));
        }
        if !self.deleting.insert(task_id.clone()) {
            debug!(task_id = %task_id, "Delete already in flight");
            return Ok(());
        }

        info!(task_id = %task_id, "Deleting task");
        let backend = Arc::clone(&self.backend);
        let task_id = task_id.clone();
        self.spawn(async move {
            let result = backend.delete_task(&task_id).await;
            OutcomeKind::Deleted { task_id, result }
        });
        Ok(())
    }

    /// Refetch in the background; the result is applied by `settle`.
    ///
    /// Writes settled after the request win over the fetched records.
    pub fn request_refresh(&mut self) {
        let generation = self.next_seq;
        debug!(generation, "Refresh requested");
        self.pending_listings.push(generation);
        let backend = Arc::clone(&self.backend);
        self.spawn(async move {
            OutcomeKind::Listed {
                generation,
                result: backend.list_tasks().await,
            }
        });
    }

    /// Refetch and apply right away.
    pub async fn refresh(&mut self) -> Result<usize> {
        let generation = self.next_seq;
        let tasks = self.backend.list_tasks().await?;
        Ok(self.apply_listing(generation, tasks))
    }

    /// Wait for the next remote outcome.
    pub async fn recv_outcome(&mut self) -> Option<Outcome> {
        self.outcome_rx.recv().await
    }

    /// Wait for and apply one outcome. `None` when nothing is outstanding.
    pub async fn settle_next(&mut self) -> Option<Settled> {
        if self.outstanding == 0 {
            return None;
        }
        let outcome = self.outcome_rx.recv().await?;
        Some(self.settle(outcome))
    }

    /// Settle outcomes until no remote call is outstanding, including queued follow-ups.
    pub async fn drain(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Some(result) = self.settle_next().await {
            settled.push(result);
        }
        settled
    }

    /// Apply a remote outcome to the store.
    pub fn settle(&mut self, outcome: Outcome) -> Settled {
        self.outstanding = self.outstanding.saturating_sub(1);
        match outcome.kind {
            OutcomeKind::Updated {
                task_id,
                seq,
                result,
            } => self.settle_update(task_id, seq, result),
            OutcomeKind::Created(result) => self.settle_create(result),
            OutcomeKind::Deleted { task_id, result } => self.settle_delete(task_id, result),
            OutcomeKind::Listed {
                generation,
                result: Ok(tasks),
            } => {
                let count = self.apply_listing(generation, tasks);
                self.finish_listing(generation);
                Settled::Refreshed { count }
            }
            OutcomeKind::Listed {
                generation,
                result: Err(error),
            } => {
                warn!(error = %error, "Refresh failed");
                self.finish_listing(generation);
                self.notices.error(failure_message("Could not refresh tasks", &error));
                Settled::RefreshFailed { error }
            }
        }
    }

    fn enqueue(&mut self, task_id: &TaskId, patch: TaskPatch) -> Result<()> {
        let snapshot = self
            .store
            .get(task_id)
            .cloned()
            .ok_or_else(|| BoardError::NotFound(task_id.clone()))?;

        self.store.put(patch.applied(&snapshot));

        self.next_seq += 1;
        let mutation = Mutation {
            seq: self.next_seq,
            patch,
            snapshot,
        };

        match self.in_flight.get_mut(task_id) {
            Some(entry) => {
                debug!(task_id = %task_id, seq = mutation.seq, depth = entry.queued.len() + 1, "Mutation queued");
                entry.queued.push_back(mutation);
            }
            None => {
                self.dispatch(task_id, &mutation);
                self.in_flight.insert(
                    task_id.clone(),
                    InFlight {
                        head: mutation,
                        queued: VecDeque::new(),
                    },
                );
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, task_id: &TaskId, mutation: &Mutation) {
        debug!(task_id = %task_id, seq = mutation.seq, "Dispatching update");
        let backend = Arc::clone(&self.backend);
        let task_id = task_id.clone();
        let seq = mutation.seq;
        let patch = mutation.patch.clone();
        self.spawn(async move {
            let result = backend.update_task(&task_id, &patch).await;
            OutcomeKind::Updated {
                task_id,
                seq,
                result,
            }
        });
    }

    fn spawn<F>(&mut self, call: F)
    where
        F: Future<Output = OutcomeKind> + Send + 'static,
    {
        self.outstanding += 1;
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let kind = call.await;
            // The receiving side may be gone during shutdown.
            let _ = tx.send(Outcome { kind });
        });
    }

    fn settle_update(
        &mut self,
        task_id: TaskId,
        seq: u64,
        result: std::result::Result<Task, DevflowError>,
    ) -> Settled {
        let Some(mut entry) = self.in_flight.remove(&task_id) else {
            debug!(task_id = %task_id, seq, "Completion for untracked task discarded");
            return Settled::Discarded { task_id };
        };
        if entry.head.seq != seq {
            debug!(task_id = %task_id, seq, head = entry.head.seq, "Stale completion discarded");
            self.in_flight.insert(task_id.clone(), entry);
            return Settled::Discarded { task_id };
        }
        if !self.store.contains(&task_id) {
            debug!(task_id = %task_id, seq, "Task left the store, completion discarded");
            return Settled::Discarded { task_id };
        }
        self.mark_settled(&task_id);

        match result {
            Ok(server) => {
                debug!(task_id = %task_id, seq, "Update confirmed");
                match entry.queued.pop_front() {
                    Some(mut next) => {
                        next.snapshot = server;
                        self.dispatch(&task_id, &next);
                        entry.head = next;
                        self.in_flight.insert(task_id.clone(), entry);
                    }
                    None => {
                        self.store.put(server);
                    }
                }
                Settled::Confirmed { task_id }
            }
            Err(error) => {
                warn!(task_id = %task_id, seq, error = %error, "Update failed, rolling back");
                let title = entry.head.snapshot.title.clone();

                match entry.queued.pop_front() {
                    None => {
                        self.store.put(entry.head.snapshot);
                    }
                    Some(mut next) => {
                        let mut visible = entry.head.snapshot.clone();
                        next.patch.apply_to(&mut visible);
                        for later in &entry.queued {
                            later.patch.apply_to(&mut visible);
                        }
                        self.store.put(visible);

                        next.snapshot = entry.head.snapshot;
                        self.dispatch(&task_id, &next);
                        self.in_flight.insert(
                            task_id.clone(),
                            InFlight {
                                head: next,
                                queued: entry.queued,
                            },
                        );
                    }
                }

                self.notices.error(failure_message(
                    &format!("Could not update \"{title}\", change reverted"),
                    &error,
                ));
                Settled::RolledBack { task_id, error }
            }
        }
    }

    fn settle_create(&mut self, result: std::result::Result<Task, DevflowError>) -> Settled {
        match result {
            Ok(task) => {
                info!(task_id = %task.id, "Task created");
                self.notices.info(format!("Created \"{}\"", task.title));
                self.mark_settled(&task.id);
                self.store.insert_front(task.clone());
                Settled::Created(task)
            }
            Err(error) => {
                warn!(error = %error, "Create failed");
                self.notices.error(failure_message("Could not create task", &error));
                Settled::CreateFailed { error }
            }
        }
    }

    fn settle_delete(
        &mut self,
        task_id: TaskId,
        result: std::result::Result<(), DevflowError>,
    ) -> Settled {
        self.deleting.remove(&task_id);
        match result {
            Ok(()) => {
                self.remove_local(&task_id, "Deleted");
                Settled::Deleted { task_id }
            }
            Err(error) if error.is_not_found() => {
                info!(task_id = %task_id, "Task was already gone remotely");
                self.remove_local(&task_id, "Already deleted");
                Settled::Deleted { task_id }
            }
            Err(error) => {
                warn!(task_id = %task_id, error = %error, "Delete failed");
                let title = self
                    .store
                    .get(&task_id)
                    .map(|task| task.title.clone())
                    .unwrap_or_else(|| task_id.to_string());
                self.notices.error(failure_message(
                    &format!("Could not delete \"{title}\""),
                    &error,
                ));
                Settled::DeleteFailed { task_id, error }
            }
        }
    }

    fn remove_local(&mut self, task_id: &TaskId, verb: &str) {
        self.mark_settled(task_id);
        self.in_flight.remove(task_id);
        if let Some(task) = self.store.remove(task_id) {
            info!(task_id = %task_id, "Task removed");
            self.notices.info(format!("{verb} \"{}\"", task.title));
        }
    }

    /// Remember that `task_id` changed after any listing still on its way.
    fn mark_settled(&mut self, task_id: &TaskId) {
        if self.pending_listings.is_empty() {
            return;
        }
        self.next_seq += 1;
        self.settled_at.insert(task_id.clone(), self.next_seq);
    }

    fn finish_listing(&mut self, generation: u64) {
        if let Some(index) = self.pending_listings.iter().position(|g| *g == generation) {
            self.pending_listings.swap_remove(index);
        }
        match self.pending_listings.iter().min().copied() {
            Some(oldest) => self.settled_at.retain(|_, seq| *seq > oldest),
            None => self.settled_at.clear(),
        }
    }

    /// Replace the store with a fetched list, keeping in-flight edits visible.
    ///
    /// `generation` is the sequence number current when the list was requested.
    /// Tasks whose writes settled after that keep their local record, or stay
    /// gone if they were deleted. Rollback points of other tracked mutations are
    /// rebased onto the fetched record.
    fn apply_listing(&mut self, generation: u64, tasks: Vec<Task>) -> usize {
        let newer: HashSet<TaskId> = self
            .settled_at
            .iter()
            .filter(|(_, seq)| **seq > generation)
            .map(|(task_id, _)| task_id.clone())
            .collect();

        let mut listed: Vec<Task> = tasks
            .into_iter()
            .filter_map(|task| {
                if newer.contains(&task.id) {
                    debug!(task_id = %task.id, generation, "Keeping record settled after the refetch began");
                    self.store.get(&task.id).cloned()
                } else {
                    Some(task)
                }
            })
            .collect();
        let known: HashSet<TaskId> = listed.iter().map(|task| task.id.clone()).collect();
        listed.extend(
            self.store
                .tasks()
                .iter()
                .filter(|task| newer.contains(&task.id) && !known.contains(&task.id))
                .cloned(),
        );

        let present: HashSet<TaskId> = listed.iter().map(|task| task.id.clone()).collect();
        self.in_flight.retain(|task_id, _| {
            let keep = present.contains(task_id);
            if !keep {
                debug!(task_id = %task_id, "Untracking mutation for task missing from refetch");
            }
            keep
        });

        for task in &mut listed {
            if newer.contains(&task.id) {
                continue;
            }
            if let Some(entry) = self.in_flight.get_mut(&task.id) {
                entry.head.snapshot = task.clone();
                entry.head.patch.apply_to(task);
                for later in &entry.queued {
                    later.patch.apply_to(task);
                }
            }
        }

        let count = listed.len();
        self.store.replace_all(listed);
        info!(count, generation, kept = newer.len(), in_flight = self.in_flight.len(), "Store refreshed");
        count
    }
}

fn failure_message(context: &str, error: &DevflowError) -> String {
    if error.is_auth_error() {
        format!("{context}: session expired, sign in again (devflow login)")
    } else {
        format!("{context}: {error}")
    }
}
