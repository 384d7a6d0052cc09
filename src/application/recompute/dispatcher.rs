//! RecomputeDispatcher - coalescing scheduler for group recomputes.
//!
//! Producers call the `on_*` entry points and return immediately; a bounded
//! pool of workers drains the queue. Each group has at most one job queued
//! or running at a time:
//!
//! - no slot: the group is queued and a slot is created as `Queued`
//! - `Queued`: the pending job has not read anything yet, so the event is
//!   absorbed
//! - `Running`: the slot is marked dirty and the running job re-runs once
//!   it finishes, so the event is still observed

use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, Notify, OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinHandle, JoinSet};

use crate::domain::foundation::{DomainError, ErrorCode, GroupId, UserId};
use crate::domain::group::GroupCharacteristicProfile;
use crate::ports::GroupDirectory;

use super::GroupRecomputer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Queued,
    Running { dirty: bool },
}

/// What happened to a recompute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// A new job was queued.
    Scheduled,
    /// Absorbed by a job that is already queued or running.
    Coalesced,
}

/// Counters since start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    pub scheduled: u64,
    pub coalesced: u64,
    pub executed: u64,
    pub failed: u64,
    pub panicked: u64,
    /// Groups with a job queued or running right now.
    pub pending_groups: usize,
}

struct State {
    slots: HashMap<GroupId, Slot>,
    sender: Option<mpsc::UnboundedSender<GroupId>>,
}

#[derive(Default)]
struct Counters {
    scheduled: AtomicU64,
    coalesced: AtomicU64,
    executed: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
}

struct Inner {
    recomputer: Arc<dyn GroupRecomputer>,
    directory: Arc<dyn GroupDirectory>,
    state: Mutex<State>,
    counters: Counters,
    idle: Notify,
    queue_task: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_running(&self, group_id: GroupId) {
        self.state()
            .slots
            .insert(group_id, Slot::Running { dirty: false });
    }

    /// Returns true when the job must run again.
    fn finish_run(&self, group_id: GroupId) -> bool {
        let mut state = self.state();
        if let Some(Slot::Running { dirty: true }) = state.slots.get(&group_id) {
            return true;
        }
        state.slots.remove(&group_id);
        if state.slots.is_empty() {
            self.idle.notify_waiters();
        }
        false
    }
}

/// Handle to the recompute worker pool. Cheap to clone.
#[derive(Clone)]
pub struct RecomputeDispatcher {
    inner: Arc<Inner>,
}

impl RecomputeDispatcher {
    /// Spawns the queue loop on the current runtime.
    pub fn start(
        recomputer: Arc<dyn GroupRecomputer>,
        directory: Arc<dyn GroupDirectory>,
        worker_count: usize,
    ) -> Self {
        let worker_count = worker_count.max(1);
        let (sender, receiver) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            recomputer,
            directory,
            state: Mutex::new(State {
                slots: HashMap::new(),
                sender: Some(sender),
            }),
            counters: Counters::default(),
            idle: Notify::new(),
            queue_task: Mutex::new(None),
        });

        let handle = tokio::spawn(run_queue(Arc::clone(&inner), receiver, worker_count));
        *inner
            .queue_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        tracing::info!(worker_count, "recompute dispatcher started");
        Self { inner }
    }

    // === Event entry points ===

    /// Fans a profile change out to every group the user belongs to.
    /// Returns the number of groups affected.
    pub async fn on_profile_updated(&self, user_id: &UserId) -> Result<usize, DomainError> {
        self.ensure_open()?;
        let groups = self.inner.directory.groups_for_user(user_id).await?;
        for group_id in &groups {
            self.enqueue(*group_id)?;
        }
        tracing::debug!(user_id = %user_id, groups = groups.len(), "profile update fanned out");
        Ok(groups.len())
    }

    /// Seeds the new group's profile from its creator.
    ///
    /// Nothing is queued. The seed is the group's state at creation, and the
    /// first membership event triggers the first recompute.
    pub async fn on_group_created(
        &self,
        group_id: GroupId,
        creator_id: &UserId,
    ) -> Result<Option<GroupCharacteristicProfile>, DomainError> {
        self.ensure_open()?;
        let seeded = self
            .inner
            .recomputer
            .seed_from_creator(group_id, creator_id)
            .await?;
        tracing::debug!(group_id = %group_id, seeded = seeded.is_some(), "group seeded from creator");
        Ok(seeded)
    }

    pub fn on_membership_changed(&self, group_id: GroupId) -> Result<EnqueueOutcome, DomainError> {
        self.enqueue(group_id)
    }

    /// Removes the group's profile. A job still queued for it finds no
    /// members and does nothing.
    pub async fn on_group_deleted(&self, group_id: GroupId) -> Result<(), DomainError> {
        self.ensure_open()?;
        self.inner.recomputer.discard(group_id).await?;
        tracing::debug!(group_id = %group_id, "group profile discarded");
        Ok(())
    }

    /// Requests a recompute for `group_id`, coalescing with pending work.
    ///
    /// # Errors
    ///
    /// - `DispatcherClosed` after `shutdown`
    pub fn enqueue(&self, group_id: GroupId) -> Result<EnqueueOutcome, DomainError> {
        let mut guard = self.inner.state();
        let State { slots, sender } = &mut *guard;
        let Some(sender) = sender.as_ref() else {
            return Err(closed_error());
        };

        match slots.get_mut(&group_id) {
            Some(Slot::Queued) => {
                self.inner.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(group_id = %group_id, "recompute already queued");
                return Ok(EnqueueOutcome::Coalesced);
            }
            Some(Slot::Running { dirty }) => {
                *dirty = true;
                self.inner.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(group_id = %group_id, "recompute running, marked dirty");
                return Ok(EnqueueOutcome::Coalesced);
            }
            None => {}
        }

        if sender.send(group_id).is_err() {
            return Err(closed_error());
        }
        slots.insert(group_id, Slot::Queued);
        self.inner.counters.scheduled.fetch_add(1, Ordering::Relaxed);
        Ok(EnqueueOutcome::Scheduled)
    }

    // === Lifecycle ===

    pub fn is_closed(&self) -> bool {
        self.inner.state().sender.is_none()
    }

    pub fn stats(&self) -> DispatcherStats {
        let counters = &self.inner.counters;
        DispatcherStats {
            scheduled: counters.scheduled.load(Ordering::Relaxed),
            coalesced: counters.coalesced.load(Ordering::Relaxed),
            executed: counters.executed.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            panicked: counters.panicked.load(Ordering::Relaxed),
            pending_groups: self.inner.state().slots.len(),
        }
    }

    /// Resolves once no group has a job queued or running.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let idle = self.inner.state().slots.is_empty();
            if idle {
                return;
            }
            notified.await;
        }
    }

    /// Stops accepting work, then waits up to `timeout` for queued and
    /// in-flight jobs (including dirty re-runs) to finish.
    ///
    /// # Errors
    ///
    /// - `DispatcherClosed` if already shut down
    /// - `InternalError` if draining exceeded `timeout`; queued and running
    ///   jobs are aborted
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), DomainError> {
        let sender = self.inner.state().sender.take();
        if sender.is_none() {
            return Err(closed_error());
        }
        drop(sender);
        tracing::info!(
            pending_groups = self.stats().pending_groups,
            "recompute dispatcher draining"
        );

        let handle = self
            .inner
            .queue_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut handle) = handle {
            match tokio::time::timeout(timeout, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::error!(error = %error, "recompute queue task crashed");
                }
                Err(_) => {
                    // Dropping the queue task's JoinSet aborts in-flight workers.
                    handle.abort();
                    tracing::warn!(timeout_secs = timeout.as_secs(), "recompute drain timed out, workers aborted");
                    return Err(DomainError::new(
                        ErrorCode::InternalError,
                        "Timed out draining recompute queue",
                    ));
                }
            }
        }

        let stats = self.stats();
        tracing::info!(
            executed = stats.executed,
            coalesced = stats.coalesced,
            failed = stats.failed,
            "recompute dispatcher stopped"
        );
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_closed() {
            return Err(closed_error());
        }
        Ok(())
    }
}

fn closed_error() -> DomainError {
    DomainError::new(
        ErrorCode::DispatcherClosed,
        "Recompute dispatcher is shut down",
    )
}

async fn run_queue(
    inner: Arc<Inner>,
    mut receiver: mpsc::UnboundedReceiver<GroupId>,
    worker_count: usize,
) {
    let semaphore = Arc::new(Semaphore::new(worker_count));
    let mut workers = JoinSet::new();

    while let Some(group_id) = receiver.recv().await {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        workers.spawn(run_job(Arc::clone(&inner), group_id, permit));

        while let Some(result) = workers.try_join_next() {
            if let Err(error) = result {
                tracing::error!("recompute worker crashed: {error}");
            }
        }
    }

    while let Some(result) = workers.join_next().await {
        if let Err(error) = result {
            tracing::error!("recompute worker crashed: {error}");
        }
    }
}

async fn run_job(inner: Arc<Inner>, group_id: GroupId, _permit: OwnedSemaphorePermit) {
    loop {
        inner.mark_running(group_id);

        let outcome = AssertUnwindSafe(inner.recomputer.recompute(group_id))
            .catch_unwind()
            .await;
        inner.counters.executed.fetch_add(1, Ordering::Relaxed);

        match outcome {
            Ok(Ok(Some(_))) => {}
            Ok(Ok(None)) => {
                tracing::debug!(group_id = %group_id, "stale recompute dropped");
            }
            Ok(Err(error)) => {
                inner.counters.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(group_id = %group_id, error = %error, "group recompute failed");
            }
            Err(payload) => {
                inner.counters.panicked.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    group_id = %group_id,
                    panic = %panic_message(payload.as_ref()),
                    "group recompute panicked"
                );
            }
        }

        if !inner.finish_run(group_id) {
            break;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
