/*
[INPUT]:  ResearchTransport (start/status/cancel), notes + preferences, caller cancel/reset
[OUTPUT]: TaskSnapshot updates via `watch`, one polling timer per poller, best-effort remote cancel
[POS]:    Execution layer - client-side task lifecycle state machine
[UPDATE]: When changing polling cadence, cancellation races, or teardown guarantees
*/

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use fragrance_research_adapter::{
    ResearchError, ResearchTransport, Result, StartResearchRequest, TaskStatusResponse,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::snapshot::{PollerPhase, TaskSnapshot};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
/// Shorter intervals are raised to this; the timer cannot run at zero.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Delay before the first status poll and between subsequent polls
    pub poll_interval: Duration,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Finished,
    Stale,
}

#[derive(Debug)]
struct PollWorker {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollWorker {
    /// Halt the timer. A status call already in flight finishes and is discarded.
    fn stop(self) {
        self.shutdown.cancel();
    }

    fn abort(self) {
        self.shutdown.cancel();
        self.handle.abort();
    }

    fn is_active(&self) -> bool {
        !self.shutdown.is_cancelled() && !self.handle.is_finished()
    }
}

#[derive(Debug, Default)]
struct Control {
    generation: u64,
    task_id: Option<String>,
    worker: Option<PollWorker>,
}

impl Control {
    /// Invalidate everything scheduled so far and stop the current timer.
    fn advance(&mut self) -> u64 {
        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}

struct Inner {
    transport: Arc<dyn ResearchTransport>,
    options: PollerOptions,
    // Lock order: `control` before `state`.
    control: Mutex<Control>,
    state: watch::Sender<TaskSnapshot>,
}

impl Inner {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail_start(&self, generation: u64, err: &ResearchError) {
        let control = self.lock_control();
        if control.generation != generation {
            debug!(generation, "start failure for superseded request ignored");
            return;
        }
        self.state.send_modify(|snapshot| snapshot.fail(err.detail()));
    }

    fn begin_polling(self: &Arc<Self>, generation: u64, task_id: &str) -> bool {
        let mut control = self.lock_control();
        if control.generation != generation {
            return false;
        }

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(self),
            generation,
            task_id.to_string(),
            shutdown.clone(),
        ));

        control.task_id = Some(task_id.to_string());
        control.worker = Some(PollWorker { shutdown, handle });
        self.state
            .send_modify(|snapshot| snapshot.begin_polling(task_id.to_string()));
        true
    }

    fn apply_status(&self, generation: u64, response: TaskStatusResponse) -> TickOutcome {
        let mut control = self.lock_control();
        if control.generation != generation {
            debug!(generation, "discarding stale status response");
            return TickOutcome::Stale;
        }

        let status = response.status;
        let progress = response.progress;
        let mut finished = false;
        self.state
            .send_modify(|snapshot| finished = snapshot.apply_status(response));

        if finished {
            if let Some(worker) = control.worker.take() {
                worker.stop();
            }
            info!(
                task_id = ?control.task_id,
                status = %status,
                "research task reached terminal status"
            );
            TickOutcome::Finished
        } else {
            debug!(task_id = ?control.task_id, status = %status, progress, "status polled");
            TickOutcome::Continue
        }
    }

    fn spawn_remote_cancel(&self, task_id: String) -> Option<JoinHandle<()>> {
        if tokio::runtime::Handle::try_current().is_err() {
            warn!(task_id, "no Tokio runtime; remote cancel skipped");
            return None;
        }

        let transport = Arc::clone(&self.transport);
        Some(tokio::spawn(async move {
            match transport.cancel(&task_id).await {
                Ok(_) => debug!(task_id, "remote cancel acknowledged"),
                Err(err) => warn!(task_id, error = %err, "remote cancel failed"),
            }
        }))
    }
}

async fn poll_loop(
    inner: Arc<Inner>,
    generation: u64,
    task_id: String,
    shutdown: CancellationToken,
) {
    let period = inner.options.poll_interval;
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = match inner.transport.status(&task_id).await {
            Ok(response) => inner.apply_status(generation, response),
            Err(err) => {
                warn!(
                    task_id,
                    error = %err,
                    retryable = err.is_retryable(),
                    "transient poll error; polling continues"
                );
                TickOutcome::Continue
            }
        };

        if outcome != TickOutcome::Continue {
            break;
        }
    }

    debug!(task_id, generation, "poll loop exited");
}

/// Owns one research task at a time and follows it to a terminal state.
///
/// All methods take `&self`; `cancel` and `reset` may run while `start` or a
/// status poll is waiting on the network. Every transition is checked against
/// a generation counter bumped by `start`, `cancel` and `reset`, so a late
/// response from a superseded task is dropped instead of applied.
///
/// Dropping the poller stops its timer.
pub struct TaskPoller {
    inner: Arc<Inner>,
}

impl TaskPoller {
    pub fn new(transport: Arc<dyn ResearchTransport>) -> Self {
        Self::with_options(transport, PollerOptions::default())
    }

    pub fn with_options(transport: Arc<dyn ResearchTransport>, mut options: PollerOptions) -> Self {
        if options.poll_interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = options.poll_interval.as_millis() as u64,
                "poll interval too short; using minimum"
            );
            options.poll_interval = MIN_POLL_INTERVAL;
        }
        let (state, _rx) = watch::channel(TaskSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                transport,
                options,
                control: Mutex::new(Control::default()),
                state,
            }),
        }
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.options.poll_interval
    }

    pub fn has_active_timer(&self) -> bool {
        self.inner
            .lock_control()
            .worker
            .as_ref()
            .is_some_and(PollWorker::is_active)
    }

    /// Start a new task, replacing whatever this poller was tracking.
    ///
    /// The first status poll happens one full interval after the task id is
    /// known. Errors are also recorded in the snapshot as `Failed`, except
    /// `Superseded`, which leaves the newer state alone.
    pub async fn start(&self, notes: Vec<String>, preferences: impl Into<String>) -> Result<String> {
        let generation = {
            let mut control = self.inner.lock_control();
            let generation = control.advance();
            control.task_id = None;
            self.inner.state.send_replace(TaskSnapshot::starting());
            generation
        };

        let request = match StartResearchRequest::new(notes, preferences) {
            Ok(request) => request,
            Err(err) => {
                self.inner.fail_start(generation, &err);
                return Err(err);
            }
        };

        info!(generation, notes = request.notes().len(), "starting research task");
        let task_id = match self.inner.transport.start(&request).await {
            Ok(response) => response.task_id,
            Err(err) => {
                warn!(error = %err, "research start failed");
                self.inner.fail_start(generation, &err);
                return Err(err);
            }
        };

        if !self.inner.begin_polling(generation, &task_id) {
            info!(task_id, "start superseded; cancelling orphaned task");
            self.inner.spawn_remote_cancel(task_id);
            return Err(ResearchError::Superseded);
        }

        info!(task_id, "research task started; polling");
        Ok(task_id)
    }

    /// Stop polling and mark the task cancelled without waiting on the network.
    ///
    /// Returns the handle of the best-effort remote cancel when a task id was
    /// known. Does nothing when idle or already terminal.
    pub fn cancel(&self) -> Option<JoinHandle<()>> {
        let task_id = {
            let mut control = self.inner.lock_control();
            let phase = self.inner.state.borrow().phase;
            if !matches!(phase, PollerPhase::Starting | PollerPhase::Polling) {
                debug!(?phase, "cancel ignored");
                return None;
            }

            control.advance();
            let task_id = control.task_id.take();
            self.inner.state.send_modify(TaskSnapshot::cancel);
            task_id
        };

        info!(task_id = ?task_id, "research task cancelled");
        task_id.and_then(|task_id| self.inner.spawn_remote_cancel(task_id))
    }

    /// Forget the current task entirely and return to `Idle`.
    pub fn reset(&self) {
        let mut control = self.inner.lock_control();
        control.advance();
        control.task_id = None;
        self.inner.state.send_if_modified(|snapshot| {
            if *snapshot == TaskSnapshot::default() {
                return false;
            }
            *snapshot = TaskSnapshot::default();
            true
        });
    }
}

impl Drop for TaskPoller {
    fn drop(&mut self) {
        let mut control = self.inner.lock_control();
        control.generation = control.generation.wrapping_add(1);
        if let Some(worker) = control.worker.take() {
            worker.abort();
        }
    }
}

impl std::fmt::Debug for TaskPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPoller")
            .field("options", &self.inner.options)
            .field("snapshot", &*self.inner.state.borrow())
            .finish()
    }
}
