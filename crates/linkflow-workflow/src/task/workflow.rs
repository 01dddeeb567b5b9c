/*
[INPUT]:  Link to process, SessionStore, Transport, NotificationSink
[OUTPUT]: TaskRun transitions observable through a watch channel
[POS]:    Task domain - submission orchestration, reconciliation, offline fallback
[UPDATE]: When submission rules, reconciliation or fallback behaviour change
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use linkflow_adapter::{SubmitTaskRequest, Transport};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::progress;
use super::run::{RunAction, TaskRun};
use crate::error::{ValidationError, WorkflowError};
use crate::notify::{Notification, NotificationSink};
use crate::session::SessionStore;

/// Delay before an offline run is reported as succeeded
pub const FALLBACK_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_RESULT_MESSAGE: &str = "Process completed successfully!";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Process failed";

/// `error_message` codes written by the workflow itself
pub const ERR_UNAUTHENTICATED: &str = "unauthenticated";
pub const ERR_TRANSPORT_UNAVAILABLE: &str = "transport_unavailable";

const SUCCESS_NOTICE: &str = "Process completed successfully!";
const EMPTY_LINK_NOTICE: &str = "Please enter a link";
const UNAUTHENTICATED_NOTICE: &str = "Please log in before submitting a link";
const UNAVAILABLE_NOTICE: &str = "Unable to reach the processing service";

/// Runs one link submission at a time.
///
/// The outbound call and the progress ticker are two independent tasks that
/// only touch the run through guarded transitions on the shared watch
/// channel; whichever observes a settled run or a newer run id backs off.
/// `submit` must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct TaskWorkflow {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn NotificationSink>,
    offline_fallback: bool,
    state: Arc<watch::Sender<TaskRun>>,
    next_run_id: Arc<AtomicU64>,
    active: Arc<Mutex<Option<CancellationToken>>>,
}

impl TaskWorkflow {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let (state, _) = watch::channel(TaskRun::idle(0));
        Self {
            transport,
            store,
            sink,
            offline_fallback: true,
            state: Arc::new(state),
            next_run_id: Arc::new(AtomicU64::new(0)),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Simulate success when the processing service is unreachable (default: on)
    pub fn with_offline_fallback(mut self, enabled: bool) -> Self {
        self.offline_fallback = enabled;
        self
    }

    /// Current run
    pub fn snapshot(&self) -> TaskRun {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskRun> {
        self.state.subscribe()
    }

    /// Wait until no run is validating, submitting or in progress
    pub async fn wait_until_settled(&self) -> TaskRun {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|run| !run.status.is_busy()).await {
            Ok(run) => run.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// Start processing `link`.
    ///
    /// Returns once the run is launched; the outcome is observed through
    /// [`snapshot`](Self::snapshot) / [`subscribe`](Self::subscribe).
    /// Rejected links and a missing session also settle the run as `Failed`.
    pub fn submit(&self, link: &str) -> Result<(), WorkflowError> {
        let link = link.trim();
        let Some((run_id, run_token)) = self.begin(link) else {
            tracing::debug!(link, "submission ignored, a task is already running");
            return Err(WorkflowError::Busy);
        };

        if let Err(err) = validate_link(link) {
            run_token.cancel();
            self.transition(run_id, RunAction::Fail(err.code().to_string()));
            let notice = if link.is_empty() {
                EMPTY_LINK_NOTICE.to_string()
            } else {
                err.to_string()
            };
            tracing::debug!(run_id, link, "rejected invalid link");
            self.sink.notify(Notification::error(notice));
            return Err(err.into());
        }

        let Some(session) = self.store.get() else {
            run_token.cancel();
            self.transition(run_id, RunAction::Fail(ERR_UNAUTHENTICATED.to_string()));
            tracing::warn!(run_id, "submission without an active session");
            self.sink.notify(Notification::error(UNAUTHENTICATED_NOTICE));
            return Err(WorkflowError::Unauthenticated);
        };

        self.transition(run_id, RunAction::Submit);
        self.transition(run_id, RunAction::Start);

        let ticker_token = run_token.child_token();

        tokio::spawn(progress::run_ticker(
            self.state.clone(),
            run_id,
            ticker_token.clone(),
        ));

        let workflow = self.clone();
        let link = link.to_string();
        tracing::info!(run_id, link = %link, "task submitted");
        tokio::spawn(async move {
            workflow
                .reconcile(run_id, link, session.token, run_token, ticker_token)
                .await;
        });

        Ok(())
    }

    /// Drop the current run and return to `Idle`.
    ///
    /// Stops the ticker and any pending offline delay. An in-flight call is
    /// left to resolve and its result is discarded.
    pub fn reset(&self) {
        let mut run_id = 0;
        self.state.send_modify(|run| {
            if let Some(token) = self.active().take() {
                token.cancel();
            }
            run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed) + 1;
            *run = TaskRun::idle(run_id);
        });
        tracing::debug!(run_id, "task workflow reset");
    }

    /// Claim the slot for a new run, unless one is busy.
    ///
    /// The run's cancellation token is installed under the same state lock
    /// as the run itself, so `reset` always cancels the run it replaces.
    fn begin(&self, link: &str) -> Option<(u64, CancellationToken)> {
        let mut started = None;
        self.state.send_if_modified(|run| {
            if run.status.is_busy() {
                return false;
            }
            let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed) + 1;
            let mut next = TaskRun::idle(run_id);
            next.link = Some(link.to_string());
            if next.apply(RunAction::Validate).is_err() {
                return false;
            }
            let run_token = CancellationToken::new();
            if let Some(previous) = self.active().replace(run_token.clone()) {
                previous.cancel();
            }
            *run = next;
            started = Some((run_id, run_token));
            true
        });
        started
    }

    /// Apply `action` if `run_id` is still the current run
    fn transition(&self, run_id: u64, action: RunAction) -> bool {
        self.state.send_if_modified(|run| {
            if run.run_id != run_id {
                return false;
            }
            match run.apply(action) {
                Ok(()) => true,
                Err(err) => {
                    tracing::trace!(run_id, error = %err, "transition skipped");
                    false
                }
            }
        })
    }

    async fn reconcile(
        self,
        run_id: u64,
        link: String,
        session_token: String,
        run_token: CancellationToken,
        ticker_token: CancellationToken,
    ) {
        let request = SubmitTaskRequest { link: link.clone() };
        let outcome = self.transport.submit_task(&request, &session_token).await;
        ticker_token.cancel();

        if !self.still_current(run_id, &session_token) {
            return;
        }

        match outcome {
            Ok(response) => {
                let message = response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_RESULT_MESSAGE.to_string());
                if self.transition(run_id, RunAction::Succeed(message)) {
                    tracing::info!(run_id, "task succeeded");
                    self.sink.notify(Notification::success(SUCCESS_NOTICE));
                }
            }
            Err(err) if err.is_unreachable() && self.offline_fallback => {
                tracing::warn!(
                    run_id,
                    error = %err,
                    "processing service unreachable, simulating result"
                );
                tokio::select! {
                    _ = run_token.cancelled() => {
                        tracing::debug!(run_id, "offline fallback cancelled");
                        return;
                    }
                    _ = tokio::time::sleep(FALLBACK_DELAY) => {}
                }
                if !self.still_current(run_id, &session_token) {
                    return;
                }
                let message = format!("Offline process completed for: {link}");
                if self.transition(run_id, RunAction::Succeed(message)) {
                    tracing::info!(run_id, "task succeeded in offline mode");
                    self.sink
                        .notify(Notification::success(SUCCESS_NOTICE).simulated());
                }
            }
            Err(err) if err.is_unreachable() => {
                tracing::warn!(run_id, error = %err, "processing service unreachable");
                if self.transition(run_id, RunAction::Fail(ERR_TRANSPORT_UNAVAILABLE.to_string())) {
                    self.sink.notify(Notification::error(UNAVAILABLE_NOTICE));
                }
            }
            Err(err) => {
                let detail = err
                    .reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                tracing::warn!(run_id, error = %err, "task rejected by backend");
                if self.transition(run_id, RunAction::Fail(detail.clone())) {
                    self.sink.notify(Notification::error(detail));
                }
            }
        }
    }

    /// False when the run moved on or the session it was sent with is gone
    fn still_current(&self, run_id: u64, session_token: &str) -> bool {
        let current_id = self.state.borrow().run_id;
        if current_id != run_id {
            tracing::debug!(run_id, current_id, "discarding stale task response");
            return false;
        }

        let session_matches = self
            .store
            .get()
            .is_some_and(|session| session.token == session_token);
        if !session_matches {
            tracing::debug!(run_id, "session changed while task was in flight, discarding response");
            if let Some(token) = self.active().take() {
                token.cancel();
            }
            self.transition(run_id, RunAction::Reset);
            return false;
        }

        true
    }

    fn active(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_link(link: &str) -> Result<Url, ValidationError> {
    Url::parse(link).map_err(|_| ValidationError::InvalidUrl)
}
