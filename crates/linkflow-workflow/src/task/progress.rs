/*
[INPUT]:  Shared run state, run id, cancellation token
[OUTPUT]: Cosmetic progress increments while the real call is pending
[POS]:    Task domain - progress-simulation loop
[UPDATE]: When tick cadence or stop conditions change
*/

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::run::{RunAction, TaskRun, TaskStatus};

pub const PROGRESS_TICK: Duration = Duration::from_millis(200);
pub const PROGRESS_STEP: u8 = 10;
pub const PROGRESS_CAP: u8 = 90;

/// Advance `progress_percent` every [`PROGRESS_TICK`] until cancelled.
///
/// Each tick re-checks the run id and status inside the state update, so a
/// tick that lands after the run left `InProgress` is a no-op and ends the loop.
pub(crate) async fn run_ticker(
    state: Arc<watch::Sender<TaskRun>>,
    run_id: u64,
    cancel: CancellationToken,
) {
    let mut interval = time::interval_at(Instant::now() + PROGRESS_TICK, PROGRESS_TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut applied = 0u32;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let mut keep_going = false;
        state.send_if_modified(|run| {
            if run.run_id != run_id || run.status != TaskStatus::InProgress {
                return false;
            }
            let step = RunAction::Progress {
                step: PROGRESS_STEP,
                cap: PROGRESS_CAP,
            };
            match run.apply(step) {
                Ok(()) => {
                    keep_going = run.progress_percent < PROGRESS_CAP;
                    true
                }
                Err(_) => false,
            }
        });

        if keep_going {
            applied += 1;
        } else {
            break;
        }
    }

    tracing::trace!(run_id, applied, "progress ticker stopped");
}
