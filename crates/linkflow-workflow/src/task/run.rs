/*
[INPUT]:  TaskStatus, RunAction enum
[OUTPUT]: Validated state transitions for a single TaskRun
[POS]:    Task domain logic - state machine for run lifecycle
[UPDATE]: When run status transitions or progress rules change
*/

use thiserror::Error;

/// Lifecycle of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Idle,
    Validating,
    Submitting,
    InProgress,
    Succeeded,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }

    /// A run in this status blocks new submissions
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            TaskStatus::Validating | TaskStatus::Submitting | TaskStatus::InProgress
        )
    }
}

/// Actions that can trigger run state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunAction {
    Validate,
    Submit,
    Start,
    Progress { step: u8, cap: u8 },
    Succeed(String),
    Fail(String),
    Reset,
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid transition: {from:?} -> {action:?}")]
    InvalidTransition { from: TaskStatus, action: RunAction },

    #[error("Progress already at cap {cap}")]
    ProgressCapped { cap: u8 },
}

/// Mutable execution record of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRun {
    pub run_id: u64,
    pub link: Option<String>,
    pub status: TaskStatus,
    pub progress_percent: u8,
    pub result_message: Option<String>,
    pub error_message: Option<String>,
}

impl TaskRun {
    pub fn idle(run_id: u64) -> Self {
        Self {
            run_id,
            link: None,
            status: TaskStatus::Idle,
            progress_percent: 0,
            result_message: None,
            error_message: None,
        }
    }

    /// Check if the action is valid from the current status
    pub fn can_apply(&self, action: &RunAction) -> bool {
        use TaskStatus::*;

        match (self.status, action) {
            (Idle | Succeeded | Failed, RunAction::Validate) => true,
            (Validating, RunAction::Submit) => true,
            (Submitting, RunAction::Start) => true,
            (InProgress, RunAction::Progress { .. }) => true,
            (InProgress, RunAction::Succeed(_)) => true,
            (Validating | Submitting | InProgress, RunAction::Fail(_)) => true,
            (_, RunAction::Reset) => true,
            _ => false,
        }
    }

    /// Perform a state transition.
    ///
    /// Progress never decreases while in progress; success forces 100 and
    /// failure freezes the last value.
    pub fn apply(&mut self, action: RunAction) -> Result<(), StateError> {
        if !self.can_apply(&action) {
            return Err(StateError::InvalidTransition {
                from: self.status,
                action,
            });
        }

        match action {
            RunAction::Validate => {
                self.status = TaskStatus::Validating;
                self.progress_percent = 0;
                self.result_message = None;
                self.error_message = None;
            }
            RunAction::Submit => self.status = TaskStatus::Submitting,
            RunAction::Start => self.status = TaskStatus::InProgress,
            RunAction::Progress { step, cap } => {
                if self.progress_percent >= cap {
                    return Err(StateError::ProgressCapped { cap });
                }
                self.progress_percent = self.progress_percent.saturating_add(step).min(cap);
            }
            RunAction::Succeed(message) => {
                self.status = TaskStatus::Succeeded;
                self.progress_percent = 100;
                self.result_message = Some(message);
            }
            RunAction::Fail(message) => {
                self.status = TaskStatus::Failed;
                self.error_message = Some(message);
            }
            RunAction::Reset => *self = TaskRun::idle(self.run_id),
        }

        Ok(())
    }
}
