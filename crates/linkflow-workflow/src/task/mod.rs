/*
[INPUT]:  Submitted link, current session, Transport result, timer ticks
[OUTPUT]: Observable TaskRun state with a single terminal outcome
[POS]:    Task domain - submission workflow and its state machine
[UPDATE]: When run lifecycle, progress simulation or fallback rules change
*/

pub mod progress;
pub mod run;
pub mod workflow;

pub use run::{RunAction, StateError, TaskRun, TaskStatus};
pub use workflow::TaskWorkflow;
