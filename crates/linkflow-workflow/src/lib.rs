/*
[INPUT]:  Transport, session storage, notification sink, configuration
[OUTPUT]: Session-and-task-submission workflow surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod task;
pub mod telemetry;

pub use app::LinkflowApp;
pub use auth::{AuthController, Credentials};
pub use config::{EndpointConfig, LinkflowConfig, OfflineConfig};
pub use error::{AuthError, ValidationError, WorkflowError};
pub use notify::{ChannelSink, Notification, NotificationKind, NotificationSink, NullSink, TracingSink};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore, StoreError};
pub use task::{TaskRun, TaskStatus, TaskWorkflow};
