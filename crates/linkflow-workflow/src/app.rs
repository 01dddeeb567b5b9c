/*
[INPUT]:  LinkflowConfig or injected Transport/SessionStore/NotificationSink
[OUTPUT]: AuthController + TaskWorkflow sharing one session slot
[POS]:    Composition root - what a UI shell holds on to
[UPDATE]: When wiring or cross-controller rules (logout) change
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use linkflow_adapter::{Endpoints, LinkflowClient, Transport};

use crate::auth::{AuthController, Credentials};
use crate::config::{LinkflowConfig, OfflineConfig};
use crate::error::{AuthError, WorkflowError};
use crate::notify::NotificationSink;
use crate::session::{FileSessionStore, Session, SessionStore};
use crate::task::{TaskRun, TaskWorkflow};

/// Auth and task workflow bound to the same transport and session store
#[derive(Clone)]
pub struct LinkflowApp {
    auth: AuthController,
    workflow: TaskWorkflow,
}

impl LinkflowApp {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        sink: Arc<dyn NotificationSink>,
        offline: OfflineConfig,
    ) -> Self {
        let workflow = TaskWorkflow::new(transport.clone(), store.clone(), sink.clone())
            .with_offline_fallback(offline.submit_task);
        let running = workflow.clone();
        let auth = AuthController::new(transport, store, sink)
            .with_offline_login(offline.login)
            .with_offline_register(offline.register)
            .on_logout(move || running.reset());
        Self { auth, workflow }
    }

    /// HTTP transport plus the durable session slot, restoring any saved session
    pub fn from_config(config: &LinkflowConfig, sink: Arc<dyn NotificationSink>) -> Result<Self> {
        let client = LinkflowClient::with_config_and_base_url(config.client_config(), &config.base_url)
            .context("build HTTP transport")?
            .with_endpoints(Endpoints::from(&config.endpoints));

        let session_path = config.session_path();
        let store = FileSessionStore::open(&session_path)
            .with_context(|| format!("open session store {}", session_path.display()))?;

        let app = Self::new(Arc::new(client), Arc::new(store), sink, config.offline);
        tracing::info!(
            base_url = %config.base_url,
            authenticated = app.is_authenticated(),
            "linkflow client ready"
        );
        Ok(app)
    }

    pub fn auth(&self) -> &AuthController {
        &self.auth
    }

    pub fn workflow(&self) -> &TaskWorkflow {
        &self.workflow
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.auth.login(credentials).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.auth.register(credentials).await
    }

    pub fn submit(&self, link: &str) -> Result<(), WorkflowError> {
        self.workflow.submit(link)
    }

    pub fn task(&self) -> TaskRun {
        self.workflow.snapshot()
    }

    /// Stop any running task, then forget the session.
    ///
    /// Same as `auth().logout()`; the workflow reset is wired as its hook.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.auth.logout()
    }
}
