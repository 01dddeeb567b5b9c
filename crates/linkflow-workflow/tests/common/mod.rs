/*
[INPUT]:  Scripted backend replies
[OUTPUT]: In-memory Transport fake, notification collection helpers
[POS]:    Test infrastructure - shared across workflow test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for linkflow-workflow tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use linkflow_adapter::{
    LoginRequest, LoginResponse, RegisterRequest, Result, SubmitTaskRequest, SubmitTaskResponse,
    Transport, TransportError,
};
use linkflow_workflow::{
    ChannelSink, MemorySessionStore, Notification, Session, TaskWorkflow,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// How the fake backend answers one operation
#[derive(Debug, Clone)]
pub enum Reply {
    /// 2xx; for login the payload is the token, for submit the message
    Ok(Option<String>),
    Rejected { status: u16, detail: Option<String> },
    Unreachable,
}

impl Reply {
    pub fn ok(payload: &str) -> Self {
        Reply::Ok(Some(payload.to_string()))
    }

    pub fn rejected(status: u16, detail: &str) -> Self {
        Reply::Rejected {
            status,
            detail: Some(detail.to_string()),
        }
    }

    fn to_error(&self) -> Option<TransportError> {
        match self {
            Reply::Ok(_) => None,
            Reply::Rejected { status, detail } => Some(TransportError::Application {
                status: *status,
                detail: detail.clone(),
            }),
            Reply::Unreachable => Some(TransportError::Connectivity {
                message: "connection refused".to_string(),
            }),
        }
    }
}

/// Transport fake with per-operation replies, call counters and an optional
/// latency on `submit_task`
#[derive(Debug)]
pub struct ScriptedTransport {
    login_reply: Reply,
    register_reply: Reply,
    submit_reply: Reply,
    submit_latency: Duration,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub last_submit: Mutex<Option<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            login_reply: Reply::ok("tok-1"),
            register_reply: Reply::Ok(None),
            submit_reply: Reply::ok("done"),
            submit_latency: Duration::ZERO,
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            last_submit: Mutex::new(None),
        }
    }

    pub fn login_reply(mut self, reply: Reply) -> Self {
        self.login_reply = reply;
        self
    }

    pub fn register_reply(mut self, reply: Reply) -> Self {
        self.register_reply = reply;
        self
    }

    pub fn submit_reply(mut self, reply: Reply) -> Self {
        self.submit_reply = reply;
        self
    }

    pub fn submit_latency(mut self, latency: Duration) -> Self {
        self.submit_latency = latency;
        self
    }

    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn login(&self, _req: &LoginRequest) -> Result<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match self.login_reply.to_error() {
            Some(err) => Err(err),
            None => Ok(LoginResponse {
                session_token: match &self.login_reply {
                    Reply::Ok(Some(token)) => token.clone(),
                    _ => String::new(),
                },
            }),
        }
    }

    async fn register(&self, _req: &RegisterRequest) -> Result<()> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        match self.register_reply.to_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn submit_task(
        &self,
        req: &SubmitTaskRequest,
        session_token: &str,
    ) -> Result<SubmitTaskResponse> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_submit.lock().unwrap() = Some((req.link.clone(), session_token.to_string()));
        if !self.submit_latency.is_zero() {
            tokio::time::sleep(self.submit_latency).await;
        }
        match self.submit_reply.to_error() {
            Some(err) => Err(err),
            None => Ok(SubmitTaskResponse {
                message: match &self.submit_reply {
                    Reply::Ok(message) => message.clone(),
                    _ => None,
                },
            }),
        }
    }
}

/// Store holding a valid session
pub fn logged_in_store() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_session(Session::new("tok-1")))
}

/// Workflow over the given transport and store, plus its notification receiver
pub fn workflow_with(
    transport: Arc<ScriptedTransport>,
    store: Arc<MemorySessionStore>,
) -> (TaskWorkflow, UnboundedReceiver<Notification>) {
    let (sink, rx) = ChannelSink::new();
    let workflow = TaskWorkflow::new(transport, store, Arc::new(sink));
    (workflow, rx)
}

/// Everything delivered so far
pub fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}
