/*
[INPUT]:  Wire request types and a session token
[OUTPUT]: Typed login/register/submit results or a tagged TransportError
[POS]:    Transport boundary - the contract the workflow core depends on
[UPDATE]: When adding a logical operation or changing the failure taxonomy
*/

use async_trait::async_trait;

use crate::http::{LinkflowClient, Result};
use crate::types::{
    LoginRequest, LoginResponse, RegisterRequest, SubmitTaskRequest, SubmitTaskResponse,
};

/// The three logical backend operations the workflow needs.
///
/// Implementations must report connection-level failures as
/// [`TransportError::Connectivity`](crate::TransportError::Connectivity) and
/// everything the backend answered as an application error, so callers can
/// branch on [`TransportError::is_unreachable`](crate::TransportError::is_unreachable)
/// instead of inspecting messages.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse>;

    async fn register(&self, req: &RegisterRequest) -> Result<()>;

    async fn submit_task(
        &self,
        req: &SubmitTaskRequest,
        session_token: &str,
    ) -> Result<SubmitTaskResponse>;
}

#[async_trait]
impl Transport for LinkflowClient {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        LinkflowClient::login(self, req).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<()> {
        LinkflowClient::register(self, req).await
    }

    async fn submit_task(
        &self,
        req: &SubmitTaskRequest,
        session_token: &str,
    ) -> Result<SubmitTaskResponse> {
        LinkflowClient::submit_task(self, req, session_token).await
    }
}
