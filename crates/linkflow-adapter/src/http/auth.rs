/*
[INPUT]:  Login ID and password
[OUTPUT]: Session token on login, acknowledgement on registration
[POS]:    HTTP layer - authentication endpoints (no session required)
[UPDATE]: When auth endpoints or payloads change
*/

use reqwest::Method;

use crate::http::{LinkflowClient, Result};
use crate::types::{LoginRequest, LoginResponse, RegisterRequest};

impl LinkflowClient {
    /// Exchange credentials for a session token
    ///
    /// POST /api/auth/login
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        tracing::debug!(login_id = %req.login_id, "sending login request");
        let builder = self.request(Method::POST, &self.endpoints().login)?;
        let result = self.send_json(builder.json(req)).await;
        if let Err(err) = &result {
            tracing::warn!(login_id = %req.login_id, error = %err, "login request failed");
        }
        result
    }

    /// Create a new account
    ///
    /// POST /api/auth/register
    pub async fn register(&self, req: &RegisterRequest) -> Result<()> {
        tracing::debug!(login_id = %req.login_id, "sending register request");
        let builder = self.request(Method::POST, &self.endpoints().register)?;
        let result = self.send_unit(builder.json(req)).await;
        if let Err(err) = &result {
            tracing::warn!(login_id = %req.login_id, error = %err, "register request failed");
        }
        result
    }
}
