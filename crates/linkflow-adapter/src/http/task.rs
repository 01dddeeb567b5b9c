/*
[INPUT]:  Link to process and bearer session token
[OUTPUT]: Backend processing outcome message
[POS]:    HTTP layer - task submission endpoint (requires session token)
[UPDATE]: When the processing endpoint or payload changes
*/

use reqwest::Method;

use crate::http::{LinkflowClient, Result};
use crate::types::{SubmitTaskRequest, SubmitTaskResponse};

impl LinkflowClient {
    /// Submit a link for server-side processing
    ///
    /// POST /api/process
    /// Requires: Authorization: Bearer <session token>
    pub async fn submit_task(
        &self,
        req: &SubmitTaskRequest,
        session_token: &str,
    ) -> Result<SubmitTaskResponse> {
        tracing::debug!(link = %req.link, "submitting task");
        let builder = self
            .request(Method::POST, &self.endpoints().submit_task)?
            .bearer_auth(session_token)
            .json(req);
        let result = self.send_json(builder).await;
        if let Err(err) = &result {
            tracing::warn!(
                link = %req.link,
                unreachable = err.is_unreachable(),
                error = %err,
                "task submission failed"
            );
        }
        result
    }
}
