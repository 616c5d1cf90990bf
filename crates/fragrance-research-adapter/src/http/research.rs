/*
[INPUT]:  Validated start requests and task identifiers
[OUTPUT]: Typed task lifecycle responses (start, status, cancel)
[POS]:    HTTP layer - research task endpoints
[UPDATE]: When adding research endpoints or changing response handling
*/

use reqwest::Method;
use tracing::debug;

use crate::http::client::{CANCEL_PATH, START_PATH, STATUS_PATH};
use crate::http::{ResearchClient, Result};
use crate::types::{CancelResponse, StartResearchRequest, StartResearchResponse, TaskStatusResponse};

impl ResearchClient {
    /// Start a research task
    ///
    /// POST /api/research/start
    pub async fn start_research(&self, req: &StartResearchRequest) -> Result<StartResearchResponse> {
        debug!(notes = req.notes().len(), "starting research task");
        let builder = self.request(Method::POST, START_PATH)?.json(req);
        self.send_json(builder).await
    }

    /// Query task status
    ///
    /// GET /api/research/status/{task_id}
    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        let builder = self.task_request(Method::GET, STATUS_PATH, task_id)?;
        self.send_json(builder).await
    }

    /// Cancel a task
    ///
    /// POST /api/research/cancel/{task_id}
    pub async fn cancel_task(&self, task_id: &str) -> Result<CancelResponse> {
        debug!(task_id, "cancelling research task");
        let builder = self.task_request(Method::POST, CANCEL_PATH, task_id)?;
        self.send_json(builder).await
    }
}
