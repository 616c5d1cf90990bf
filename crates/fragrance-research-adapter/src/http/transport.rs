/*
[INPUT]:  Start requests and task ids from task orchestration code
[OUTPUT]: Task lifecycle responses from any backing implementation
[POS]:    HTTP layer - injectable transport seam
[UPDATE]: When the task lifecycle gains a new remote operation
*/

use async_trait::async_trait;

use crate::http::{ResearchClient, Result};
use crate::types::{CancelResponse, StartResearchRequest, StartResearchResponse, TaskStatusResponse};

/// Remote task lifecycle operations.
///
/// `ResearchClient` is the HTTP implementation; tests substitute scripted ones.
#[async_trait]
pub trait ResearchTransport: Send + Sync + 'static {
    async fn start(&self, request: &StartResearchRequest) -> Result<StartResearchResponse>;

    async fn status(&self, task_id: &str) -> Result<TaskStatusResponse>;

    async fn cancel(&self, task_id: &str) -> Result<CancelResponse>;
}

#[async_trait]
impl ResearchTransport for ResearchClient {
    async fn start(&self, request: &StartResearchRequest) -> Result<StartResearchResponse> {
        self.start_research(request).await
    }

    async fn status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        self.task_status(task_id).await
    }

    async fn cancel(&self, task_id: &str) -> Result<CancelResponse> {
        self.cancel_task(task_id).await
    }
}
