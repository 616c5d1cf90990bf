/*
[INPUT]:  Start outcomes, status poll responses, local cancel/reset
[OUTPUT]: TaskSnapshot - the single observable view of a poller's task
[POS]:    State layer - pure transitions applied by TaskPoller
[UPDATE]: When adding observable fields or changing transition effects
*/

use fragrance_research_adapter::{Recommendation, TaskStatus, TaskStatusResponse};
use serde::Serialize;

pub const STARTING_MESSAGE: &str = "Starting research...";
pub const CANCELLED_MESSAGE: &str = "Research cancelled";
pub const FAILED_FALLBACK: &str = "Research failed";

/// Client-side lifecycle of the poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerPhase {
    #[default]
    Idle,
    Starting,
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl PollerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PollerPhase::Completed | PollerPhase::Failed | PollerPhase::Cancelled
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskSnapshot {
    pub phase: PollerPhase,
    pub task_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub progress: u8,
    pub message: String,
    pub recommendations: Vec<Recommendation>,
    pub error: Option<String>,
}

impl TaskSnapshot {
    /// True while a start call or the polling loop is active.
    pub fn in_progress(&self) -> bool {
        matches!(self.phase, PollerPhase::Starting | PollerPhase::Polling)
    }

    pub(crate) fn starting() -> Self {
        Self {
            phase: PollerPhase::Starting,
            status: Some(TaskStatus::Pending),
            message: STARTING_MESSAGE.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn begin_polling(&mut self, task_id: String) {
        self.phase = PollerPhase::Polling;
        self.task_id = Some(task_id);
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.phase = PollerPhase::Failed;
        self.status = Some(TaskStatus::Failed);
        self.error = Some(error);
    }

    pub(crate) fn cancel(&mut self) {
        self.phase = PollerPhase::Cancelled;
        self.status = Some(TaskStatus::Cancelled);
        self.message = CANCELLED_MESSAGE.to_string();
        self.task_id = None;
    }

    /// Apply one status poll. Returns true when the task reached a terminal status.
    pub(crate) fn apply_status(&mut self, response: TaskStatusResponse) -> bool {
        self.status = Some(response.status);
        self.progress = response.progress.min(100) as u8;
        self.message = response.message.unwrap_or_default();

        match response.status {
            TaskStatus::Completed => {
                self.phase = PollerPhase::Completed;
                self.recommendations = response.recommendations.unwrap_or_default();
                true
            }
            TaskStatus::Failed => {
                self.phase = PollerPhase::Failed;
                self.error = Some(
                    response
                        .error
                        .unwrap_or_else(|| FAILED_FALLBACK.to_string()),
                );
                true
            }
            TaskStatus::Cancelled => {
                self.phase = PollerPhase::Cancelled;
                self.message = CANCELLED_MESSAGE.to_string();
                true
            }
            TaskStatus::Pending | TaskStatus::Running => false,
        }
    }
}
