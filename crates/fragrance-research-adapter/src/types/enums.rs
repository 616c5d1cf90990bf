/*
[INPUT]:  Research service status strings
[OUTPUT]: Typed task status with terminal-state classification
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the research service adds or renames task phases
*/

use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the research service.
///
/// The service also reports intermediate phases (`planning`, `searching`,
/// `analyzing`); they all collapse into `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    #[serde(alias = "planning", alias = "searching", alias = "analyzing")]
    Running,
    Completed,
    Failed,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl TaskStatus {
    /// Terminal statuses end polling for a task id.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
