use serde::Serialize;
use uuid::Uuid;

use super::model::{Task, TaskFilter, TaskStats};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<&'static str>,
    pub sort_by: &'static str,
    pub sort_order: &'static str,
}

impl From<&TaskFilter> for AppliedFilters {
    fn from(f: &TaskFilter) -> Self {
        Self {
            status: f.status.map(|s| s.as_str()),
            priority: f.priority.map(|p| p.as_str()),
            sort_by: f.sort_by.as_str(),
            sort_order: f.sort_order.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub total: usize,
    pub filters: AppliedFilters,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskMutationResponse {
    pub message: &'static str,
    pub task: Task,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeletedResponse {
    pub message: &'static str,
    pub task_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: TaskStats,
}
