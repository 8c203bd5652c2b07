use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

use super::Task;
use crate::prelude::*;

/// The client's read-only projection of a workflow execution owned by the server.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Workflow {
    pub workflow_id: InlineStr,
    pub workflow_name: InlineStr,
    pub workflow_version: i32,
    pub correlation_id: InlineStr,
    pub status: WorkflowStatus,
    pub priority: i32,
    pub parent_workflow_id: InlineStr,
    pub parent_workflow_task_id: InlineStr,
    pub tasks: Vec<Task>,
    pub task_to_domain: HashMap<InlineStr, InlineStr>,
    pub input: HashMap<InlineStr, Object>,
    pub output: HashMap<InlineStr, Object>,
    pub variables: HashMap<InlineStr, Object>,
    pub reason_for_incompletion: InlineStr,
    /// Capture the failed taskId if the workflow execution failed because of task failure
    pub failed_task_id: InlineStr,
    pub failed_reference_task_names: HashSet<InlineStr>,
    pub re_run_from_workflow_id: InlineStr,
    pub owner_app: InlineStr,
    pub create_time: i64,
    pub start_time: i64,
    pub update_time: i64,
    pub end_time: i64,
}

impl Workflow {
    pub fn new(workflow_id: impl Into<InlineStr>, status: WorkflowStatus) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            status,
            ..Default::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn to_short_string(&self) -> String {
        format!(
            "{}.{}/{}",
            self.workflow_name, self.workflow_version, self.workflow_id
        )
    }

    pub fn get_task_by_ref_name(&self, ref_name: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .rev()
            .find(|task| task.reference_task_name.eq(ref_name))
    }
}

/// Lightweight status of a workflow, without tasks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowState {
    pub workflow_id: InlineStr,
    pub correlation_id: InlineStr,
    pub status: WorkflowStatus,
    pub output: HashMap<InlineStr, Object>,
    pub variables: HashMap<InlineStr, Object>,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    #[default]
    Running,
    Completed,
    Failed,
    TimedOut,
    Terminated,
    Paused,
}

impl WorkflowStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkflowStatus::Running | WorkflowStatus::Paused)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, WorkflowStatus::Completed | WorkflowStatus::Paused)
    }
}
