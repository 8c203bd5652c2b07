use serde::{Deserialize, Serialize};

use super::WorkflowStatus;
use crate::prelude::*;

/// Search index view of a workflow execution.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowSummary {
    pub workflow_type: InlineStr,
    pub version: i32,
    pub workflow_id: InlineStr,
    pub correlation_id: InlineStr,
    pub start_time: InlineStr,
    pub update_time: InlineStr,
    pub end_time: InlineStr,
    pub status: WorkflowStatus,
    pub input: String,
    pub output: String,
    pub reason_for_incompletion: InlineStr,
    pub execution_time: i64,
    pub event: InlineStr,
    pub failed_reference_task_names: InlineStr,
    pub priority: i32,
}
