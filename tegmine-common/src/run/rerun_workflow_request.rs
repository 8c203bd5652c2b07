use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Re-runs a workflow from a given task, optionally with new workflow or task input.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RerunWorkflowRequest {
    pub re_run_from_workflow_id: InlineStr,
    pub workflow_input: HashMap<InlineStr, Object>,
    pub re_run_from_task_id: InlineStr,
    pub task_input: HashMap<InlineStr, Object>,
    pub correlation_id: InlineStr,
}
