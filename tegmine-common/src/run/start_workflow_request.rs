use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::WorkflowDef;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartWorkflowRequest {
    /// Name of the Workflow. MUST be registered with Tegmine before starting workflow
    pub name: InlineStr,
    /// Workflow version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// JSON object with key value params, that can be used by downstream tasks
    pub input: HashMap<InlineStr, Object>,

    /// Unique Id that correlates multiple Workflow executions
    pub correlation_id: InlineStr,
    /// Task domains helps support task development. The idea is same "task definition" can be
    /// implemented in different "domains". A domain is some arbitrary name that the developer
    /// controls. So when the workflow is started, the caller can specify, out of all the tasks in
    /// the workflow, which tasks need to run in a specific domain, this domain is then used to
    /// poll for task on the client side to execute it.
    pub task_to_domain: HashMap<InlineStr, InlineStr>,
    /// An adhoc Workflow Definition to run, without registering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_def: Option<WorkflowDef>,
    pub external_input_payload_storage_path: InlineStr,
    /// Priority level for the tasks within this workflow execution. Possible values are between 0
    /// - 99.
    pub priority: i32,
}

impl StartWorkflowRequest {
    pub fn new(name: impl Into<InlineStr>, version: Option<i32>) -> Self {
        Self {
            name: name.into(),
            version,
            ..Default::default()
        }
    }

    pub fn with_input(mut self, key: impl Into<InlineStr>, value: impl Into<Object>) -> Self {
        self.input.insert(key.into(), value.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<InlineStr>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn with_task_domain(
        mut self,
        task_name: impl Into<InlineStr>,
        domain: impl Into<InlineStr>,
    ) -> Self {
        self.task_to_domain.insert(task_name.into(), domain.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Checks what can be checked without the server.
    pub fn validate(&self) -> TegResult<()> {
        if self.name.trim().is_empty() {
            return str_err!(IllegalArgument, "StartWorkflowRequest: name must not be empty");
        }
        if !(0..=99).contains(&self.priority) {
            return fmt_err!(
                IllegalArgument,
                "StartWorkflowRequest: priority must in range [0..=99], got {}",
                self.priority
            );
        }
        Ok(())
    }
}

impl TryFrom<serde_json::Value> for StartWorkflowRequest {
    type Error = ErrorCode;
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let mut request: StartWorkflowRequest = serde_json::from_value(value)
            .map_err(|e| ErrorCode::IllegalArgument(format!("StartWorkflowRequest: {}", e)))?;
        request.name = request.name.trim().into();
        request.correlation_id = request.correlation_id.trim().into();
        request.validate()?;
        Ok(request)
    }
}
