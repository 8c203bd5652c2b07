use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

use crate::prelude::*;

/// A workflow definition as registered with the server. Task entries are kept as opaque
/// objects; the server validates and interprets them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowDef {
    /// Name of the workflow
    pub name: InlineStr,
    /// Description of the workflow
    pub description: InlineStr,
    /// Numeric field used to identify the version of the schema. Use incrementing numbers.
    pub version: i32,
    /// An array of task configurations.
    pub tasks: Vec<Object>,
    /// List of input parameters. Used for documenting the required inputs to workflow
    pub input_parameters: Vec<InlineStr>,
    /// JSON template used to generate the output of the workflow
    pub output_parameters: HashMap<InlineStr, Object>,
    /// Default input values.
    pub input_template: HashMap<InlineStr, Object>,
    /// Workflow to be run on current Workflow failure. Useful for cleanup or post actions on
    /// failure.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub failure_workflow: String,
    /// Current Tegmine Schema version. schemaVersion 1 is discontinued.
    pub schema_version: i32,
    /// Flag to allow Workflow restarts
    pub restartable: bool,
    /// Enable status callback.
    pub workflow_status_listener_enabled: bool,
    /// Email address of the team that owns the workflow
    pub owner_email: InlineStr,
    /// The timeout in seconds after which the workflow will be marked as TIMED_OUT if it hasn't
    /// been moved to a terminal state
    pub timeout_seconds: i64,
    /// Workflow's timeout policy
    pub timeout_policy: TimeoutPolicy,
    pub variables: HashMap<InlineStr, Object>,
}

impl WorkflowDef {
    pub fn new(name: impl Into<InlineStr>, version: i32) -> Self {
        Self {
            name: name.into(),
            version,
            ..Default::default()
        }
    }

    pub fn with_task(mut self, task: serde_json::Value) -> Self {
        self.tasks.push(Object::from_json(&task));
        self
    }
}

impl Default for WorkflowDef {
    fn default() -> Self {
        Self {
            name: InlineStr::new(),
            description: InlineStr::new(),
            version: 1,
            tasks: Vec::new(),
            input_parameters: Vec::new(),
            output_parameters: HashMap::new(),
            input_template: HashMap::new(),
            failure_workflow: String::new(),
            schema_version: 2,
            restartable: true,
            workflow_status_listener_enabled: false,
            owner_email: InlineStr::new(),
            timeout_seconds: 0,
            timeout_policy: TimeoutPolicy::TimeOutWf,
            variables: HashMap::new(),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeoutPolicy {
    /// Workflow is marked as TIMED_OUT and terminated
    #[default]
    TimeOutWf,
    /// Registers a counter (workflow_failure with status tag set to TIMED_OUT)
    AlertOnly,
}
