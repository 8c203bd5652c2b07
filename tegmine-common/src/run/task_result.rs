use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

use super::task_exec_log::TaskExecLog;
use crate::model::Task;
use crate::prelude::*;

/// Result of the task execution.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskResult {
    pub workflow_instance_id: InlineStr,
    pub task_id: InlineStr,
    pub reason_for_incompletion: InlineStr,
    /// Only meaningful with `InProgress`: the server will not hand the task out again before
    /// this many seconds have passed.
    pub callback_after_seconds: i64,
    pub worker_id: InlineStr,
    pub status: TaskResultStatus,
    pub output_data: HashMap<InlineStr, Object>,
    pub logs: Vec<TaskExecLog>,
    #[serde(skip_serializing_if = "is_blank")]
    pub external_output_payload_storage_path: InlineStr,
    #[serde(skip_serializing_if = "is_blank")]
    pub sub_workflow_id: InlineStr,
    pub extend_lease: bool,
}

impl TaskResult {
    /// A result answering `task`, carrying its ids and the worker that polled it.
    pub fn new(task: &Task) -> Self {
        Self {
            workflow_instance_id: task.workflow_instance_id.clone(),
            task_id: task.task_id.clone(),
            reason_for_incompletion: task.reason_for_incompletion.clone(),
            callback_after_seconds: task.callback_after_seconds,
            worker_id: task.worker_id.clone(),
            status: TaskResultStatus::InProgress,
            output_data: task.output_data.clone(),
            ..Default::default()
        }
    }

    pub fn from_ids(
        task_id: impl Into<InlineStr>,
        workflow_instance_id: impl Into<InlineStr>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            workflow_instance_id: workflow_instance_id.into(),
            ..Default::default()
        }
    }

    /// A result that names no task at all cannot be reported.
    pub fn is_empty(&self) -> bool {
        self.task_id.is_empty() && self.workflow_instance_id.is_empty()
    }

    pub fn answers(&self, task: &Task) -> bool {
        self.task_id == task.task_id && self.workflow_instance_id == task.workflow_instance_id
    }

    pub fn completed(mut self) -> Self {
        self.status = TaskResultStatus::Completed;
        self
    }

    pub fn failed(mut self, reason: impl Into<InlineStr>) -> Self {
        self.status = TaskResultStatus::Failed;
        self.reason_for_incompletion = reason.into();
        self
    }

    pub fn failed_with_terminal_error(mut self, reason: impl Into<InlineStr>) -> Self {
        self.status = TaskResultStatus::FailedWithTerminalError;
        self.reason_for_incompletion = reason.into();
        self
    }

    pub fn in_progress(mut self, callback_after_seconds: i64) -> Self {
        self.status = TaskResultStatus::InProgress;
        self.callback_after_seconds = callback_after_seconds;
        self
    }

    pub fn with_output(mut self, key: impl Into<InlineStr>, value: impl Into<Object>) -> Self {
        self.output_data.insert(key.into(), value.into());
        self
    }

    pub fn log(&mut self, log: impl Into<String>) {
        let log = TaskExecLog::new(log, &self.task_id);
        self.logs.push(log);
    }

    pub fn to_json_string(&self) -> TegResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn parse(input_json: &str) -> TegResult<TaskResult> {
        Ok(serde_json::from_str(input_json)?)
    }
}

fn is_blank(value: &InlineStr) -> bool {
    value.is_empty()
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskResultStatus {
    #[default]
    InProgress,
    Failed,
    FailedWithTerminalError,
    Completed,
}

impl TaskResultStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TaskResultStatus::Failed | TaskResultStatus::FailedWithTerminalError
        )
    }
}
