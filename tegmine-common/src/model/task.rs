use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

use crate::prelude::*;

/// A unit of work handed to a worker by a batch poll.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub task_type: InlineStr,
    pub status: TaskStatus,
    pub input_data: HashMap<InlineStr, Object>,
    pub reference_task_name: InlineStr,
    pub retry_count: i32,
    pub seq: i32,
    pub correlation_id: InlineStr,
    pub poll_count: i32,
    pub task_def_name: InlineStr,
    /// Time when the task was scheduled
    pub scheduled_time: i64,
    /// Time when the task was first polled
    pub start_time: i64,
    /// Time when the task completed executing
    pub end_time: i64,
    /// Time when the task was last updated
    pub update_time: i64,
    pub start_delay_in_seconds: i32,
    pub retried_task_id: InlineStr,
    pub retried: bool,
    pub executed: bool,
    pub callback_from_worker: bool,
    pub response_timeout_seconds: i64,
    pub workflow_instance_id: InlineStr,
    pub workflow_type: InlineStr,
    pub task_id: InlineStr,
    pub reason_for_incompletion: InlineStr,
    pub callback_after_seconds: i64,
    pub worker_id: InlineStr,
    pub output_data: HashMap<InlineStr, Object>,
    pub domain: InlineStr,
    pub workflow_priority: i32,
    pub iteration: i32,
    pub sub_workflow_id: InlineStr,
}

impl Task {
    pub fn new(
        task_type: impl Into<InlineStr>,
        workflow_instance_id: impl Into<InlineStr>,
        task_id: impl Into<InlineStr>,
    ) -> Self {
        let task_type = task_type.into();
        Self {
            task_def_name: task_type.clone(),
            task_type,
            status: TaskStatus::InProgress,
            workflow_instance_id: workflow_instance_id.into(),
            task_id: task_id.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, key: impl Into<InlineStr>, value: impl Into<Object>) -> Self {
        self.input_data.insert(key.into(), value.into());
        self
    }
}

#[derive(
    Clone, Copy, Debug, Default, EnumString, AsRefStr, PartialEq, Eq, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    InProgress,
    Canceled,
    Failed,
    FailedWithTerminalError,
    Completed,
    CompletedWithErrors,
    #[default]
    Scheduled,
    TimedOut,
    Skipped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::InProgress | TaskStatus::Scheduled)
    }

    pub fn is_successful(&self) -> bool {
        !matches!(
            self,
            TaskStatus::Canceled
                | TaskStatus::Failed
                | TaskStatus::FailedWithTerminalError
                | TaskStatus::TimedOut
        )
    }
}
