use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// A log line attached to a task result and shown alongside the task on the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskExecLog {
    pub log: String,
    pub task_id: InlineStr,
    pub created_time: i64,
}

impl TaskExecLog {
    pub fn new(log: impl Into<String>, task_id: &InlineStr) -> Self {
        Self {
            log: log.into(),
            task_id: task_id.clone(),
            created_time: Utc::now().timestamp_millis(),
        }
    }
}
