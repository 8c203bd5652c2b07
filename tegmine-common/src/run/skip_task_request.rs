use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkipTaskRequest {
    pub task_input: HashMap<InlineStr, Object>,
    pub task_output: HashMap<InlineStr, Object>,
}
