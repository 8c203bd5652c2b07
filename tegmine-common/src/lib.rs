mod common;
mod exception;
mod metadata;
mod metrics;
mod model;
mod run;
mod utils;

pub use metadata::{TimeoutPolicy, WorkflowDef};
pub use metrics::Monitors;
pub use model::{
    SearchResult, Task, TaskStatus, Workflow, WorkflowState, WorkflowStatus, WorkflowSummary,
};
pub use run::{
    RerunWorkflowRequest, SkipTaskRequest, StartWorkflowRequest, TaskExecLog, TaskResult,
    TaskResultStatus,
};
pub use utils::{Concurrency, EnvKey, EnvUtils, Shutdown};

pub mod prelude;

#[macro_use]
pub(crate) mod macros;
