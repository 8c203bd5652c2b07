mod workflow_def;

pub use workflow_def::{TimeoutPolicy, WorkflowDef};
