mod search_result;
mod task;
mod workflow;
mod workflow_summary;

pub use search_result::SearchResult;
pub use task::{Task, TaskStatus};
pub use workflow::{Workflow, WorkflowState, WorkflowStatus};
pub use workflow_summary::WorkflowSummary;
