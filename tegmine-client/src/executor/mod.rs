mod running_workflow;
mod workflow_executor;
mod workflow_monitor;

pub use running_workflow::{RunningWorkflow, WorkflowExecutionChannel};
pub use workflow_executor::WorkflowExecutor;
pub use workflow_monitor::WorkflowMonitor;
