mod config;
mod executor;
mod http;

pub use config::{ClientProperties, WatchPolicy};
pub use executor::{RunningWorkflow, WorkflowExecutionChannel, WorkflowExecutor, WorkflowMonitor};
pub use http::{
    ApiClient, MetadataResourceApi, MetadataResourceClient, TaskResourceApi, TaskResourceClient,
    WorkflowResourceApi, WorkflowResourceClient,
};
