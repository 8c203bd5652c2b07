mod api_client;
mod metadata_resource;
mod task_resource;
mod workflow_resource;

pub use api_client::ApiClient;
pub use metadata_resource::{MetadataResourceApi, MetadataResourceClient};
pub use task_resource::{TaskResourceApi, TaskResourceClient};
pub use workflow_resource::{WorkflowResourceApi, WorkflowResourceClient};
