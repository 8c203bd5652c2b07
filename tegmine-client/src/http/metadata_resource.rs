use reqwest::Method;
use tegmine_common::prelude::*;
use tegmine_common::WorkflowDef;

use super::ApiClient;

/// Metadata endpoints of the server.
pub trait MetadataResourceApi: Send + Sync {
    /// Creates the definition, or replaces an existing one when `overwrite` is set.
    fn register_workflow_def(&self, overwrite: bool, workflow_def: &WorkflowDef) -> TegResult<()>;

    fn get_workflow_def(&self, name: &str, version: Option<i32>) -> TegResult<WorkflowDef>;
}

pub struct MetadataResourceClient {
    api_client: ApiClient,
}

impl MetadataResourceClient {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }
}

impl MetadataResourceApi for MetadataResourceClient {
    fn register_workflow_def(&self, overwrite: bool, workflow_def: &WorkflowDef) -> TegResult<()> {
        let builder = if overwrite {
            self.api_client
                .request(Method::PUT, "/metadata/workflow")
                .json(&[workflow_def])
        } else {
            self.api_client
                .request(Method::POST, "/metadata/workflow")
                .json(workflow_def)
        };
        self.api_client.execute(builder)?;
        Ok(())
    }

    fn get_workflow_def(&self, name: &str, version: Option<i32>) -> TegResult<WorkflowDef> {
        let path = format!("/metadata/workflow/{}", ApiClient::escape(name));
        let mut builder = self.api_client.request(Method::GET, &path);
        if let Some(version) = version {
            builder = builder.query(&[("version", version)]);
        }
        self.api_client
            .execute_json::<WorkflowDef>(builder)?
            .ok_or_else(|| ErrorCode::NotFound(format!("workflow def {} not found", name)))
    }
}
