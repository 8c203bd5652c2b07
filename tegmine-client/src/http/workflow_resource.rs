use reqwest::Method;
use tegmine_common::prelude::*;
use tegmine_common::{
    RerunWorkflowRequest, SearchResult, SkipTaskRequest, StartWorkflowRequest, Workflow,
    WorkflowState, WorkflowSummary,
};

use super::ApiClient;

/// Workflow endpoints of the server.
pub trait WorkflowResourceApi: Send + Sync {
    /// Starts a workflow and returns the new instance id.
    fn start_workflow(&self, request: &StartWorkflowRequest) -> TegResult<InlineStr>;

    fn get_execution_status(&self, workflow_id: &str, include_tasks: bool) -> TegResult<Workflow>;

    fn get_workflow_state(
        &self,
        workflow_id: &str,
        include_output: bool,
        include_variables: bool,
    ) -> TegResult<WorkflowState>;

    fn pause_workflow(&self, workflow_id: &str) -> TegResult<()>;

    fn resume_workflow(&self, workflow_id: &str) -> TegResult<()>;

    fn terminate(&self, workflow_id: &str, reason: Option<&str>) -> TegResult<()>;

    fn restart(&self, workflow_id: &str, use_latest_definitions: bool) -> TegResult<()>;

    fn retry(&self, workflow_id: &str, resume_subworkflow_tasks: bool) -> TegResult<()>;

    /// Returns the id of the re-run workflow.
    fn rerun(&self, workflow_id: &str, request: &RerunWorkflowRequest) -> TegResult<InlineStr>;

    fn skip_task_from_workflow(
        &self,
        workflow_id: &str,
        task_reference_name: &str,
        request: &SkipTaskRequest,
    ) -> TegResult<()>;

    fn search(
        &self,
        start: i32,
        size: i32,
        query: &str,
        free_text: &str,
    ) -> TegResult<SearchResult<WorkflowSummary>>;

    /// Workflows of `name` grouped by each of the given correlation ids.
    fn get_workflows(
        &self,
        name: &str,
        correlation_ids: &[InlineStr],
        include_closed: bool,
        include_tasks: bool,
    ) -> TegResult<HashMap<InlineStr, Vec<Workflow>>>;
}

pub struct WorkflowResourceClient {
    api_client: ApiClient,
}

impl WorkflowResourceClient {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    fn workflow_path(workflow_id: &str, suffix: &str) -> String {
        format!("/workflow/{}{}", ApiClient::escape(workflow_id), suffix)
    }

    fn send(&self, method: Method, path: &str, query: &[(&str, String)]) -> TegResult<()> {
        let builder = self.api_client.request(method, path).query(query);
        self.api_client.execute(builder)?;
        Ok(())
    }
}

impl WorkflowResourceApi for WorkflowResourceClient {
    fn start_workflow(&self, request: &StartWorkflowRequest) -> TegResult<InlineStr> {
        let builder = self
            .api_client
            .request(Method::POST, "/workflow")
            .json(request);
        self.api_client.execute_text(builder)
    }

    fn get_execution_status(&self, workflow_id: &str, include_tasks: bool) -> TegResult<Workflow> {
        let builder = self
            .api_client
            .request(Method::GET, &Self::workflow_path(workflow_id, ""))
            .query(&[("includeTasks", include_tasks)]);
        self.api_client
            .execute_json::<Workflow>(builder)?
            .ok_or_else(|| ErrorCode::NotFound(format!("workflow {} not found", workflow_id)))
    }

    fn get_workflow_state(
        &self,
        workflow_id: &str,
        include_output: bool,
        include_variables: bool,
    ) -> TegResult<WorkflowState> {
        let builder = self
            .api_client
            .request(Method::GET, &Self::workflow_path(workflow_id, "/status"))
            .query(&[
                ("includeOutput", include_output),
                ("includeVariables", include_variables),
            ]);
        self.api_client
            .execute_json::<WorkflowState>(builder)?
            .ok_or_else(|| ErrorCode::NotFound(format!("workflow {} not found", workflow_id)))
    }

    fn pause_workflow(&self, workflow_id: &str) -> TegResult<()> {
        self.send(Method::PUT, &Self::workflow_path(workflow_id, "/pause"), &[])
    }

    fn resume_workflow(&self, workflow_id: &str) -> TegResult<()> {
        self.send(Method::PUT, &Self::workflow_path(workflow_id, "/resume"), &[])
    }

    fn terminate(&self, workflow_id: &str, reason: Option<&str>) -> TegResult<()> {
        let query = reason
            .map(|reason| vec![("reason", reason.to_string())])
            .unwrap_or_default();
        self.send(Method::DELETE, &Self::workflow_path(workflow_id, ""), &query)
    }

    fn restart(&self, workflow_id: &str, use_latest_definitions: bool) -> TegResult<()> {
        self.send(
            Method::POST,
            &Self::workflow_path(workflow_id, "/restart"),
            &[("useLatestDefinitions", use_latest_definitions.to_string())],
        )
    }

    fn retry(&self, workflow_id: &str, resume_subworkflow_tasks: bool) -> TegResult<()> {
        self.send(
            Method::POST,
            &Self::workflow_path(workflow_id, "/retry"),
            &[(
                "resumeSubworkflowTasks",
                resume_subworkflow_tasks.to_string(),
            )],
        )
    }

    fn rerun(&self, workflow_id: &str, request: &RerunWorkflowRequest) -> TegResult<InlineStr> {
        let builder = self
            .api_client
            .request(Method::POST, &Self::workflow_path(workflow_id, "/rerun"))
            .json(request);
        self.api_client.execute_text(builder)
    }

    fn skip_task_from_workflow(
        &self,
        workflow_id: &str,
        task_reference_name: &str,
        request: &SkipTaskRequest,
    ) -> TegResult<()> {
        let suffix = format!("/skiptask/{}", ApiClient::escape(task_reference_name));
        let builder = self
            .api_client
            .request(Method::PUT, &Self::workflow_path(workflow_id, &suffix))
            .json(request);
        self.api_client.execute(builder)?;
        Ok(())
    }

    fn search(
        &self,
        start: i32,
        size: i32,
        query: &str,
        free_text: &str,
    ) -> TegResult<SearchResult<WorkflowSummary>> {
        let builder = self
            .api_client
            .request(Method::GET, "/workflow/search")
            .query(&[
                ("start", start.to_string()),
                ("size", size.to_string()),
                ("query", query.to_string()),
                ("freeText", free_text.to_string()),
            ]);
        Ok(self.api_client.execute_json(builder)?.unwrap_or_default())
    }

    fn get_workflows(
        &self,
        name: &str,
        correlation_ids: &[InlineStr],
        include_closed: bool,
        include_tasks: bool,
    ) -> TegResult<HashMap<InlineStr, Vec<Workflow>>> {
        let path = format!("/workflow/{}/correlated", ApiClient::escape(name));
        let builder = self
            .api_client
            .request(Method::POST, &path)
            .query(&[
                ("includeClosed", include_closed),
                ("includeTasks", include_tasks),
            ])
            .json(correlation_ids);
        Ok(self.api_client.execute_json(builder)?.unwrap_or_default())
    }
}
