use reqwest::Method;
use tegmine_common::prelude::*;
use tegmine_common::{Task, TaskResult, TaskResultStatus};

use super::ApiClient;

/// Task endpoints of the server.
pub trait TaskResourceApi: Send + Sync {
    /// Claims up to `count` tasks of `task_type`. A "no content" answer is an empty batch.
    fn batch_poll(
        &self,
        task_type: &str,
        worker_id: &str,
        count: usize,
        timeout_ms: u64,
        domain: Option<&str>,
    ) -> TegResult<Vec<Task>>;

    /// Reports a result, returning the id of the updated task.
    fn update_task(&self, task_result: &TaskResult) -> TegResult<InlineStr>;

    /// Updates the latest task with `task_ref_name` in a workflow, without knowing its id.
    fn update_task_by_ref_name(
        &self,
        workflow_id: &str,
        task_ref_name: &str,
        status: TaskResultStatus,
        output: &HashMap<InlineStr, Object>,
        worker_id: Option<&str>,
    ) -> TegResult<InlineStr>;

    fn get_task(&self, task_id: &str) -> TegResult<Task>;
}

pub struct TaskResourceClient {
    api_client: ApiClient,
}

impl TaskResourceClient {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }
}

impl TaskResourceApi for TaskResourceClient {
    fn batch_poll(
        &self,
        task_type: &str,
        worker_id: &str,
        count: usize,
        timeout_ms: u64,
        domain: Option<&str>,
    ) -> TegResult<Vec<Task>> {
        let path = format!("/tasks/poll/batch/{}", ApiClient::escape(task_type));
        let mut builder = self.api_client.request(Method::GET, &path).query(&[
            ("workerid", worker_id.to_string()),
            ("count", count.to_string()),
            ("timeout", timeout_ms.to_string()),
        ]);
        if let Some(domain) = domain.filter(|d| !d.is_empty()) {
            builder = builder.query(&[("domain", domain)]);
        }
        Ok(self
            .api_client
            .execute_json::<Vec<Task>>(builder)?
            .unwrap_or_default())
    }

    fn update_task(&self, task_result: &TaskResult) -> TegResult<InlineStr> {
        let builder = self
            .api_client
            .request(Method::POST, "/tasks")
            .json(task_result);
        self.api_client.execute_text(builder)
    }

    fn update_task_by_ref_name(
        &self,
        workflow_id: &str,
        task_ref_name: &str,
        status: TaskResultStatus,
        output: &HashMap<InlineStr, Object>,
        worker_id: Option<&str>,
    ) -> TegResult<InlineStr> {
        let path = format!(
            "/tasks/{}/{}/{}",
            ApiClient::escape(workflow_id),
            ApiClient::escape(task_ref_name),
            status.as_ref()
        );
        let mut builder = self.api_client.request(Method::POST, &path).json(output);
        if let Some(worker_id) = worker_id {
            builder = builder.query(&[("workerid", worker_id)]);
        }
        self.api_client.execute_text(builder)
    }

    fn get_task(&self, task_id: &str) -> TegResult<Task> {
        let path = format!("/tasks/{}", ApiClient::escape(task_id));
        let builder = self.api_client.request(Method::GET, &path);
        self.api_client
            .execute_json::<Task>(builder)?
            .ok_or_else(|| ErrorCode::NotFound(format!("task {} not found", task_id)))
    }
}
