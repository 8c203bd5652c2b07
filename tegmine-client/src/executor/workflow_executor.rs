use futures::executor::{ThreadPool, ThreadPoolBuilder};
use tegmine_common::prelude::*;
use tegmine_common::{
    Concurrency, Monitors, RerunWorkflowRequest, SkipTaskRequest, StartWorkflowRequest, Task,
    TaskResult, TaskResultStatus, Workflow, WorkflowDef, WorkflowState, WorkflowSummary,
};

use super::{RunningWorkflow, WorkflowExecutionChannel, WorkflowMonitor};
use crate::config::ClientProperties;
use crate::http::{
    ApiClient, MetadataResourceApi, MetadataResourceClient, TaskResourceApi, TaskResourceClient,
    WorkflowResourceApi, WorkflowResourceClient,
};

/// Starts, queries and controls workflows on the server, and waits for them to finish.
pub struct WorkflowExecutor {
    workflow_client: Arc<dyn WorkflowResourceApi>,
    task_client: Arc<dyn TaskResourceApi>,
    metadata_client: Arc<dyn MetadataResourceApi>,
    monitor: WorkflowMonitor,
    start_pool: ThreadPool,
}

impl WorkflowExecutor {
    /// Connects to the server described by `properties` and starts the workflow monitor.
    pub fn new(properties: &ClientProperties) -> TegResult<Self> {
        let api_client = ApiClient::new(properties)?;
        let executor = Self::with_clients(
            Arc::new(WorkflowResourceClient::new(api_client.clone())),
            Arc::new(TaskResourceClient::new(api_client.clone())),
            Arc::new(MetadataResourceClient::new(api_client)),
            properties,
        )?;
        executor.monitor.start()?;
        Ok(executor)
    }

    /// Builds an executor over the given clients. The monitor is not started.
    pub fn with_clients(
        workflow_client: Arc<dyn WorkflowResourceApi>,
        task_client: Arc<dyn TaskResourceApi>,
        metadata_client: Arc<dyn MetadataResourceApi>,
        properties: &ClientProperties,
    ) -> TegResult<Self> {
        let start_pool = ThreadPoolBuilder::new()
            .pool_size(properties.start_workflow_pool_size.max(1))
            .name_prefix("start-workflow-")
            .create()?;
        let monitor = WorkflowMonitor::new(Arc::clone(&workflow_client), properties);
        Ok(Self {
            workflow_client,
            task_client,
            metadata_client,
            monitor,
            start_pool,
        })
    }

    pub fn monitor(&self) -> &WorkflowMonitor {
        &self.monitor
    }

    pub fn shutdown(&self) {
        self.monitor.shutdown();
    }

    pub fn register_workflow(&self, overwrite: bool, workflow_def: &WorkflowDef) -> TegResult<()> {
        self.metadata_client
            .register_workflow_def(overwrite, workflow_def)
            .map_err(|e| {
                e.add_message(format!(
                    "failed to register workflow {}.{}",
                    workflow_def.name, workflow_def.version
                ))
            })
    }

    pub fn start_workflow(&self, request: &StartWorkflowRequest) -> TegResult<InlineStr> {
        Self::start(self.workflow_client.as_ref(), request)
    }

    /// Starts every request concurrently and waits for all of them. Each outcome is independent:
    /// one failed start never affects the others.
    pub fn start_workflows(
        &self,
        monitor: bool,
        requests: Vec<StartWorkflowRequest>,
    ) -> Vec<RunningWorkflow> {
        let receivers: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let (sender, receiver) = crossbeam_channel::bounded(1);
                let workflow_client = Arc::clone(&self.workflow_client);
                let workflow_monitor = self.monitor.clone();
                self.start_pool.spawn_ok(async move {
                    let running = Concurrency::handle_panic("start_workflow", || {
                        Ok(Self::start_running(
                            workflow_client.as_ref(),
                            monitor.then_some(&workflow_monitor),
                            &request,
                        ))
                    })
                    .unwrap_or_else(RunningWorkflow::failed);
                    let _ = sender.send(running);
                });
                receiver
            })
            .collect();

        receivers
            .into_iter()
            .map(|receiver| {
                receiver.recv().unwrap_or_else(|_| {
                    RunningWorkflow::failed(ErrorCode::ChannelClosed(
                        "start workflow job dropped without a result",
                    ))
                })
            })
            .collect()
    }

    /// Watches `workflow_id` until it reaches a terminal state.
    pub fn monitor_execution(&self, workflow_id: &str) -> TegResult<WorkflowExecutionChannel> {
        self.monitor.generate_workflow_execution_channel(workflow_id)
    }

    pub fn get_workflow(
        &self,
        workflow_id: &str,
        include_tasks: bool,
    ) -> TegResult<Option<Workflow>> {
        Self::found(
            self.workflow_client
                .get_execution_status(workflow_id, include_tasks),
        )
    }

    pub fn get_workflow_status(
        &self,
        workflow_id: &str,
        include_output: bool,
        include_variables: bool,
    ) -> TegResult<Option<WorkflowState>> {
        Self::found(self.workflow_client.get_workflow_state(
            workflow_id,
            include_output,
            include_variables,
        ))
    }

    pub fn get_by_correlation_ids(
        &self,
        workflow_name: &str,
        include_closed: bool,
        include_tasks: bool,
        correlation_ids: &[InlineStr],
    ) -> TegResult<HashMap<InlineStr, Vec<Workflow>>> {
        self.workflow_client.get_workflows(
            workflow_name,
            correlation_ids,
            include_closed,
            include_tasks,
        )
    }

    pub fn search(
        &self,
        start: i32,
        size: i32,
        query: &str,
        free_text: &str,
    ) -> TegResult<Vec<WorkflowSummary>> {
        Ok(self
            .workflow_client
            .search(start, size, query, free_text)?
            .results)
    }

    pub fn pause(&self, workflow_id: &str) -> TegResult<()> {
        self.workflow_client.pause_workflow(workflow_id)
    }

    pub fn resume(&self, workflow_id: &str) -> TegResult<()> {
        self.workflow_client.resume_workflow(workflow_id)
    }

    pub fn terminate(&self, workflow_id: &str, reason: &str) -> TegResult<()> {
        let reason = Some(reason).filter(|r| !r.is_empty());
        self.workflow_client.terminate(workflow_id, reason)
    }

    pub fn restart(&self, workflow_id: &str, use_latest_definitions: bool) -> TegResult<()> {
        self.workflow_client
            .restart(workflow_id, use_latest_definitions)
    }

    pub fn retry(&self, workflow_id: &str, resume_subworkflow_tasks: bool) -> TegResult<()> {
        self.workflow_client
            .retry(workflow_id, resume_subworkflow_tasks)
    }

    /// Returns the id of the re-run workflow.
    pub fn rerun(&self, workflow_id: &str, request: &RerunWorkflowRequest) -> TegResult<InlineStr> {
        self.workflow_client.rerun(workflow_id, request)
    }

    pub fn skip_tasks_from_workflow(
        &self,
        workflow_id: &str,
        task_reference_name: &str,
        request: &SkipTaskRequest,
    ) -> TegResult<()> {
        self.workflow_client
            .skip_task_from_workflow(workflow_id, task_reference_name, request)
    }

    pub fn update_task(
        &self,
        task_id: &str,
        workflow_instance_id: &str,
        status: TaskResultStatus,
        output: HashMap<InlineStr, Object>,
    ) -> TegResult<InlineStr> {
        let mut task_result = TaskResult::from_ids(task_id, workflow_instance_id);
        task_result.status = status;
        task_result.output_data = output;
        self.task_client.update_task(&task_result)
    }

    pub fn update_task_by_ref_name(
        &self,
        task_ref_name: &str,
        workflow_instance_id: &str,
        status: TaskResultStatus,
        output: &HashMap<InlineStr, Object>,
    ) -> TegResult<InlineStr> {
        self.task_client.update_task_by_ref_name(
            workflow_instance_id,
            task_ref_name,
            status,
            output,
            None,
        )
    }

    pub fn get_task(&self, task_id: &str) -> TegResult<Option<Task>> {
        Self::found(self.task_client.get_task(task_id))
    }

    fn start(
        workflow_client: &dyn WorkflowResourceApi,
        request: &StartWorkflowRequest,
    ) -> TegResult<InlineStr> {
        let started = request
            .validate()
            .and_then(|_| workflow_client.start_workflow(request));
        match started {
            Ok(workflow_id) => {
                debug!("started workflow {} as {}", request.name, workflow_id);
                Ok(workflow_id)
            }
            Err(e) => {
                Monitors::record_workflow_start_error(&request.name, e.code());
                warn!("failed to start workflow {}: {}", request.name, e.message());
                Err(e)
            }
        }
    }

    fn start_running(
        workflow_client: &dyn WorkflowResourceApi,
        monitor: Option<&WorkflowMonitor>,
        request: &StartWorkflowRequest,
    ) -> RunningWorkflow {
        let workflow_id = match Self::start(workflow_client, request) {
            Ok(workflow_id) => workflow_id,
            Err(e) => return RunningWorkflow::failed(e),
        };
        match monitor.map(|m| m.generate_workflow_execution_channel(&workflow_id)) {
            None => RunningWorkflow::started(workflow_id, None),
            Some(Ok(channel)) => RunningWorkflow::started(workflow_id, Some(channel)),
            Some(Err(e)) => RunningWorkflow {
                workflow_id,
                execution_channel: None,
                error: Some(e),
            },
        }
    }

    /// Lookups answer "absent" instead of failing on `NotFound`.
    fn found<T>(result: TegResult<T>) -> TegResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Drop for WorkflowExecutor {
    fn drop(&mut self) {
        self.monitor.shutdown();
    }
}
