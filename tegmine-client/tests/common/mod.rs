#![allow(dead_code)]

use tegmine_client::{MetadataResourceApi, TaskResourceApi, WorkflowResourceApi};
use tegmine_common::prelude::*;
use tegmine_common::{
    RerunWorkflowRequest, SearchResult, SkipTaskRequest, StartWorkflowRequest, Task, TaskResult,
    TaskResultStatus, Workflow, WorkflowDef, WorkflowState, WorkflowStatus, WorkflowSummary,
};

pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}

/// In-memory server: workflows are created by `start_workflow` (id = `<name>-id`) or `insert`.
#[derive(Default)]
pub struct FakeWorkflowClient {
    workflows: Mutex<HashMap<InlineStr, Workflow>>,
    /// Status fetches after which a workflow turns COMPLETED.
    complete_after: Mutex<HashMap<InlineStr, usize>>,
    fetches: Mutex<HashMap<InlineStr, usize>>,
    /// Ids whose status fetch fails with a server error.
    failing: Mutex<HashSet<InlineStr>>,
    /// Ids whose status fetch panics.
    panicking: Mutex<HashSet<InlineStr>>,
    calls: Mutex<Vec<String>>,
}

impl FakeWorkflowClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, workflow_id: &str, status: WorkflowStatus) {
        self.workflows
            .lock()
            .insert(InlineStr::from(workflow_id), Workflow::new(workflow_id, status));
    }

    pub fn set_status(&self, workflow_id: &str, status: WorkflowStatus) {
        if let Some(workflow) = self.workflows.lock().get_mut(workflow_id) {
            workflow.status = status;
        }
    }

    pub fn complete_after(&self, workflow_id: &str, fetches: usize) {
        self.complete_after
            .lock()
            .insert(InlineStr::from(workflow_id), fetches);
    }

    pub fn fail_fetches_of(&self, workflow_id: &str) {
        self.failing.lock().insert(InlineStr::from(workflow_id));
    }

    pub fn panic_on_fetch_of(&self, workflow_id: &str) {
        self.panicking.lock().insert(InlineStr::from(workflow_id));
    }

    pub fn fetch_count(&self, workflow_id: &str) -> usize {
        self.fetches.lock().get(workflow_id).copied().unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn control(&self, call: String, workflow_id: &str) -> TegResult<()> {
        if !self.workflows.lock().contains_key(workflow_id) {
            return fmt_err!(NotFound, "workflow {} not found", workflow_id);
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

impl WorkflowResourceApi for FakeWorkflowClient {
    fn start_workflow(&self, request: &StartWorkflowRequest) -> TegResult<InlineStr> {
        if request.name.as_str() == "unreachable" {
            return str_err!(RemoteCallFailed, "POST /workflow failed with status 500");
        }
        let workflow_id = InlineStr::from(format!("{}-id", request.name));
        let mut workflow = Workflow::new(workflow_id.clone(), WorkflowStatus::Running);
        workflow.workflow_name = request.name.clone();
        self.workflows.lock().insert(workflow_id.clone(), workflow);
        Ok(workflow_id)
    }

    fn get_execution_status(&self, workflow_id: &str, _include_tasks: bool) -> TegResult<Workflow> {
        let fetches = {
            let mut all = self.fetches.lock();
            let count = all.entry(InlineStr::from(workflow_id)).or_insert(0);
            *count += 1;
            *count
        };
        if self.panicking.lock().contains(workflow_id) {
            panic!("status decoder blew up on {}", workflow_id);
        }
        if self.failing.lock().contains(workflow_id) {
            return fmt_err!(RemoteCallFailed, "GET /workflow/{} failed", workflow_id);
        }
        if let Some(after) = self.complete_after.lock().get(workflow_id) {
            if fetches >= *after {
                self.set_status(workflow_id, WorkflowStatus::Completed);
            }
        }
        self.workflows
            .lock()
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| ErrorCode::NotFound(format!("workflow {} not found", workflow_id)))
    }

    fn get_workflow_state(
        &self,
        workflow_id: &str,
        _include_output: bool,
        _include_variables: bool,
    ) -> TegResult<WorkflowState> {
        let workflows = self.workflows.lock();
        let workflow = workflows
            .get(workflow_id)
            .ok_or_else(|| ErrorCode::NotFound(format!("workflow {} not found", workflow_id)))?;
        Ok(WorkflowState {
            workflow_id: workflow.workflow_id.clone(),
            status: workflow.status,
            ..Default::default()
        })
    }

    fn pause_workflow(&self, workflow_id: &str) -> TegResult<()> {
        self.control(format!("pause {}", workflow_id), workflow_id)
    }

    fn resume_workflow(&self, workflow_id: &str) -> TegResult<()> {
        self.control(format!("resume {}", workflow_id), workflow_id)
    }

    fn terminate(&self, workflow_id: &str, reason: Option<&str>) -> TegResult<()> {
        self.control(
            format!("terminate {} {}", workflow_id, reason.unwrap_or("-")),
            workflow_id,
        )?;
        self.set_status(workflow_id, WorkflowStatus::Terminated);
        Ok(())
    }

    fn restart(&self, workflow_id: &str, use_latest_definitions: bool) -> TegResult<()> {
        self.control(
            format!("restart {} {}", workflow_id, use_latest_definitions),
            workflow_id,
        )
    }

    fn retry(&self, workflow_id: &str, resume_subworkflow_tasks: bool) -> TegResult<()> {
        self.control(
            format!("retry {} {}", workflow_id, resume_subworkflow_tasks),
            workflow_id,
        )
    }

    fn rerun(&self, workflow_id: &str, request: &RerunWorkflowRequest) -> TegResult<InlineStr> {
        self.control(
            format!("rerun {} {}", workflow_id, request.re_run_from_task_id),
            workflow_id,
        )?;
        Ok(InlineStr::from(workflow_id))
    }

    fn skip_task_from_workflow(
        &self,
        workflow_id: &str,
        task_reference_name: &str,
        _request: &SkipTaskRequest,
    ) -> TegResult<()> {
        self.control(
            format!("skip {} {}", workflow_id, task_reference_name),
            workflow_id,
        )
    }

    fn search(
        &self,
        start: i32,
        size: i32,
        _query: &str,
        _free_text: &str,
    ) -> TegResult<SearchResult<WorkflowSummary>> {
        let mut ids: Vec<InlineStr> = self.workflows.lock().keys().cloned().collect();
        ids.sort();
        let results: Vec<WorkflowSummary> = ids
            .into_iter()
            .skip(start.max(0) as usize)
            .take(size.max(0) as usize)
            .map(|workflow_id| WorkflowSummary {
                workflow_id,
                ..Default::default()
            })
            .collect();
        Ok(SearchResult {
            total_hits: results.len() as i64,
            results,
        })
    }

    fn get_workflows(
        &self,
        _name: &str,
        correlation_ids: &[InlineStr],
        _include_closed: bool,
        _include_tasks: bool,
    ) -> TegResult<HashMap<InlineStr, Vec<Workflow>>> {
        Ok(correlation_ids
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect())
    }
}

#[derive(Default)]
pub struct FakeTaskClient {
    pub tasks: Mutex<HashMap<InlineStr, Task>>,
    pub updates: Mutex<Vec<TaskResult>>,
}

impl TaskResourceApi for FakeTaskClient {
    fn batch_poll(
        &self,
        _task_type: &str,
        _worker_id: &str,
        _count: usize,
        _timeout_ms: u64,
        _domain: Option<&str>,
    ) -> TegResult<Vec<Task>> {
        Ok(Vec::new())
    }

    fn update_task(&self, task_result: &TaskResult) -> TegResult<InlineStr> {
        self.updates.lock().push(task_result.clone());
        Ok(task_result.task_id.clone())
    }

    fn update_task_by_ref_name(
        &self,
        workflow_id: &str,
        task_ref_name: &str,
        status: TaskResultStatus,
        output: &HashMap<InlineStr, Object>,
        _worker_id: Option<&str>,
    ) -> TegResult<InlineStr> {
        let mut task_result = TaskResult::from_ids(task_ref_name, workflow_id);
        task_result.status = status;
        task_result.output_data = output.clone();
        self.updates.lock().push(task_result);
        Ok(InlineStr::from(task_ref_name))
    }

    fn get_task(&self, task_id: &str) -> TegResult<Task> {
        self.tasks
            .lock()
            .get(task_id)
            .cloned()
            .ok_or_else(|| ErrorCode::NotFound(format!("task {} not found", task_id)))
    }
}

#[derive(Default)]
pub struct FakeMetadataClient {
    pub defs: Mutex<HashMap<InlineStr, WorkflowDef>>,
}

impl MetadataResourceApi for FakeMetadataClient {
    fn register_workflow_def(&self, overwrite: bool, workflow_def: &WorkflowDef) -> TegResult<()> {
        let mut defs = self.defs.lock();
        if !overwrite && defs.contains_key(&workflow_def.name) {
            return fmt_err!(Conflict, "workflow {} already exists", workflow_def.name);
        }
        defs.insert(workflow_def.name.clone(), workflow_def.clone());
        Ok(())
    }

    fn get_workflow_def(&self, name: &str, _version: Option<i32>) -> TegResult<WorkflowDef> {
        self.defs
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| ErrorCode::NotFound(format!("workflow def {} not found", name)))
    }
}
