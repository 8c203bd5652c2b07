use std::thread;

use tegmine_client::TaskResourceApi;
use tegmine_common::prelude::*;
use tegmine_common::{Concurrency, Monitors, Shutdown, Task, TaskResult};

use crate::config::WorkerProperties;
use crate::{UpdateRetryPolicy, Worker};

/// How a runner waits between report attempts.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Poll, execute and report loop for one worker.
///
/// Each cycle claims up to `batch_size` tasks, runs the worker on them one by one and reports
/// every result with bounded retry. Errors of a cycle are logged and the loop moves on to the
/// next cycle; nothing but the report step is retried.
pub struct TaskRunner {
    worker: Arc<dyn Worker>,
    task_client: Arc<dyn TaskResourceApi>,
    worker_id: InlineStr,
    retry_policy: UpdateRetryPolicy,
    sleeper: Sleeper,
}

impl TaskRunner {
    pub fn new(
        worker: Arc<dyn Worker>,
        task_client: Arc<dyn TaskResourceApi>,
        properties: &WorkerProperties,
    ) -> Self {
        Self {
            worker,
            task_client,
            worker_id: properties.worker_id.clone(),
            retry_policy: UpdateRetryPolicy::new(
                properties.update_retry_attempts,
                properties.update_retry_backoff,
            ),
            sleeper: Arc::new(thread::sleep),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn task_type(&self) -> &str {
        self.worker.task_def_name()
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Claims up to `count` tasks. Errors are returned as is, never retried here.
    pub fn batch_poll(&self, count: usize) -> TegResult<Vec<Task>> {
        let task_type = self.task_type();
        if count == 0 {
            return fmt_err!(
                IllegalArgument,
                "batch size of {} must be greater than 0, got {}",
                task_type,
                count
            );
        }

        Monitors::record_task_poll(task_type);
        let started = Instant::now();
        let polled = self.task_client.batch_poll(
            task_type,
            &self.worker_id,
            count,
            self.worker.poll_timeout().as_millis() as u64,
            self.worker.domain(),
        );
        Monitors::record_task_poll_time(task_type, started.elapsed().as_secs_f64());

        let mut tasks = polled.map_err(|e| {
            Monitors::record_task_poll_error(task_type, e.code());
            e.add_message(format!("failed to poll {}", task_type))
        })?;
        if tasks.len() > count {
            warn!(
                "poll of {} returned {} tasks for a batch of {}, extra tasks dropped",
                task_type,
                tasks.len(),
                count
            );
            tasks.truncate(count);
        }

        Monitors::record_task_poll_count(task_type, tasks.len());
        trace!("polled {} tasks of {}", tasks.len(), task_type);
        Ok(tasks)
    }

    /// Runs the worker on `task`. A failing or panicking worker yields a FAILED result; only a
    /// result that cannot be reported is an error.
    pub fn execute_task(&self, task: &Task) -> TegResult<TaskResult> {
        let task_type = self.task_type();
        debug!("executing task {} of {}", task.task_id, task_type);

        let started = Instant::now();
        let executed = Concurrency::handle_panic(task_type, || self.worker.execute(task));
        Monitors::record_task_execute_time(task_type, started.elapsed().as_secs_f64() * 1000.0);

        let mut task_result = match executed {
            Ok(task_result) if task_result.is_empty() => {
                Monitors::record_task_execute_error(task_type, ErrorCode::empty_task_result_code());
                return fmt_err!(
                    EmptyTaskResult,
                    "task result cannot be empty, task {} of {}",
                    task.task_id,
                    task_type
                );
            }
            Ok(task_result) if !task_result.answers(task) => {
                Monitors::record_task_execute_error(task_type, ErrorCode::illegal_argument_code());
                return fmt_err!(
                    IllegalArgument,
                    "result for task {}/{} answers task {}/{}",
                    task_result.workflow_instance_id,
                    task_result.task_id,
                    task.workflow_instance_id,
                    task.task_id
                );
            }
            Ok(task_result) => task_result,
            Err(e) => {
                Monitors::record_task_execute_error(task_type, e.code());
                warn!(
                    "worker of {} failed on task {}: {}",
                    task_type,
                    task.task_id,
                    e.message()
                );
                TaskResult::new(task).failed(e.message())
            }
        };

        if task_result.worker_id.is_empty() {
            task_result.worker_id = self.worker_id.clone();
        }
        if task_result.status.is_failure() && task_result.reason_for_incompletion.is_empty() {
            task_result.reason_for_incompletion = InlineStr::from("task failed without a reason");
        }
        Ok(task_result)
    }

    /// Reports `task_result`, retrying with doubling backoff. Exhausted attempts are a
    /// `TaskUpdateFailed` error naming the task type.
    pub fn update_task_with_retry(&self, task_result: &TaskResult) -> TegResult<InlineStr> {
        let task_type = self.task_type();
        self.retry_policy
            .execute(
                |_| {
                    let started = Instant::now();
                    let updated = self.task_client.update_task(task_result);
                    Monitors::record_task_update_time(
                        task_type,
                        started.elapsed().as_secs_f64() * 1000.0,
                    );
                    if let Err(e) = &updated {
                        Monitors::record_task_update_error(task_type, e.code());
                        warn!(
                            "failed to update task {} of {}: {}",
                            task_result.task_id,
                            task_type,
                            e.message()
                        );
                    }
                    updated
                },
                self.sleeper.as_ref(),
            )
            .map_err(|e| {
                ErrorCode::TaskUpdateFailed(format!(
                    "failed to update taskType: {}, after {} attempts: {}",
                    task_type,
                    self.retry_policy.attempts,
                    e.message()
                ))
            })
    }

    /// One cycle: poll a batch, then execute and report each task in order. Returns the number
    /// of tasks polled.
    pub fn poll_and_execute(&self) -> TegResult<usize> {
        let tasks = self.batch_poll(self.worker.batch_size())?;
        let polled = tasks.len();
        for task in tasks {
            let reported = self
                .execute_task(&task)
                .and_then(|task_result| self.update_task_with_retry(&task_result));
            match reported {
                Ok(_) => debug!("task {} of {} reported", task.task_id, self.task_type()),
                Err(e) => error!("task {} dropped: {}", task.task_id, e.message()),
            }
        }
        Ok(polled)
    }

    /// Cycles until `shutdown` fires, pausing `poll_interval` between cycles.
    pub fn run(&self, shutdown: &Shutdown) {
        let name = format!("task_runner({})", self.task_type());
        info!("{} started as worker {}", name, self.worker_id);
        loop {
            if shutdown.is_triggered() {
                break;
            }
            if let Err(e) = Concurrency::handle_panic(&name, || self.poll_and_execute()) {
                if !e.is_worker_panicked() {
                    warn!("{} cycle failed: {}", name, e.message());
                }
            }
            if shutdown.wait_timeout(self.worker.poll_interval()) {
                break;
            }
        }
        info!("{} stopped", name);
    }
}
