use tegmine_common::prelude::*;
use tegmine_common::{Task, TaskResult};

/// Handler of one task type. Implementations are shared by every runner thread of the worker.
pub trait Worker: Send + Sync {
    /// The task type this worker polls for.
    fn task_def_name(&self) -> &str;

    /// Executes the task. An error is reported to the server as a FAILED result carrying the
    /// error message.
    fn execute(&self, task: &Task) -> TegResult<TaskResult>;

    /// Tasks claimed per poll.
    fn batch_size(&self) -> usize {
        1
    }

    /// Pause between two poll cycles.
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// How long the server may hold a poll open waiting for work.
    fn poll_timeout(&self) -> Duration {
        Duration::from_millis(100)
    }

    fn domain(&self) -> Option<&str> {
        None
    }

    /// Runner threads started for this worker.
    fn thread_count(&self) -> usize {
        1
    }
}

pub type TaskExecuteFunction = Box<dyn Fn(&Task) -> TegResult<TaskResult> + Send + Sync>;

/// A `Worker` backed by a closure.
pub struct SimpleWorker {
    task_def_name: InlineStr,
    execute_function: TaskExecuteFunction,
    batch_size: usize,
    poll_interval: Duration,
    poll_timeout: Duration,
    domain: Option<InlineStr>,
    thread_count: usize,
}

impl SimpleWorker {
    pub fn new<F>(task_def_name: impl Into<InlineStr>, execute_function: F) -> Self
    where
        F: Fn(&Task) -> TegResult<TaskResult> + Send + Sync + 'static,
    {
        Self {
            task_def_name: task_def_name.into(),
            execute_function: Box::new(execute_function),
            batch_size: 1,
            poll_interval: Duration::from_millis(100),
            poll_timeout: Duration::from_millis(100),
            domain: None,
            thread_count: 1,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    pub fn with_domain(mut self, domain: impl Into<InlineStr>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }
}

impl Worker for SimpleWorker {
    fn task_def_name(&self) -> &str {
        &self.task_def_name
    }

    fn execute(&self, task: &Task) -> TegResult<TaskResult> {
        (self.execute_function)(task)
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn thread_count(&self) -> usize {
        self.thread_count
    }
}
