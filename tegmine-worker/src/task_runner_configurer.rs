use std::thread::{self, JoinHandle};

use tegmine_client::TaskResourceApi;
use tegmine_common::prelude::*;
use tegmine_common::Shutdown;

use crate::config::WorkerProperties;
use crate::{TaskRunner, Worker};

/// Owns the runner threads of a set of workers: `thread_count` threads per worker, all stopped
/// together by `shutdown`.
pub struct TaskRunnerConfigurer {
    task_client: Arc<dyn TaskResourceApi>,
    properties: WorkerProperties,
    workers: Vec<Arc<dyn Worker>>,
    shutdown: Shutdown,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskRunnerConfigurer {
    pub fn new(task_client: Arc<dyn TaskResourceApi>, properties: WorkerProperties) -> Self {
        Self {
            task_client,
            properties,
            workers: Vec::new(),
            shutdown: Shutdown::new(),
            threads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_worker(mut self, worker: impl Worker + 'static) -> Self {
        self.add_worker(Arc::new(worker));
        self
    }

    pub fn add_worker(&mut self, worker: Arc<dyn Worker>) {
        if self
            .workers
            .iter()
            .any(|w| w.task_def_name() == worker.task_def_name())
        {
            warn!(
                "more than one worker registered for {}, both will poll",
                worker.task_def_name()
            );
        }
        self.workers.push(worker);
    }

    /// Spawns the runner threads. Calling it again while running is a no-op.
    pub fn start(&self) -> TegResult<()> {
        let mut threads = self.threads.lock();
        if !threads.is_empty() {
            return Ok(());
        }
        if self.shutdown.is_triggered() {
            return str_err!(IllegalArgument, "task runners were already shut down");
        }

        for worker in &self.workers {
            let runner = Arc::new(TaskRunner::new(
                Arc::clone(worker),
                Arc::clone(&self.task_client),
                &self.properties,
            ));
            for index in 0..worker.thread_count() {
                let runner = Arc::clone(&runner);
                let shutdown = self.shutdown.clone();
                let startup_delay = self.properties.startup_delay;
                let handle = thread::Builder::new()
                    .name(format!("{}-{}", worker.task_def_name(), index))
                    .spawn(move || {
                        if !startup_delay.is_zero() && shutdown.wait_timeout(startup_delay) {
                            return;
                        }
                        runner.run(&shutdown);
                    })?;
                threads.push(handle);
            }
        }

        info!(
            "task runners started: {} workers, {} threads, worker id {}",
            self.workers.len(),
            threads.len(),
            self.properties.worker_id
        );
        Ok(())
    }

    /// Signals every runner to stop and waits for them.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
        let threads: Vec<_> = self.threads.lock().drain(..).collect();
        if threads.is_empty() {
            return;
        }
        for handle in threads {
            if handle.join().is_err() {
                error!("task runner thread exited abnormally");
            }
        }
        info!("task runners stopped");
    }

    /// Runner threads spawned by `start` and not yet joined.
    pub fn thread_count(&self) -> usize {
        self.threads.lock().len()
    }
}

impl Drop for TaskRunnerConfigurer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
