use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tegmine_common::prelude::*;
use tegmine_common::{Concurrency, Shutdown, Workflow};

use super::WorkflowExecutionChannel;
use crate::config::{ClientProperties, WatchPolicy};
use crate::http::WorkflowResourceApi;

struct WatchEntry {
    sender: Sender<Workflow>,
    not_found_refreshes: u32,
}

struct MonitorInner {
    workflow_client: Arc<dyn WorkflowResourceApi>,
    refresh_interval: Duration,
    watch_policy: WatchPolicy,
    max_not_found_refreshes: u32,
    watched: Mutex<HashMap<InlineStr, WatchEntry>>,
    shutdown: Shutdown,
    daemon: Mutex<Option<JoinHandle<()>>>,
}

/// Watches running workflows on one background cadence and hands each terminal snapshot to the
/// single channel registered for it.
#[derive(Clone)]
pub struct WorkflowMonitor {
    inner: Arc<MonitorInner>,
}

impl WorkflowMonitor {
    /// Creates a monitor without its background daemon; see [`WorkflowMonitor::start`].
    pub fn new(
        workflow_client: Arc<dyn WorkflowResourceApi>,
        properties: &ClientProperties,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                workflow_client,
                refresh_interval: properties.monitor_refresh_interval,
                watch_policy: properties.watch_policy,
                max_not_found_refreshes: properties.max_not_found_refreshes,
                watched: Mutex::new(HashMap::new()),
                shutdown: Shutdown::new(),
                daemon: Mutex::new(None),
            }),
        }
    }

    /// Spawns the refresh daemon. Calling it again is a no-op.
    pub fn start(&self) -> TegResult<()> {
        let mut daemon = self.inner.daemon.lock();
        if daemon.is_some() {
            return Ok(());
        }

        let monitor = self.clone();
        let handle = thread::Builder::new()
            .name("workflow-monitor".to_string())
            .spawn(move || monitor.run())?;
        *daemon = Some(handle);

        info!(
            "workflow monitor started, refresh interval: {:?}",
            self.inner.refresh_interval
        );
        Ok(())
    }

    /// Stops the daemon and waits for it. Pending watches stay registered.
    pub fn shutdown(&self) {
        self.inner.shutdown.trigger();
        if let Some(handle) = self.inner.daemon.lock().take() {
            if handle.join().is_err() {
                error!("workflow monitor daemon exited abnormally");
            }
            info!("workflow monitor stopped");
        }
    }

    /// Registers interest in `workflow_id` reaching a terminal state.
    pub fn generate_workflow_execution_channel(
        &self,
        workflow_id: &str,
    ) -> TegResult<WorkflowExecutionChannel> {
        let workflow_id = InlineStr::from(workflow_id);
        let (sender, receiver) = crossbeam_channel::bounded(1);

        let mut watched = self.inner.watched.lock();
        if watched.contains_key(&workflow_id) {
            match self.inner.watch_policy {
                WatchPolicy::Reject => {
                    return fmt_err!(
                        Conflict,
                        "workflow {} is already being monitored",
                        workflow_id
                    );
                }
                WatchPolicy::Replace => {
                    warn!(
                        "workflow {} was already monitored, previous channel closed",
                        workflow_id
                    );
                }
            }
        }
        // Replacing drops the previous sender, which closes the displaced channel.
        watched.insert(
            workflow_id.clone(),
            WatchEntry {
                sender,
                not_found_refreshes: 0,
            },
        );
        drop(watched);

        debug!("monitoring workflow {}", workflow_id);
        Ok(WorkflowExecutionChannel::new(workflow_id, receiver))
    }

    pub fn is_monitoring(&self, workflow_id: &str) -> bool {
        self.inner.watched.lock().contains_key(workflow_id)
    }

    pub fn monitored_count(&self) -> usize {
        self.inner.watched.lock().len()
    }

    /// One refresh cycle over every watched workflow. Returns the number delivered.
    pub fn refresh(&self) -> usize {
        let workflow_ids: Vec<InlineStr> = self.inner.watched.lock().keys().cloned().collect();

        let mut delivered = 0;
        for workflow_id in workflow_ids {
            let fetched = Concurrency::handle_panic("get_execution_status", || {
                self.inner
                    .workflow_client
                    .get_execution_status(&workflow_id, true)
            });
            match fetched {
                Ok(workflow) if workflow.is_terminal() => {
                    if self.deliver(&workflow_id, workflow) {
                        delivered += 1;
                    }
                }
                Ok(_) => self.reset_not_found(&workflow_id),
                Err(e) if e.is_not_found() => self.record_not_found(&workflow_id),
                Err(e) => warn!(
                    "failed to refresh status of workflow {}, will retry: {}",
                    workflow_id,
                    e.message()
                ),
            }
        }
        delivered
    }

    fn run(&self) {
        loop {
            if self.inner.shutdown.is_triggered() {
                break;
            }
            let _ = Concurrency::handle_panic("monitor_running_workflows", || Ok(self.refresh()));
            if self.inner.shutdown.wait_timeout(self.inner.refresh_interval) {
                break;
            }
        }
    }

    /// Delivers and removes under the lock, so a watch registered meanwhile is not lost.
    fn deliver(&self, workflow_id: &InlineStr, workflow: Workflow) -> bool {
        let mut watched = self.inner.watched.lock();
        match watched.remove(workflow_id) {
            Some(entry) => {
                debug!(
                    "workflow {} reached {}, delivering",
                    workflow.to_short_string(),
                    workflow.status.as_ref()
                );
                if entry.sender.try_send(workflow).is_err() {
                    debug!("waiter of workflow {} is gone", workflow_id);
                }
                true
            }
            None => false,
        }
    }

    fn reset_not_found(&self, workflow_id: &InlineStr) {
        if let Some(entry) = self.inner.watched.lock().get_mut(workflow_id) {
            entry.not_found_refreshes = 0;
        }
    }

    fn record_not_found(&self, workflow_id: &InlineStr) {
        let mut watched = self.inner.watched.lock();
        let Some(entry) = watched.get_mut(workflow_id) else {
            return;
        };
        entry.not_found_refreshes += 1;
        let max = self.inner.max_not_found_refreshes;
        if max > 0 && entry.not_found_refreshes >= max {
            watched.remove(workflow_id);
            warn!(
                "workflow {} not found {} times in a row, stop monitoring",
                workflow_id, max
            );
        } else {
            debug!(
                "workflow {} not found ({} times), will retry",
                workflow_id, entry.not_found_refreshes
            );
        }
    }
}
