use tegmine_common::prelude::*;
use tegmine_common::{EnvKey, EnvUtils};

/// Settings shared by every task runner of a process.
#[derive(Clone, Debug)]
pub struct WorkerProperties {
    /// Identity reported with every poll and result.
    pub worker_id: InlineStr,
    /// Attempts to report one result before giving up.
    pub update_retry_attempts: u32,
    /// First delay between report attempts; doubles after each failure.
    pub update_retry_backoff: Duration,
    /// Wait before the first poll of each runner thread.
    pub startup_delay: Duration,
}

impl WorkerProperties {
    pub fn from_env() -> TegResult<Self> {
        let mut properties = Self::default();
        if let Some(worker_id) = EnvUtils::get(EnvKey::TegmineWorkerId) {
            properties.worker_id = worker_id;
        }
        if let Some(attempts) = EnvUtils::get_parsed::<u32>(EnvKey::TegmineUpdateRetryAttempts)? {
            properties.update_retry_attempts = attempts;
        }
        if let Some(backoff) = EnvUtils::get_millis(EnvKey::TegmineUpdateRetryBackoffMs)? {
            properties.update_retry_backoff = backoff;
        }
        if let Some(delay) = EnvUtils::get_millis(EnvKey::TegmineWorkerStartupDelayMs)? {
            properties.startup_delay = delay;
        }
        Ok(properties)
    }

    pub fn with_worker_id(mut self, worker_id: impl Into<InlineStr>) -> Self {
        self.worker_id = worker_id.into();
        self
    }

    pub fn with_update_retry(mut self, attempts: u32, backoff: Duration) -> Self {
        self.update_retry_attempts = attempts;
        self.update_retry_backoff = backoff;
        self
    }

    pub fn with_startup_delay(mut self, startup_delay: Duration) -> Self {
        self.startup_delay = startup_delay;
        self
    }
}

impl Default for WorkerProperties {
    fn default() -> Self {
        Self {
            worker_id: EnvUtils::hostname(),
            update_retry_attempts: 3,
            update_retry_backoff: Duration::from_secs(1),
            startup_delay: Duration::ZERO,
        }
    }
}
