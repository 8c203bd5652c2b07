use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};
use tegmine_common::prelude::*;
use tegmine_common::{EnvKey, EnvUtils};

/// What `WorkflowMonitor` does when a workflow id is watched a second time before the first
/// watch delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum WatchPolicy {
    /// The new registration wins; the displaced handle is closed.
    #[default]
    Replace,
    /// The new registration fails with `Conflict`.
    Reject,
}

#[derive(Clone, Debug)]
pub struct ClientProperties {
    /// Base url of the server api, e.g. `http://localhost:8080/api`.
    pub server_url: InlineStr,
    /// Sent as `X-Authorization` when present.
    pub auth_token: Option<InlineStr>,
    pub request_timeout: Duration,
    /// Cadence of the monitor's status refresh.
    pub monitor_refresh_interval: Duration,
    pub watch_policy: WatchPolicy,
    /// Consecutive not-found lookups after which a watch is evicted. Zero never evicts.
    pub max_not_found_refreshes: u32,
    /// Threads used by `start_workflows` to fan out start requests.
    pub start_workflow_pool_size: usize,
}

impl ClientProperties {
    /// Defaults overridden by whatever `TEGMINE_*` variables are set.
    pub fn from_env() -> TegResult<Self> {
        let mut properties = Self::default();
        if let Some(server_url) = EnvUtils::get(EnvKey::TegmineServerUrl) {
            properties.server_url = server_url;
        }
        if let Some(auth_token) = EnvUtils::get(EnvKey::TegmineAuthToken) {
            properties.auth_token = Some(auth_token);
        }
        if let Some(timeout) = EnvUtils::get_millis(EnvKey::TegmineRequestTimeoutMs)? {
            properties.request_timeout = timeout;
        }
        if let Some(interval) = EnvUtils::get_millis(EnvKey::TegmineMonitorRefreshIntervalMs)? {
            properties.monitor_refresh_interval = interval;
        }
        if let Some(policy) = EnvUtils::get(EnvKey::TegmineWatchPolicy) {
            properties.watch_policy = WatchPolicy::from_str(&policy).map_err(|_| {
                ErrorCode::IllegalArgument(format!(
                    "{}={} is invalid, expect REPLACE or REJECT",
                    EnvKey::TegmineWatchPolicy.as_ref(),
                    policy
                ))
            })?;
        }
        if let Some(max) = EnvUtils::get_parsed::<u32>(EnvKey::TegmineMonitorMaxNotFound)? {
            properties.max_not_found_refreshes = max;
        }
        if let Some(size) = EnvUtils::get_parsed::<usize>(EnvKey::TegmineStartWorkflowPoolSize)? {
            properties.start_workflow_pool_size = size;
        }

        debug!(
            "client properties loaded, server: {}, env overrides: {:?}",
            properties.server_url,
            EnvUtils::configured_keys()
        );
        Ok(properties)
    }

    pub fn with_server_url(mut self, server_url: impl Into<InlineStr>) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn with_auth_token(mut self, auth_token: impl Into<InlineStr>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_monitor_refresh_interval(mut self, interval: Duration) -> Self {
        self.monitor_refresh_interval = interval;
        self
    }

    pub fn with_watch_policy(mut self, watch_policy: WatchPolicy) -> Self {
        self.watch_policy = watch_policy;
        self
    }

    pub fn with_max_not_found_refreshes(mut self, max: u32) -> Self {
        self.max_not_found_refreshes = max;
        self
    }

    pub fn with_start_workflow_pool_size(mut self, size: usize) -> Self {
        self.start_workflow_pool_size = size;
        self
    }
}

impl Default for ClientProperties {
    fn default() -> Self {
        Self {
            server_url: InlineStr::from("http://localhost:8080/api"),
            auth_token: None,
            request_timeout: Duration::from_secs(30),
            monitor_refresh_interval: Duration::from_millis(100),
            watch_policy: WatchPolicy::Replace,
            max_not_found_refreshes: 100,
            start_workflow_pool_size: 10,
        }
    }
}
