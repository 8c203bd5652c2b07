use std::env;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, IntoStaticStr};

use crate::prelude::*;

pub struct EnvUtils;

impl EnvUtils {
    /// The trimmed value of `key`, if set and not blank.
    pub fn get(key: EnvKey) -> Option<InlineStr> {
        env::var(key.as_ref())
            .ok()
            .map(|v| InlineStr::from(v.trim()))
            .filter(|v| !v.is_empty())
    }

    pub fn get_parsed<T>(key: EnvKey) -> TegResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::get(key) {
            Some(v) => v.parse::<T>().map(Some).map_err(|e| {
                ErrorCode::IllegalArgument(format!("{}={} is invalid: {}", key.as_ref(), v, e))
            }),
            None => Ok(None),
        }
    }

    pub fn get_millis(key: EnvKey) -> TegResult<Option<Duration>> {
        Ok(Self::get_parsed::<u64>(key)?.map(Duration::from_millis))
    }

    /// Identity of this process as seen by the server. `HOSTNAME` / `COMPUTERNAME` override the
    /// name reported by the OS.
    pub fn hostname() -> InlineStr {
        Self::get(EnvKey::Hostname)
            .or_else(|| Self::get(EnvKey::Computername))
            .or_else(Self::os_hostname)
            .unwrap_or_else(|| InlineStr::from("unknown"))
    }

    pub fn os_hostname() -> Option<InlineStr> {
        let name = gethostname::gethostname();
        let name = name.to_string_lossy();
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(InlineStr::from(name))
        }
    }

    /// Names of the recognised variables that are currently set.
    pub fn configured_keys() -> Vec<&'static str> {
        EnvKey::iter()
            .filter(|k| Self::get(*k).is_some())
            .map(<&'static str>::from)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, EnumIter, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvKey {
    TegmineServerUrl,
    TegmineAuthToken,
    TegmineRequestTimeoutMs,
    TegmineMonitorRefreshIntervalMs,
    TegmineMonitorMaxNotFound,
    TegmineWatchPolicy,
    TegmineStartWorkflowPoolSize,
    TegmineWorkerId,
    TegmineUpdateRetryAttempts,
    TegmineUpdateRetryBackoffMs,
    TegmineWorkerStartupDelayMs,
    Hostname,
    Computername,
}
