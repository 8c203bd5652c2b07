use tegmine_common::prelude::*;

/// Bounded retry with doubling backoff, used to report task results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateRetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl UpdateRetryPolicy {
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    /// Delay after the failed attempt `attempt` (0-based): backoff, 2 * backoff, 4 * backoff...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
    }

    /// Runs `op` until it succeeds or the attempts run out, sleeping between attempts only.
    /// Returns the last error when every attempt failed.
    pub fn execute<T, F>(&self, mut op: F, sleeper: &dyn Fn(Duration)) -> TegResult<T>
    where
        F: FnMut(u32) -> TegResult<T>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= self.attempts => return Err(e),
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    debug!(
                        "attempt {} of {} failed, retry in {:?}: {}",
                        attempt + 1,
                        self.attempts,
                        delay,
                        e.message()
                    );
                    sleeper(delay);
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for UpdateRetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
