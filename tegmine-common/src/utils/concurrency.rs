use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::prelude::*;

pub struct Concurrency;

impl Concurrency {
    /// Recover-and-report boundary for daemon bodies: a panic inside `f` is logged under `name`
    /// and returned as `WorkerPanicked` instead of unwinding into the caller's thread.
    pub fn handle_panic<T, F>(name: &str, f: F) -> TegResult<T>
    where
        F: FnOnce() -> TegResult<T>,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => result,
            Err(payload) => {
                let msg = Self::panic_message(payload.as_ref());
                error!("{} panicked: {}", name, msg);
                fmt_err!(WorkerPanicked, "{} panicked: {}", name, msg)
            }
        }
    }

    pub fn panic_message(payload: &(dyn Any + Send)) -> String {
        if let Some(msg) = payload.downcast_ref::<&str>() {
            msg.to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic payload".to_string()
        }
    }
}
