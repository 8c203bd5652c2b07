use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::prelude::*;

/// Stop signal shared by a daemon and whoever owns it. Triggering drops the only sender, which
/// wakes every clone blocked in `wait_timeout`.
#[derive(Clone)]
pub struct Shutdown {
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        Self {
            trigger: Arc::new(Mutex::new(Some(sender))),
            signal: receiver,
        }
    }

    pub fn trigger(&self) {
        self.trigger.lock().take();
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleeps up to `timeout`; returns true if the signal fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        !matches!(
            self.signal.recv_timeout(timeout),
            Err(RecvTimeoutError::Timeout)
        )
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
