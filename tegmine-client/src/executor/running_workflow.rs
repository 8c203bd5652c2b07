use crossbeam_channel::{Receiver, RecvTimeoutError};
use tegmine_common::prelude::*;
use tegmine_common::Workflow;

/// Receiving end of a watch. It yields the terminal snapshot of one workflow, at most once.
#[derive(Debug)]
pub struct WorkflowExecutionChannel {
    workflow_id: InlineStr,
    receiver: Receiver<Workflow>,
}

impl WorkflowExecutionChannel {
    pub(crate) fn new(workflow_id: InlineStr, receiver: Receiver<Workflow>) -> Self {
        Self {
            workflow_id,
            receiver,
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Blocks until the workflow reaches a terminal state or `timeout` elapses.
    ///
    /// Giving up yields `Timeout`; a handle closed without a value (replaced or evicted watch)
    /// yields `ChannelClosed`.
    pub fn wait_until_timeout(&self, timeout: Duration) -> TegResult<Workflow> {
        match self.receiver.recv_timeout(timeout) {
            Ok(workflow) => Ok(workflow),
            Err(RecvTimeoutError::Timeout) => fmt_err!(
                Timeout,
                "timed out after {:?} waiting for workflow {}",
                timeout,
                self.workflow_id
            ),
            Err(RecvTimeoutError::Disconnected) => fmt_err!(
                ChannelClosed,
                "channel of workflow {} closed without a result",
                self.workflow_id
            ),
        }
    }

    /// Non-blocking check for an already delivered result.
    pub fn try_get(&self) -> Option<Workflow> {
        self.receiver.try_recv().ok()
    }
}

/// Outcome of one start request from `WorkflowExecutor::start_workflows`.
#[derive(Debug)]
pub struct RunningWorkflow {
    /// Empty when the start failed.
    pub workflow_id: InlineStr,
    pub execution_channel: Option<WorkflowExecutionChannel>,
    pub error: Option<ErrorCode>,
}

impl RunningWorkflow {
    pub fn started(
        workflow_id: InlineStr,
        execution_channel: Option<WorkflowExecutionChannel>,
    ) -> Self {
        Self {
            workflow_id,
            execution_channel,
            error: None,
        }
    }

    pub fn failed(error: ErrorCode) -> Self {
        Self {
            workflow_id: InlineStr::new(),
            execution_channel: None,
            error: Some(error),
        }
    }

    pub fn is_started(&self) -> bool {
        self.error.is_none()
    }

    /// Waits on the execution channel, if this workflow is monitored.
    pub fn wait_until_timeout(&self, timeout: Duration) -> TegResult<Workflow> {
        if let Some(error) = &self.error {
            return fmt_err!(
                IllegalArgument,
                "workflow was not started: {}",
                error.message()
            );
        }
        match &self.execution_channel {
            Some(channel) => channel.wait_until_timeout(timeout),
            None => fmt_err!(
                IllegalArgument,
                "workflow {} was started without monitoring",
                self.workflow_id
            ),
        }
    }
}
