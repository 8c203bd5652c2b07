use metrics::{histogram, increment_counter};

/// Client-side metrics. Every call is fire-and-forget; without an installed recorder they are
/// no-ops.
pub struct Monitors;

impl Monitors {
    pub fn record_task_poll(task_type: &str) {
        increment_counter!("task_poll", "taskType" => task_type.to_owned());
    }

    pub fn record_task_poll_time(task_type: &str, seconds: f64) {
        histogram!("task_poll_time", seconds, "taskType" => task_type.to_owned());
    }

    pub fn record_task_poll_error(task_type: &str, exception: u16) {
        increment_counter!(
            "task_poll_error",
            "taskType" => task_type.to_owned(),
            "exception" => exception.to_string()
        );
    }

    pub fn record_task_poll_count(task_type: &str, count: usize) {
        metrics::counter!(
            "task_poll_count",
            count as u64,
            "taskType" => task_type.to_owned()
        );
    }

    pub fn record_task_execute_time(task_type: &str, millis: f64) {
        histogram!("task_execute_time", millis, "taskType" => task_type.to_owned());
    }

    pub fn record_task_execute_error(task_type: &str, exception: u16) {
        increment_counter!(
            "task_execute_error",
            "taskType" => task_type.to_owned(),
            "exception" => exception.to_string()
        );
    }

    pub fn record_task_update_time(task_type: &str, millis: f64) {
        histogram!("task_update_time", millis, "taskType" => task_type.to_owned());
    }

    pub fn record_task_update_error(task_type: &str, exception: u16) {
        increment_counter!(
            "task_update_error",
            "taskType" => task_type.to_owned(),
            "exception" => exception.to_string()
        );
    }

    pub fn record_workflow_start_error(workflow_name: &str, exception: u16) {
        increment_counter!(
            "workflow_start_error",
            "workflowName" => workflow_name.to_owned(),
            "exception" => exception.to_string()
        );
    }
}
