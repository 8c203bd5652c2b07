mod config;
mod retry;
mod task_runner;
mod task_runner_configurer;
mod worker;

pub use config::WorkerProperties;
pub use retry::UpdateRetryPolicy;
pub use task_runner::{Sleeper, TaskRunner};
pub use task_runner_configurer::TaskRunnerConfigurer;
pub use worker::{SimpleWorker, TaskExecuteFunction, Worker};
