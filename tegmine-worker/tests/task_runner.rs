use std::collections::VecDeque;
use std::thread;

use tegmine_client::TaskResourceApi;
use tegmine_common::prelude::*;
use tegmine_common::{Shutdown, Task, TaskResult, TaskResultStatus};
use tegmine_worker::{
    Sleeper, SimpleWorker, TaskRunner, TaskRunnerConfigurer, Worker, WorkerProperties,
};

fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}

/// Serves scripted poll batches and fails the first `failing_updates` reports.
#[derive(Default)]
struct FakeTaskClient {
    batches: Mutex<VecDeque<Vec<Task>>>,
    failing_updates: AtomicUsize,
    update_attempts: AtomicUsize,
    polls: AtomicUsize,
    reported: Mutex<Vec<TaskResult>>,
}

impl FakeTaskClient {
    fn with_batches(batches: Vec<Vec<Task>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            ..Default::default()
        })
    }

    fn failing_updates(self: Arc<Self>, count: usize) -> Arc<Self> {
        self.failing_updates.store(count, AtomicOrdering::SeqCst);
        self
    }

    fn reported(&self) -> Vec<TaskResult> {
        self.reported.lock().clone()
    }
}

impl TaskResourceApi for FakeTaskClient {
    fn batch_poll(
        &self,
        task_type: &str,
        _worker_id: &str,
        _count: usize,
        _timeout_ms: u64,
        _domain: Option<&str>,
    ) -> TegResult<Vec<Task>> {
        self.polls.fetch_add(1, AtomicOrdering::SeqCst);
        if task_type == "panicking" {
            panic!("poll response could not be decoded");
        }
        if task_type == "unreachable" {
            return str_err!(TransportError, "connection refused");
        }
        Ok(self.batches.lock().pop_front().unwrap_or_default())
    }

    fn update_task(&self, task_result: &TaskResult) -> TegResult<InlineStr> {
        self.update_attempts.fetch_add(1, AtomicOrdering::SeqCst);
        let left = self.failing_updates.load(AtomicOrdering::SeqCst);
        if left > 0 {
            self.failing_updates.store(left - 1, AtomicOrdering::SeqCst);
            return str_err!(RemoteCallFailed, "POST /tasks failed with status 503");
        }
        self.reported.lock().push(task_result.clone());
        Ok(task_result.task_id.clone())
    }

    fn update_task_by_ref_name(
        &self,
        _workflow_id: &str,
        task_ref_name: &str,
        _status: TaskResultStatus,
        _output: &HashMap<InlineStr, Object>,
        _worker_id: Option<&str>,
    ) -> TegResult<InlineStr> {
        Ok(InlineStr::from(task_ref_name))
    }

    fn get_task(&self, task_id: &str) -> TegResult<Task> {
        fmt_err!(NotFound, "task {} not found", task_id)
    }
}

fn task(id: &str) -> Task {
    Task::new("encode", format!("wf-{}", id), id).with_input("fileLocation", "s3://bucket/a")
}

fn properties() -> WorkerProperties {
    WorkerProperties::default()
        .with_worker_id("worker-1")
        .with_update_retry(3, Duration::from_secs(1))
}

/// A runner whose sleeps are recorded instead of slept.
fn runner(
    worker: impl Worker + 'static,
    client: &Arc<FakeTaskClient>,
) -> (TaskRunner, Arc<Mutex<Vec<Duration>>>) {
    let slept = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&slept);
    let sleeper: Sleeper = Arc::new(move |d: Duration| recorder.lock().push(d));
    let runner =
        TaskRunner::new(Arc::new(worker), client.clone(), &properties()).with_sleeper(sleeper);
    (runner, slept)
}

fn completing_worker() -> SimpleWorker {
    SimpleWorker::new("encode", |task: &Task| {
        Ok(TaskResult::new(task)
            .completed()
            .with_output("encoded", true))
    })
}

#[test]
fn empty_poll_reports_nothing() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![]);
    let (runner, _) = runner(completing_worker(), &client);

    assert_eq!(runner.poll_and_execute().expect("cycle"), 0);
    assert!(client.reported().is_empty());
}

#[test]
fn zero_batch_size_is_refused() {
    let client = FakeTaskClient::with_batches(vec![]);
    let (runner, _) = runner(completing_worker(), &client);

    let err = runner.batch_poll(0).expect_err("no room");
    assert!(err.is_illegal_argument());
    assert!(err.message().contains("batch size of encode"));
    assert!(err.message().contains("got 0"));
    assert_eq!(client.polls.load(AtomicOrdering::SeqCst), 0);
}

#[test]
fn poll_errors_reach_the_caller() {
    let client = FakeTaskClient::with_batches(vec![]);
    let worker = SimpleWorker::new("unreachable", |task: &Task| Ok(TaskResult::new(task)));
    let (runner, _) = runner(worker, &client);

    assert!(runner.batch_poll(1).expect_err("down").is_transport_error());
    assert_eq!(client.polls.load(AtomicOrdering::SeqCst), 1);
}

#[test]
fn oversized_poll_is_truncated() {
    let client = FakeTaskClient::with_batches(vec![vec![task("t1"), task("t2"), task("t3")]]);
    let (runner, _) = runner(completing_worker().with_batch_size(2), &client);

    let tasks = runner.batch_poll(2).expect("poll");
    assert_eq!(tasks.len(), 2);
}

#[test]
fn completed_results_are_reported_in_order() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![vec![task("t1"), task("t2")]]);
    let (runner, slept) = runner(completing_worker().with_batch_size(2), &client);

    assert_eq!(runner.poll_and_execute().expect("cycle"), 2);

    let reported = client.reported();
    assert_eq!(reported.len(), 2);
    assert_eq!(reported[0].task_id.as_str(), "t1");
    assert_eq!(reported[0].workflow_instance_id.as_str(), "wf-t1");
    assert_eq!(reported[0].status, TaskResultStatus::Completed);
    assert_eq!(reported[0].worker_id.as_str(), "worker-1");
    assert_eq!(reported[1].task_id.as_str(), "t2");
    assert!(slept.lock().is_empty());
}

#[test]
fn failing_worker_reports_failed_with_reason() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![vec![task("t1")]]);
    let worker = SimpleWorker::new("encode", |_: &Task| -> TegResult<TaskResult> {
        str_err!(IllegalArgument, "file is not a video")
    });
    let (runner, _) = runner(worker, &client);

    runner.poll_and_execute().expect("cycle");

    let reported = client.reported();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].status, TaskResultStatus::Failed);
    assert!(reported[0]
        .reason_for_incompletion
        .contains("file is not a video"));
    assert_eq!(reported[0].task_id.as_str(), "t1");
}

#[test]
fn panicking_worker_reports_failed() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![vec![task("t1")]]);
    let worker = SimpleWorker::new("encode", |_: &Task| -> TegResult<TaskResult> {
        panic!("codec crashed")
    });
    let (runner, _) = runner(worker, &client);

    runner.poll_and_execute().expect("the cycle survives");

    let reported = client.reported();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].status, TaskResultStatus::Failed);
    assert!(reported[0].reason_for_incompletion.contains("codec crashed"));
}

#[test]
fn failed_result_without_reason_gets_one() {
    let client = FakeTaskClient::with_batches(vec![]);
    let worker = SimpleWorker::new("encode", |task: &Task| {
        let mut task_result = TaskResult::new(task);
        task_result.status = TaskResultStatus::Failed;
        Ok(task_result)
    });
    let (runner, _) = runner(worker, &client);

    let task_result = runner.execute_task(&task("t1")).expect("execute");
    assert!(!task_result.reason_for_incompletion.is_empty());
}

#[test]
fn empty_result_is_never_reported() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![vec![task("t1")]]);
    let worker = SimpleWorker::new("encode", |_: &Task| Ok(TaskResult::default()));
    let (runner, _) = runner(worker, &client);

    let err = runner.execute_task(&task("t1")).expect_err("empty");
    assert!(err.is_empty_task_result());

    runner.poll_and_execute().expect("cycle");
    assert!(client.reported().is_empty());
    assert_eq!(client.update_attempts.load(AtomicOrdering::SeqCst), 0);
}

#[test]
fn result_for_another_task_is_refused() {
    let client = FakeTaskClient::with_batches(vec![]);
    let worker = SimpleWorker::new("encode", |_: &Task| {
        Ok(TaskResult::from_ids("t9", "wf-t9").completed())
    });
    let (runner, _) = runner(worker, &client);

    let err = runner.execute_task(&task("t1")).expect_err("wrong task");
    assert!(err.is_illegal_argument());
}

#[test]
fn update_succeeds_after_two_failures() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![]).failing_updates(2);
    let (runner, slept) = runner(completing_worker(), &client);

    let task_result = runner.execute_task(&task("t1")).expect("execute");
    let task_id = runner
        .update_task_with_retry(&task_result)
        .expect("third attempt succeeds");

    assert_eq!(task_id.as_str(), "t1");
    assert_eq!(client.update_attempts.load(AtomicOrdering::SeqCst), 3);
    assert_eq!(
        *slept.lock(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[test]
fn update_gives_up_after_three_attempts() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![]).failing_updates(10);
    let (runner, slept) = runner(completing_worker(), &client);

    let task_result = runner.execute_task(&task("t1")).expect("execute");
    let err = runner
        .update_task_with_retry(&task_result)
        .expect_err("all attempts fail");

    assert!(err.is_task_update_failed());
    assert!(err.message().contains("encode"));
    assert!(err.message().contains("3 attempts"));
    assert_eq!(client.update_attempts.load(AtomicOrdering::SeqCst), 3);
    assert_eq!(
        *slept.lock(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
}

#[test]
fn configurer_runs_until_shutdown() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![vec![task("t1")], vec![task("t2")]]);
    let worker = completing_worker()
        .with_poll_interval(Duration::from_millis(5))
        .with_thread_count(2);
    let configurer = TaskRunnerConfigurer::new(client.clone(), properties()).with_worker(worker);

    configurer.start().expect("start");
    assert_eq!(configurer.thread_count(), 2);

    let deadline = Instant::now() + Duration::from_secs(5);
    while client.reported().len() < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    configurer.shutdown();

    assert_eq!(configurer.thread_count(), 0);
    let mut ids: Vec<String> = client
        .reported()
        .iter()
        .map(|r| r.task_id.to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["t1".to_string(), "t2".to_string()]);

    let polls = client.polls.load(AtomicOrdering::SeqCst);
    thread::sleep(Duration::from_millis(30));
    assert_eq!(client.polls.load(AtomicOrdering::SeqCst), polls);
}

#[test]
fn startup_delay_is_cut_short_by_shutdown() {
    let client = FakeTaskClient::with_batches(vec![]);
    let configurer = TaskRunnerConfigurer::new(
        client.clone(),
        properties().with_startup_delay(Duration::from_secs(30)),
    )
    .with_worker(completing_worker());

    configurer.start().expect("start");
    let started = Instant::now();
    configurer.shutdown();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(client.polls.load(AtomicOrdering::SeqCst), 0);
    assert!(configurer.start().expect_err("already shut down").is_illegal_argument());
}

#[test]
fn run_loop_survives_a_panicking_poll() {
    init_logger();
    let client = FakeTaskClient::with_batches(vec![]);
    let worker = SimpleWorker::new("panicking", |task: &Task| Ok(TaskResult::new(task)))
        .with_poll_interval(Duration::from_millis(5));
    let (runner, _) = runner(worker, &client);

    let shutdown = Shutdown::new();
    let signal = shutdown.clone();
    let handle = thread::spawn(move || runner.run(&signal));

    let deadline = Instant::now() + Duration::from_secs(5);
    while client.polls.load(AtomicOrdering::SeqCst) < 3 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(client.polls.load(AtomicOrdering::SeqCst) >= 3);
    assert!(!handle.is_finished());

    shutdown.trigger();
    assert!(handle.join().is_ok());
    assert!(client.reported().is_empty());
}
