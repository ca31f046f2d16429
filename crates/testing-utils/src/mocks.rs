//! Mock implementations for the retention collaborator traits
//!
//! This module provides programmable in-memory mocks that can be used
//! for testing without a cloud provider API, a live queue or real time.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use retention_core::models::{ComputeState, QueuedTask, WorkerAgent};
use retention_core::traits::{ComputeStateProbe, QueueInspector, WorkerLifecycle};
use retention_core::{Clock, RetentionError, RetentionResult};

struct ProbeInner {
    state: ComputeState,
    uptime: Duration,
    idle: bool,
    online: bool,
    idle_start: DateTime<Utc>,
    fail_state: bool,
    fail_uptime: bool,
    state_queries: usize,
    uptime_queries: usize,
    connects: Vec<String>,
    disconnects: Vec<(String, String)>,
}

/// Scriptable mock of the compute state probe
///
/// Defaults to a running, online, idle instance with zero uptime. All
/// connect/disconnect requests are recorded for assertions.
pub struct MockComputeStateProbe {
    inner: Mutex<ProbeInner>,
}

impl MockComputeStateProbe {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ProbeInner {
                state: ComputeState::Running,
                uptime: Duration::ZERO,
                idle: true,
                online: true,
                idle_start: Utc::now(),
                fail_state: false,
                fail_uptime: false,
                state_queries: 0,
                uptime_queries: 0,
                connects: Vec::new(),
                disconnects: Vec::new(),
            }),
        }
    }

    pub fn set_state(&self, state: ComputeState) {
        self.inner.lock().unwrap().state = state;
    }

    pub fn set_uptime(&self, uptime: Duration) {
        self.inner.lock().unwrap().uptime = uptime;
    }

    /// Set uptime as minutes + seconds, mirroring billing-window test cases
    pub fn set_uptime_minutes(&self, minutes: u64, seconds: u64) {
        self.set_uptime(Duration::from_secs(minutes * 60 + seconds));
    }

    pub fn set_idle(&self, idle: bool) {
        self.inner.lock().unwrap().idle = idle;
    }

    pub fn set_online(&self, online: bool) {
        self.inner.lock().unwrap().online = online;
    }

    pub fn set_idle_start(&self, idle_start: DateTime<Utc>) {
        self.inner.lock().unwrap().idle_start = idle_start;
    }

    pub fn fail_state_queries(&self, fail: bool) {
        self.inner.lock().unwrap().fail_state = fail;
    }

    pub fn fail_uptime_queries(&self, fail: bool) {
        self.inner.lock().unwrap().fail_uptime = fail;
    }

    pub fn state_query_count(&self) -> usize {
        self.inner.lock().unwrap().state_queries
    }

    pub fn uptime_query_count(&self) -> usize {
        self.inner.lock().unwrap().uptime_queries
    }

    pub fn connect_count(&self, worker_id: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .connects
            .iter()
            .filter(|id| id.as_str() == worker_id)
            .count()
    }

    pub fn disconnect_count(&self, worker_id: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .disconnects
            .iter()
            .filter(|(id, _)| id.as_str() == worker_id)
            .count()
    }

    pub fn disconnect_reasons(&self, worker_id: &str) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .disconnects
            .iter()
            .filter(|(id, _)| id.as_str() == worker_id)
            .map(|(_, reason)| reason.clone())
            .collect()
    }
}

impl Default for MockComputeStateProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComputeStateProbe for MockComputeStateProbe {
    async fn get_state(&self, _worker: &WorkerAgent) -> RetentionResult<ComputeState> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_state {
            return Err(RetentionError::probe_unavailable("simulated cloud API error"));
        }
        inner.state_queries += 1;
        Ok(inner.state)
    }

    async fn get_uptime(&self, _worker: &WorkerAgent) -> RetentionResult<Duration> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_uptime {
            return Err(RetentionError::probe_unavailable("simulated cloud API error"));
        }
        inner.uptime_queries += 1;
        Ok(inner.uptime)
    }

    async fn is_idle(&self, _worker: &WorkerAgent) -> bool {
        self.inner.lock().unwrap().idle
    }

    async fn is_online(&self, _worker: &WorkerAgent) -> bool {
        self.inner.lock().unwrap().online
    }

    async fn idle_start_time(&self, _worker: &WorkerAgent) -> DateTime<Utc> {
        self.inner.lock().unwrap().idle_start
    }

    async fn connect(&self, worker: &WorkerAgent) -> RetentionResult<()> {
        self.inner.lock().unwrap().connects.push(worker.id.clone());
        Ok(())
    }

    async fn disconnect(&self, worker: &WorkerAgent, reason: &str) -> RetentionResult<()> {
        self.inner
            .lock()
            .unwrap()
            .disconnects
            .push((worker.id.clone(), reason.to_string()));
        Ok(())
    }
}

/// In-memory mock of the scheduling queue
#[derive(Default)]
pub struct MockQueueInspector {
    tasks: Mutex<Vec<QueuedTask>>,
    fail: Mutex<bool>,
    queries: Mutex<usize>,
}

impl MockQueueInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&self, task: QueuedTask) {
        self.tasks.lock().unwrap().push(task);
    }

    pub fn remove_task(&self, task_id: i64) {
        self.tasks.lock().unwrap().retain(|t| t.id != task_id);
    }

    pub fn clear(&self) {
        self.tasks.lock().unwrap().clear();
    }

    pub fn fail_queries(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn query_count(&self) -> usize {
        *self.queries.lock().unwrap()
    }
}

#[async_trait]
impl QueueInspector for MockQueueInspector {
    async fn waiting_tasks(&self) -> RetentionResult<Vec<QueuedTask>> {
        if *self.fail.lock().unwrap() {
            return Err(RetentionError::queue_error("simulated queue failure"));
        }
        *self.queries.lock().unwrap() += 1;
        Ok(self.tasks.lock().unwrap().clone())
    }
}

/// Recording mock of the worker lifecycle action surface
#[derive(Default)]
pub struct MockWorkerLifecycle {
    idle_timeouts: Mutex<Vec<String>>,
    terminations: Mutex<Vec<String>>,
}

impl MockWorkerLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn idle_timeout_count(&self, worker_id: &str) -> usize {
        self.idle_timeouts
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == worker_id)
            .count()
    }

    pub fn termination_count(&self, worker_id: &str) -> usize {
        self.terminations
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == worker_id)
            .count()
    }

    pub fn total_idle_timeouts(&self) -> usize {
        self.idle_timeouts.lock().unwrap().len()
    }

    pub fn total_terminations(&self) -> usize {
        self.terminations.lock().unwrap().len()
    }
}

#[async_trait]
impl WorkerLifecycle for MockWorkerLifecycle {
    async fn idle_timeout(&self, worker: &WorkerAgent) -> RetentionResult<()> {
        self.idle_timeouts.lock().unwrap().push(worker.id.clone());
        Ok(())
    }

    async fn terminate(&self, worker: &WorkerAgent) -> RetentionResult<()> {
        self.terminations.lock().unwrap().push(worker.id.clone());
        Ok(())
    }
}

/// Controllable clock for driving rate-limit windows and idle durations
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc::now()),
        }
    }

    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
