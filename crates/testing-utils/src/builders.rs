//! Test data builders for creating retention entities
//!
//! Builder patterns with sensible defaults and easy customization,
//! shared across unit and integration tests.

use chrono::Utc;

use retention_core::models::{QueuedTask, WorkerAgent};

/// Builder for creating test WorkerAgent records
pub struct WorkerAgentBuilder {
    agent: WorkerAgent,
}

impl WorkerAgentBuilder {
    pub fn new() -> Self {
        Self {
            agent: WorkerAgent {
                id: "worker-001".to_string(),
                instance_id: "i-worker-001".to_string(),
                label: "worker-001".to_string(),
                idle_termination_minutes: 30,
                max_total_uses: -1,
                stop_on_terminate: false,
                registered_at: Utc::now(),
            },
        }
    }

    /// Set the worker id; the self-label and instance id follow it
    pub fn with_id(mut self, id: &str) -> Self {
        self.agent.id = id.to_string();
        self.agent.label = id.to_string();
        self.agent.instance_id = format!("i-{id}");
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.agent.label = label.to_string();
        self
    }

    pub fn with_idle_termination_minutes(mut self, minutes: i32) -> Self {
        self.agent.idle_termination_minutes = minutes;
        self
    }

    pub fn with_max_total_uses(mut self, uses: i32) -> Self {
        self.agent.max_total_uses = uses;
        self
    }

    pub fn with_stop_on_terminate(mut self, stop: bool) -> Self {
        self.agent.stop_on_terminate = stop;
        self
    }

    pub fn build(self) -> WorkerAgent {
        self.agent
    }
}

impl Default for WorkerAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test QueuedTask entries
pub struct QueuedTaskBuilder {
    task: QueuedTask,
}

impl QueuedTaskBuilder {
    pub fn new() -> Self {
        Self {
            task: QueuedTask {
                id: 1,
                name: "test_task".to_string(),
                assigned_label: None,
                blocked: false,
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.task.id = id;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.task.name = name.to_string();
        self
    }

    pub fn with_assigned_label(mut self, label: &str) -> Self {
        self.task.assigned_label = Some(label.to_string());
        self
    }

    pub fn blocked(mut self) -> Self {
        self.task.blocked = true;
        self
    }

    pub fn build(self) -> QueuedTask {
        self.task
    }
}

impl Default for QueuedTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}
