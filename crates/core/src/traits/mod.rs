pub mod compute_probe;
pub mod queue_inspector;
pub mod task_events;
pub mod worker_lifecycle;

pub use compute_probe::ComputeStateProbe;
pub use queue_inspector::QueueInspector;
pub use task_events::TaskLifecycleListener;
pub use worker_lifecycle::WorkerLifecycle;
