pub mod task;
pub mod worker;

pub use task::QueuedTask;
pub use worker::{ComputeState, WorkerAgent, WorkerRuntime};
