//! Shared test tooling for the retention workspace
//!
//! Provides in-memory mock collaborators and test data builders so unit
//! and integration tests can run without a cloud API or a real queue.

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::{QueuedTaskBuilder, WorkerAgentBuilder};
pub use helpers::init_test_logging;
pub use mocks::{MockClock, MockComputeStateProbe, MockQueueInspector, MockWorkerLifecycle};
