//! 云计算Agent空闲保留控制系统
//!
//! 根crate对外重导出公共API：决策引擎位于 retention-controller，
//! 领域模型、协作方接口与配置定义位于 retention-core。

pub use retention_controller::{
    IdlePolicy, RetentionController, UsageBudgetTracker, WorkerHandle, WorkerRegistry,
};
pub use retention_core::{
    config, models, traits, Clock, RetentionConfig, RetentionError, RetentionResult, SystemClock,
};
