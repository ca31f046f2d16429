use async_trait::async_trait;

use crate::models::QueuedTask;
use crate::RetentionResult;

/// 调度队列检视接口
///
/// 枚举全部等待中与被阻塞的任务，不能只返回可立即执行的部分：
/// 被上游依赖阻塞的任务同样占用其目标Worker
#[async_trait]
pub trait QueueInspector: Send + Sync {
    async fn waiting_tasks(&self) -> RetentionResult<Vec<QueuedTask>>;
}
