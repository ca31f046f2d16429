use async_trait::async_trait;

use crate::models::WorkerAgent;
use crate::RetentionResult;

/// Worker节点的生命周期动作接口
///
/// 动作的执行结果由计算层负责，调用方只记录失败日志，不重试也不传播
#[async_trait]
pub trait WorkerLifecycle: Send + Sync {
    /// 触发空闲超时动作（按Worker配置停止或销毁实例）
    async fn idle_timeout(&self, worker: &WorkerAgent) -> RetentionResult<()>;

    /// 销毁Worker实例
    async fn terminate(&self, worker: &WorkerAgent) -> RetentionResult<()>;
}
