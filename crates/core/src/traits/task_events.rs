use std::time::Duration;

use async_trait::async_trait;

/// 任务生命周期事件监听接口
///
/// 由调度器宿主在执行器生命周期节点上显式调用（任务被接受、任务结束），
/// 事件来自Worker自身的执行器，同一Worker的事件按顺序到达
#[async_trait]
pub trait TaskLifecycleListener: Send + Sync {
    /// 执行器接受了一个任务
    async fn on_task_accepted(&self, worker_id: &str, task_name: &str);

    /// 任务正常结束
    async fn on_task_completed(&self, worker_id: &str, task_name: &str, duration: Duration);

    /// 任务带着错误结束
    async fn on_task_completed_with_problems(
        &self,
        worker_id: &str,
        task_name: &str,
        duration: Duration,
        error: &str,
    );
}
