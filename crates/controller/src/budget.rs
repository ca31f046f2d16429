use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use retention_core::traits::{TaskLifecycleListener, WorkerLifecycle};

use crate::registry::WorkerRegistry;

/// 用量预算跟踪器
///
/// 消费调度器推送的任务生命周期事件：每接受一个任务递减一次有限配额，
/// 配额耗尽后Worker先完成手头任务再停止接单，最后一个任务结束时回收实例
pub struct UsageBudgetTracker {
    registry: Arc<WorkerRegistry>,
    lifecycle: Arc<dyn WorkerLifecycle>,
}

impl UsageBudgetTracker {
    pub fn new(registry: Arc<WorkerRegistry>, lifecycle: Arc<dyn WorkerLifecycle>) -> Self {
        Self {
            registry,
            lifecycle,
        }
    }

    /// 任务结束后的回收判定
    ///
    /// 仅当结束的是Worker上最后一个忙碌执行器、且Worker已停止接单时回收；
    /// 回收覆盖其它保留决策，但永远发生在任务完成之后，不抢占运行中的任务
    async fn post_job_action(&self, worker_id: &str) {
        let Some(handle) = self.registry.get(worker_id).await else {
            debug!("收到未注册Worker {} 的任务完成事件", worker_id);
            return;
        };

        let should_terminate = {
            let mut runtime = handle.runtime.lock().await;
            let terminate =
                runtime.busy_executors <= 1 && !runtime.accepting_tasks && !runtime.terminated;
            if terminate {
                runtime.terminated = true;
            } else if !runtime.accepting_tasks {
                info!(
                    "Worker {} 仍有 {} 个执行器在运行，推迟回收",
                    worker_id, runtime.busy_executors
                );
            }
            runtime.busy_executors = (runtime.busy_executors - 1).max(0);
            terminate
        };

        if should_terminate {
            info!("Worker {} 使用配额已耗尽，回收实例", worker_id);
            if let Err(e) = self.lifecycle.terminate(&handle.agent).await {
                warn!("回收Worker {} 失败: {}", worker_id, e);
            }
            // 实例销毁后丢弃巡检调度状态
            self.registry.deregister(worker_id).await;
        }
    }
}

#[async_trait]
impl TaskLifecycleListener for UsageBudgetTracker {
    async fn on_task_accepted(&self, worker_id: &str, task_name: &str) {
        let Some(handle) = self.registry.get(worker_id).await else {
            debug!("收到未注册Worker {} 的任务接受事件", worker_id);
            return;
        };

        let mut runtime = handle.runtime.lock().await;
        runtime.busy_executors += 1;

        if !handle.agent.is_usage_limited() {
            debug!(
                "Worker {} 使用配额为无限制，接受任务 {}",
                worker_id, task_name
            );
            return;
        }

        if runtime.remaining_uses <= 1 {
            info!("Worker {} 使用配额已耗尽，暂停接单", worker_id);
            runtime.accepting_tasks = false;
        } else {
            runtime.remaining_uses -= 1;
            info!(
                "Worker {} 剩余可用次数: {}",
                worker_id, runtime.remaining_uses
            );
        }
    }

    async fn on_task_completed(&self, worker_id: &str, task_name: &str, duration: Duration) {
        debug!(
            "Worker {} 完成任务 {}，耗时 {:?}",
            worker_id, task_name, duration
        );
        self.post_job_action(worker_id).await;
    }

    async fn on_task_completed_with_problems(
        &self,
        worker_id: &str,
        task_name: &str,
        duration: Duration,
        error: &str,
    ) {
        debug!(
            "Worker {} 任务 {} 执行出错（耗时 {:?}）: {}",
            worker_id, task_name, duration, error
        );
        self.post_job_action(worker_id).await;
    }
}
