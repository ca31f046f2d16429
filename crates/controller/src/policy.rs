use std::sync::Arc;

use tracing::{debug, info, warn};

use retention_core::models::{ComputeState, WorkerAgent};
use retention_core::traits::{ComputeStateProbe, QueueInspector, WorkerLifecycle};
use retention_core::{Clock, RetentionConfig};

use crate::registry::{WorkerHandle, WorkerRegistry};

/// 计费窗口长度（秒）。云厂商按整点计费，窗口内剩余的时间已经付费
const BILLING_WINDOW_SECONDS: u64 = 3600;

/// 空闲回收决策引擎
///
/// 单次评估内部不做任何重试，所有失败都降级为“本轮跳过，下个巡检周期重试”，
/// 并固定返回1分钟的重查间隔
pub struct IdlePolicy {
    registry: Arc<WorkerRegistry>,
    probe: Arc<dyn ComputeStateProbe>,
    queue: Arc<dyn QueueInspector>,
    lifecycle: Arc<dyn WorkerLifecycle>,
    clock: Arc<dyn Clock>,
    config: RetentionConfig,
}

impl IdlePolicy {
    pub fn new(
        registry: Arc<WorkerRegistry>,
        probe: Arc<dyn ComputeStateProbe>,
        queue: Arc<dyn QueueInspector>,
        lifecycle: Arc<dyn WorkerLifecycle>,
        clock: Arc<dyn Clock>,
        config: RetentionConfig,
    ) -> Self {
        Self {
            registry,
            probe,
            queue,
            lifecycle,
            clock,
            config,
        }
    }

    /// 评估单个Worker是否应该断开或回收，返回距下次评估的分钟数
    pub async fn evaluate(&self, handle: &WorkerHandle) -> i64 {
        let worker = &handle.agent;

        // 配置为永不回收，或Worker已在评估开始前被注销
        if worker.never_terminates() || self.registry.get(&worker.id).await.is_none() {
            return 1;
        }

        if !self.probe.is_idle(worker).await || self.config.disabled {
            return 1;
        }

        // get_state 会刷新缓存的云端信息，必须先于 get_uptime 调用
        let state = match self.probe.get_state(worker).await {
            Ok(state) => state,
            Err(e) => {
                debug!("查询Worker {} 实例状态失败，下个周期重试: {}", worker.id, e);
                return 1;
            }
        };
        let uptime = match self.probe.get_uptime(worker).await {
            Ok(uptime) => uptime,
            Err(e) => {
                debug!("查询Worker {} 运行时长失败，下个周期重试: {}", worker.id, e);
                return 1;
            }
        };

        // 实例已经处于目标状态（已销毁，或配置了停止即回收且已停止/停止中）时
        // 只需要清理外部变更遗留的连接
        if state == ComputeState::Terminated
            || (worker.stop_on_terminate && state.is_stopped_or_stopping())
        {
            if self.probe.is_online(worker).await {
                info!(
                    "检测到Worker {} 已在外部停止，断开连接，实例状态: {:?}",
                    worker.id, state
                );
                if let Err(e) = self.probe.disconnect(worker, "实例已在外部停止").await {
                    warn!("断开Worker {} 连接失败: {}", worker.id, e);
                }
            }
            return 1;
        }

        // 云端显示运行中但从未变为可连接的实例，在启动超时之前视为仍在启动
        let startup_timeout_seconds = self.config.startup_timeout_minutes * 60;
        if self.probe.is_offline(worker).await && (uptime.as_secs() as i64) < startup_timeout_seconds
        {
            return 1;
        }

        let idle_start = self.probe.idle_start_time(worker).await;
        let idle_seconds = (self.clock.now() - idle_start).num_seconds().max(0);

        // 实例停止后重启时空闲起点不会重置；空闲时长超过运行时长说明
        // 空闲时钟已经失真，跳过本轮而不是回收
        if (uptime.as_secs() as i64) < idle_seconds {
            return 1;
        }

        if worker.idle_termination_minutes > 0 {
            let threshold_seconds = i64::from(worker.idle_termination_minutes) * 60;
            if idle_seconds > threshold_seconds && !self.queue_has_work_for(worker).await {
                info!(
                    "Worker {} 已空闲 {} 分钟，超过 {} 分钟阈值，触发空闲超时动作",
                    worker.id,
                    idle_seconds / 60,
                    worker.idle_termination_minutes
                );
                self.trigger_idle_timeout(worker).await;
            }
        } else {
            let free_seconds_left =
                BILLING_WINDOW_SECONDS - uptime.as_secs() % BILLING_WINDOW_SECONDS;
            let buffer_seconds = u64::from(worker.idle_termination_minutes.unsigned_abs()) * 60;
            // 已付费的剩余时间不足缓冲分钟数时回收，避免进入新的计费窗口
            if free_seconds_left <= buffer_seconds && !self.queue_has_work_for(worker).await {
                info!(
                    "Worker {} 已空闲 {} 分钟，计费窗口剩余 {} 分钟，触发空闲超时动作",
                    worker.id,
                    idle_seconds / 60,
                    free_seconds_left / 60
                );
                self.trigger_idle_timeout(worker).await;
            }
        }

        1
    }

    /// 队列中是否有显式指定此Worker标签的任务
    ///
    /// 必须扫描全部等待与阻塞任务：被上游依赖阻塞的任务同样占用此Worker。
    /// 队列扫描放在最终回收决策前的最后一步，减少与调度子系统的锁竞争
    async fn queue_has_work_for(&self, worker: &WorkerAgent) -> bool {
        let tasks = match self.queue.waiting_tasks().await {
            Ok(tasks) => tasks,
            Err(e) => {
                // 队列不可用时跳过回收，下个周期重试
                warn!("查询调度队列失败: {}", e);
                return true;
            }
        };
        for task in &tasks {
            if task.targets_label(&worker.label) {
                debug!(
                    "队列中存在等待Worker {} 的任务 {}，跳过空闲回收",
                    worker.id, task.name
                );
                return true;
            }
        }
        false
    }

    async fn trigger_idle_timeout(&self, worker: &WorkerAgent) {
        if let Err(e) = self.lifecycle.idle_timeout(worker).await {
            warn!("触发Worker {} 空闲超时动作失败: {}", worker.id, e);
        }
    }
}
