use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use retention_core::models::WorkerAgent;
use retention_core::traits::ComputeStateProbe;
use retention_core::Clock;

use crate::policy::IdlePolicy;
use crate::registry::{WorkerHandle, WorkerRegistry};

/// 保留控制器
///
/// 持有每个Worker的巡检调度状态，由宿主按约1分钟的节奏调用check，
/// 调用可能跨tick重叠、跨Worker并行。单个Worker的评估由非阻塞锁保证单飞：
/// 慢探测只会让后续tick立即返回，而不是排队阻塞
pub struct RetentionController {
    registry: Arc<WorkerRegistry>,
    policy: IdlePolicy,
    probe: Arc<dyn ComputeStateProbe>,
    clock: Arc<dyn Clock>,
    /// 编排器自身的启动是否已经完成，影响attach时的重连策略
    orchestrator_ready: Arc<AtomicBool>,
}

impl RetentionController {
    pub fn new(
        registry: Arc<WorkerRegistry>,
        policy: IdlePolicy,
        probe: Arc<dyn ComputeStateProbe>,
        clock: Arc<dyn Clock>,
        orchestrator_ready: Arc<AtomicBool>,
    ) -> Self {
        Self {
            registry,
            policy,
            probe,
            clock,
            orchestrator_ready,
        }
    }

    /// 注册Worker并执行一次性的启动逻辑
    pub async fn attach(&self, agent: WorkerAgent) -> Arc<WorkerHandle> {
        let handle = self.registry.attach(agent).await;
        self.start(&handle.agent.id).await;
        handle
    }

    /// 配置记录重新生效时的再激活入口，重建调度状态后同样走启动逻辑
    pub async fn activate(&self, agent: WorkerAgent) -> Arc<WorkerHandle> {
        let handle = self.registry.activate(agent).await;
        self.start(&handle.agent.id).await;
        handle
    }

    /// 注销Worker并丢弃其调度状态
    pub async fn deregister(&self, worker_id: &str) {
        self.registry.deregister(worker_id).await;
    }

    /// 周期性巡检入口，返回距下次检查的分钟数
    ///
    /// 未注册的Worker、锁竞争、未到巡检窗口都立即返回1且不产生副作用。
    /// 评估锁在所有退出路径上都会释放
    pub async fn check(&self, worker_id: &str) -> i64 {
        let Some(handle) = self.registry.get(worker_id).await else {
            debug!("Worker {} 未注册或已注销，跳过巡检", worker_id);
            return 1;
        };

        // 同一Worker同一时刻至多一次评估在执行
        let Some(_guard) = handle.schedule.try_acquire() else {
            return 1;
        };

        let now_millis = self.clock.now().timestamp_millis();
        if now_millis <= handle.schedule.next_check_after_millis() {
            return 1;
        }

        let interval = self.policy.evaluate(&handle).await;
        handle
            .schedule
            .set_next_check_after_millis(now_millis + interval * 60_000);
        interval
    }

    /// Worker注册后的一次性启动入口
    ///
    /// 编排器自身启动尚未完成时，只对PENDING/RUNNING状态的实例发起重连，
    /// 不唤醒编排器离线期间被人为停止的实例；编排器就绪后总是发起连接
    pub async fn start(&self, worker_id: &str) {
        let Some(handle) = self.registry.get(worker_id).await else {
            debug!("Worker {} 未注册，忽略启动请求", worker_id);
            return;
        };
        let worker = &handle.agent;

        if !self.orchestrator_ready.load(Ordering::SeqCst) {
            let state = match self.probe.get_state(worker).await {
                Ok(state) => Some(state),
                Err(e) => {
                    debug!("查询Worker {} 实例状态失败: {}", worker.id, e);
                    None
                }
            };
            if !matches!(state, Some(s) if s.is_provisioning_or_running()) {
                info!(
                    "编排器启动中，忽略Worker {} 的启动请求，实例状态: {:?}",
                    worker.id, state
                );
                return;
            }
        }

        info!("为Worker {} 发起连接请求", worker.id);
        if let Err(e) = self.probe.connect(worker).await {
            warn!("Worker {} 连接请求失败: {}", worker.id, e);
        }
    }
}
