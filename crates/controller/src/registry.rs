use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

use retention_core::models::{WorkerAgent, WorkerRuntime};

/// 单个Worker的巡检调度状态
///
/// next_check_after 在成功评估后单调递增；check_lock 保证同一Worker
/// 同一时刻至多有一次评估在执行，锁竞争方立即返回而不是排队
pub struct CheckSchedule {
    next_check_after_millis: AtomicI64,
    check_lock: Mutex<()>,
}

impl CheckSchedule {
    pub fn new() -> Self {
        Self {
            next_check_after_millis: AtomicI64::new(i64::MIN),
            check_lock: Mutex::new(()),
        }
    }

    /// 非阻塞地获取评估锁，已被占用时返回None
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, ()>> {
        self.check_lock.try_lock().ok()
    }

    pub fn next_check_after_millis(&self) -> i64 {
        self.next_check_after_millis.load(Ordering::SeqCst)
    }

    pub fn set_next_check_after_millis(&self, millis: i64) {
        self.next_check_after_millis.store(millis, Ordering::SeqCst);
    }
}

impl Default for CheckSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// 注册表中的Worker句柄
///
/// 配置记录不可变；运行期计数器由任务生命周期事件串行修改
pub struct WorkerHandle {
    pub agent: WorkerAgent,
    pub runtime: Mutex<WorkerRuntime>,
    pub schedule: CheckSchedule,
}

/// Worker注册表
///
/// 控制器与用量预算跟踪器共享同一份注册表。句柄在attach时创建，
/// 在deregister或实例销毁时丢弃；评估中途被注销的Worker由持有旧句柄的
/// 一方自行跳过
#[derive(Default)]
pub struct WorkerRegistry {
    workers: RwLock<HashMap<String, Arc<WorkerHandle>>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self {
            workers: RwLock::new(HashMap::new()),
        }
    }

    /// 注册Worker，创建巡检调度状态与用量计数器
    pub async fn attach(&self, agent: WorkerAgent) -> Arc<WorkerHandle> {
        let handle = Arc::new(WorkerHandle {
            runtime: Mutex::new(WorkerRuntime::new(agent.max_total_uses)),
            schedule: CheckSchedule::new(),
            agent,
        });
        self.workers
            .write()
            .await
            .insert(handle.agent.id.clone(), Arc::clone(&handle));
        info!("Worker {} 已注册到保留控制器", handle.agent.id);
        handle
    }

    /// 重新激活：持久化的配置记录重新生效时重建锁、巡检窗口等运行期状态，
    /// 使用配额同时从配置重置
    pub async fn activate(&self, agent: WorkerAgent) -> Arc<WorkerHandle> {
        debug!("重建Worker {} 的保留调度状态", agent.id);
        self.attach(agent).await
    }

    pub async fn get(&self, worker_id: &str) -> Option<Arc<WorkerHandle>> {
        self.workers.read().await.get(worker_id).cloned()
    }

    /// 注销Worker并丢弃其调度状态
    pub async fn deregister(&self, worker_id: &str) -> Option<Arc<WorkerHandle>> {
        let removed = self.workers.write().await.remove(worker_id);
        if removed.is_some() {
            info!("Worker {} 已从保留控制器注销", worker_id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.workers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.workers.read().await.is_empty()
    }
}
