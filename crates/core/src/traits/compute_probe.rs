use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{ComputeState, WorkerAgent};
use crate::RetentionResult;

/// 计算层状态探测接口
///
/// get_state 会刷新缓存的云端实例信息，因此状态查询必须先于运行时长查询。
/// get_state / get_uptime 在云端API出错或调用被中断时返回
/// `RetentionError::ProbeUnavailable`
#[async_trait]
pub trait ComputeStateProbe: Send + Sync {
    /// 查询实例生命周期状态（副作用：刷新缓存的云端信息）
    async fn get_state(&self, worker: &WorkerAgent) -> RetentionResult<ComputeState>;

    /// 查询实例自启动以来的运行时长
    async fn get_uptime(&self, worker: &WorkerAgent) -> RetentionResult<Duration>;

    /// Worker当前是否空闲（没有任务在执行）
    async fn is_idle(&self, worker: &WorkerAgent) -> bool;

    /// Worker与编排器之间的连接是否在线
    async fn is_online(&self, worker: &WorkerAgent) -> bool;

    async fn is_offline(&self, worker: &WorkerAgent) -> bool {
        !self.is_online(worker).await
    }

    /// 当前空闲期的起始时间
    async fn idle_start_time(&self, worker: &WorkerAgent) -> DateTime<Utc>;

    /// 发起连接请求
    async fn connect(&self, worker: &WorkerAgent) -> RetentionResult<()>;

    /// 断开连接
    async fn disconnect(&self, worker: &WorkerAgent, reason: &str) -> RetentionResult<()>;
}
