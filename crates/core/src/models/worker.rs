use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 云端计算实例的生命周期状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ComputeState {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "STOPPING")]
    Stopping,
    #[serde(rename = "STOPPED")]
    Stopped,
    #[serde(rename = "TERMINATED")]
    Terminated,
}

impl ComputeState {
    pub fn is_stopped_or_stopping(&self) -> bool {
        matches!(self, ComputeState::Stopped | ComputeState::Stopping)
    }

    pub fn is_provisioning_or_running(&self) -> bool {
        matches!(self, ComputeState::Pending | ComputeState::Running)
    }
}

/// 云端Worker Agent的注册记录
///
/// idle_termination_minutes 的符号决定回收模式：0 表示永不回收，
/// 正数表示固定空闲分钟数阈值，负数表示计费窗口结束前的缓冲分钟数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerAgent {
    pub id: String,
    /// 云端实例ID
    pub instance_id: String,
    /// 用于将任务定向到此Worker的专属标签
    pub label: String,
    pub idle_termination_minutes: i32,
    /// 使用配额，-1 表示无限制
    pub max_total_uses: i32,
    /// 空闲超时动作是停止实例而非销毁
    pub stop_on_terminate: bool,
    pub registered_at: DateTime<Utc>,
}

impl WorkerAgent {
    pub fn never_terminates(&self) -> bool {
        self.idle_termination_minutes == 0
    }

    /// 使用配额是否有限
    pub fn is_usage_limited(&self) -> bool {
        self.max_total_uses > -1
    }

    /// 是否按计费窗口模式回收
    pub fn billing_window_mode(&self) -> bool {
        self.idle_termination_minutes < 0
    }
}

/// Worker的运行期计数器，由任务生命周期事件驱动
///
/// remaining_uses 只减不增，仅在配置记录重新生效（重新注册）时重置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRuntime {
    pub remaining_uses: i32,
    pub accepting_tasks: bool,
    pub busy_executors: i32,
    /// 预算路径回收只允许发生一次
    pub terminated: bool,
}

impl WorkerRuntime {
    pub fn new(max_total_uses: i32) -> Self {
        Self {
            remaining_uses: max_total_uses,
            accepting_tasks: true,
            busy_executors: 0,
            terminated: false,
        }
    }
}
