use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("计算状态探测失败: {0}")]
    ProbeUnavailable(String),
    #[error("Worker未注册: {id}")]
    WorkerNotRegistered { id: String },
    #[error("队列查询错误: {0}")]
    Queue(String),
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("无效的配置值: {field} = {value}")]
    InvalidConfigValue { field: String, value: String },
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type RetentionResult<T> = Result<T, RetentionError>;

impl RetentionError {
    pub fn probe_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::ProbeUnavailable(msg.into())
    }
    pub fn worker_not_registered<S: Into<String>>(id: S) -> Self {
        Self::WorkerNotRegistered { id: id.into() }
    }
    pub fn queue_error<S: Into<String>>(msg: S) -> Self {
        Self::Queue(msg.into())
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    /// 瞬时失败：跳过本轮评估，下个巡检周期自动重试
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RetentionError::ProbeUnavailable(_) | RetentionError::Queue(_)
        )
    }
}

impl From<anyhow::Error> for RetentionError {
    fn from(err: anyhow::Error) -> Self {
        RetentionError::Internal(err.to_string())
    }
}
