use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{RetentionError, RetentionResult};

/// 实例启动超时默认值（分钟）
pub const STARTUP_TIMEOUT_DEFAULT_MINUTES: i64 = 30;

/// 空闲回收阈值解析失败时替换的默认值（分钟）
pub const IDLE_TERMINATION_FALLBACK_MINUTES: i32 = 30;

/// 保留控制器的进程级配置
///
/// 进程级开关以显式配置注入控制器，而不是在运行期读取环境变量等隐式全局状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// 全局禁用空闲回收
    pub disabled: bool,
    /// 实例启动超时（分钟）：离线且运行时长未超过该值的实例视为仍在启动中
    pub startup_timeout_minutes: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            startup_timeout_minutes: STARTUP_TIMEOUT_DEFAULT_MINUTES,
        }
    }
}

impl RetentionConfig {
    pub fn validate(&self) -> RetentionResult<()> {
        if self.startup_timeout_minutes <= 0 {
            return Err(RetentionError::InvalidConfigValue {
                field: "retention.startup_timeout_minutes".to_string(),
                value: self.startup_timeout_minutes.to_string(),
            });
        }
        Ok(())
    }
}

/// 解析空闲回收阈值配置
///
/// 空白输入表示永不回收（0）；无法解析的输入替换为默认值并记录日志，
/// 解析失败不向调用方传播
pub fn parse_idle_termination_minutes(raw: &str) -> i32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<i32>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "无法解析的空闲回收阈值配置: {raw}，使用默认值 {IDLE_TERMINATION_FALLBACK_MINUTES}"
            );
            IDLE_TERMINATION_FALLBACK_MINUTES
        }
    }
}
