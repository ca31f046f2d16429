use chrono::{DateTime, Utc};

/// 可注入的时钟抽象
///
/// 巡检限流窗口与空闲时长计算都经由时钟读取当前时间，测试中可替换
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
