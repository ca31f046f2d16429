use serde::{Deserialize, Serialize};

/// 调度队列中等待执行的任务视图
///
/// 保留控制只消费队列的一个极小切面：任务是否显式指定了某个Worker标签。
/// 被上游依赖阻塞的任务（blocked）同样占用其目标Worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedTask {
    pub id: i64,
    pub name: String,
    /// 显式指定的目标Worker标签，None 表示任意Worker均可执行
    pub assigned_label: Option<String>,
    pub blocked: bool,
}

impl QueuedTask {
    pub fn targets_label(&self, label: &str) -> bool {
        self.assigned_label.as_deref() == Some(label)
    }
}
