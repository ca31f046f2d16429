//! 用量预算跟踪的场景测试

use std::sync::Arc;
use std::time::Duration;

use retention_controller::{UsageBudgetTracker, WorkerRegistry};
use retention_core::traits::{TaskLifecycleListener, WorkerLifecycle};
use retention_testing_utils::{MockWorkerLifecycle, WorkerAgentBuilder};

struct Harness {
    registry: Arc<WorkerRegistry>,
    lifecycle: Arc<MockWorkerLifecycle>,
    tracker: UsageBudgetTracker,
}

fn harness() -> Harness {
    let registry = Arc::new(WorkerRegistry::new());
    let lifecycle = Arc::new(MockWorkerLifecycle::new());
    let tracker = UsageBudgetTracker::new(
        Arc::clone(&registry),
        Arc::clone(&lifecycle) as Arc<dyn WorkerLifecycle>,
    );
    Harness {
        registry,
        lifecycle,
        tracker,
    }
}

const TASK_DURATION: Duration = Duration::from_secs(90);

/// 配额为1：接受一个任务后暂停接单，任务完成后回收且只回收一次
#[tokio::test]
async fn test_quota_one_drains_then_terminates() {
    let h = harness();
    let worker = WorkerAgentBuilder::new().with_max_total_uses(1).build();
    let handle = h.registry.attach(worker).await;

    h.tracker.on_task_accepted("worker-001", "build_1").await;
    {
        let runtime = handle.runtime.lock().await;
        assert!(!runtime.accepting_tasks);
        assert_eq!(runtime.busy_executors, 1);
        assert_eq!(runtime.remaining_uses, 1);
    }
    assert_eq!(h.lifecycle.termination_count("worker-001"), 0);

    h.tracker
        .on_task_completed("worker-001", "build_1", TASK_DURATION)
        .await;
    assert_eq!(h.lifecycle.termination_count("worker-001"), 1);
    // 实例销毁后巡检调度状态一并丢弃
    assert!(h.registry.get("worker-001").await.is_none());

    // 迟到的完成事件不会再次回收
    h.tracker
        .on_task_completed("worker-001", "build_1", TASK_DURATION)
        .await;
    assert_eq!(h.lifecycle.termination_count("worker-001"), 1);
}

/// 配额为-1：任何数量的任务都不会消耗配额或触发预算回收
#[tokio::test]
async fn test_unlimited_quota_never_terminates() {
    let h = harness();
    let worker = WorkerAgentBuilder::new().with_max_total_uses(-1).build();
    let handle = h.registry.attach(worker).await;

    for i in 0..5 {
        let task = format!("build_{i}");
        h.tracker.on_task_accepted("worker-001", &task).await;
        h.tracker
            .on_task_completed("worker-001", &task, TASK_DURATION)
            .await;
    }

    let runtime = handle.runtime.lock().await;
    assert_eq!(runtime.remaining_uses, -1);
    assert!(runtime.accepting_tasks);
    assert_eq!(h.lifecycle.termination_count("worker-001"), 0);
    assert!(h.registry.get("worker-001").await.is_some());
}

/// 配额为3：每接受一个任务恰好递减一次，耗尽后暂停接单并在最后一个任务结束时回收
#[tokio::test]
async fn test_quota_counts_down_across_tasks() {
    let h = harness();
    let worker = WorkerAgentBuilder::new().with_max_total_uses(3).build();
    let handle = h.registry.attach(worker).await;

    h.tracker.on_task_accepted("worker-001", "build_1").await;
    assert_eq!(handle.runtime.lock().await.remaining_uses, 2);
    h.tracker
        .on_task_completed("worker-001", "build_1", TASK_DURATION)
        .await;

    h.tracker.on_task_accepted("worker-001", "build_2").await;
    assert_eq!(handle.runtime.lock().await.remaining_uses, 1);
    h.tracker
        .on_task_completed("worker-001", "build_2", TASK_DURATION)
        .await;
    assert_eq!(h.lifecycle.termination_count("worker-001"), 0);

    // 最后一次使用：接受即耗尽
    h.tracker.on_task_accepted("worker-001", "build_3").await;
    assert!(!handle.runtime.lock().await.accepting_tasks);
    h.tracker
        .on_task_completed("worker-001", "build_3", TASK_DURATION)
        .await;
    assert_eq!(h.lifecycle.termination_count("worker-001"), 1);
}

/// 配额耗尽但还有其它执行器在运行时，推迟回收到最后一个任务结束
#[tokio::test]
async fn test_termination_waits_for_last_busy_executor() {
    let h = harness();
    let worker = WorkerAgentBuilder::new().with_max_total_uses(1).build();
    let handle = h.registry.attach(worker).await;

    h.tracker.on_task_accepted("worker-001", "build_1").await;
    h.tracker.on_task_accepted("worker-001", "build_2").await;
    assert_eq!(handle.runtime.lock().await.busy_executors, 2);

    h.tracker
        .on_task_completed("worker-001", "build_1", TASK_DURATION)
        .await;
    assert_eq!(h.lifecycle.termination_count("worker-001"), 0);
    assert_eq!(handle.runtime.lock().await.busy_executors, 1);

    h.tracker
        .on_task_completed("worker-001", "build_2", TASK_DURATION)
        .await;
    assert_eq!(h.lifecycle.termination_count("worker-001"), 1);
}

/// 带错误结束的任务同样参与回收判定
#[tokio::test]
async fn test_faulted_completion_also_runs_post_job_action() {
    let h = harness();
    let worker = WorkerAgentBuilder::new().with_max_total_uses(1).build();
    h.registry.attach(worker).await;

    h.tracker.on_task_accepted("worker-001", "build_1").await;
    h.tracker
        .on_task_completed_with_problems("worker-001", "build_1", TASK_DURATION, "执行超时")
        .await;

    assert_eq!(h.lifecycle.termination_count("worker-001"), 1);
}

/// 未注册Worker的事件被忽略
#[tokio::test]
async fn test_events_for_unknown_worker_are_ignored() {
    let h = harness();

    h.tracker.on_task_accepted("ghost-worker", "build_1").await;
    h.tracker
        .on_task_completed("ghost-worker", "build_1", TASK_DURATION)
        .await;

    assert_eq!(h.lifecycle.total_terminations(), 0);
}

/// 再激活重置已耗尽的配额
#[tokio::test]
async fn test_reactivation_resets_drained_quota() {
    let h = harness();
    let worker = WorkerAgentBuilder::new().with_max_total_uses(2).build();
    h.registry.attach(worker.clone()).await;

    h.tracker.on_task_accepted("worker-001", "build_1").await;
    h.tracker.on_task_accepted("worker-001", "build_2").await;
    h.tracker
        .on_task_completed("worker-001", "build_1", TASK_DURATION)
        .await;

    let handle = h.registry.activate(worker).await;
    let runtime = handle.runtime.lock().await;
    assert_eq!(runtime.remaining_uses, 2);
    assert!(runtime.accepting_tasks);
}
