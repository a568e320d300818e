//! # 有界并发调度器
//!
//! 以固定数量的工作槽执行一组独立任务。
//!
//! ## 保证
//! - 任务按提交顺序启动（FIFO scope）
//! - 同时在执行的任务不超过 `max_parallel`
//! - 结果 `i` 总是对应 `tasks[i]`，与完成顺序无关
//! - 单个任务 panic 不会取消其他任务；全部任务结束后统一报告
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `rayon` 线程池作为工作槽

use crate::error::{FixfmtError, Result};

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

/// 零参数任务
pub type Task<'a, T> = Box<dyn FnOnce() -> T + Send + 'a>;

/// 有界并发调度器
pub struct Scheduler {
    /// 最大并发数
    max_parallel: usize,
}

impl Scheduler {
    /// 创建调度器，`max_parallel` 必须 ≥ 1
    pub fn new(max_parallel: usize) -> Result<Self> {
        if max_parallel == 0 {
            return Err(FixfmtError::InvalidArgument(
                "max_parallel must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_parallel })
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// 执行所有任务并按输入顺序返回结果
    ///
    /// 任意任务 panic 时，等待全部任务结束后返回 `TasksPanicked`，
    /// 其中列出每个失败任务的下标。
    pub fn run<'a, T: Send>(&self, tasks: Vec<Task<'a, T>>) -> Result<Vec<T>> {
        let total = tasks.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        // 槽位数不超过任务数；max_parallel >= total 时不会发生等待
        let slots = self.max_parallel.min(total);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(slots)
            .thread_name(|i| format!("fixfmt-worker-{}", i))
            .build()
            .map_err(|e| FixfmtError::ThreadPoolError(e.to_string()))?;

        let results: Vec<Mutex<Option<std::thread::Result<T>>>> =
            (0..total).map(|_| Mutex::new(None)).collect();

        pool.scope_fifo(|scope| {
            for (index, task) in tasks.into_iter().enumerate() {
                let slot = &results[index];
                scope.spawn_fifo(move |_| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(task));
                    if let Ok(mut guard) = slot.lock() {
                        *guard = Some(outcome);
                    }
                });
            }
        });

        let mut values = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (index, slot) in results.into_iter().enumerate() {
            let settled = slot.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
            match settled {
                Some(Ok(value)) => values.push(value),
                Some(Err(payload)) => failures.push((index, panic_message(payload.as_ref()))),
                None => failures.push((index, "task did not settle".to_string())),
            }
        }

        if failures.is_empty() {
            Ok(values)
        } else {
            let details = failures
                .iter()
                .map(|(i, msg)| format!("  task #{}: {}", i, msg))
                .collect::<Vec<_>>()
                .join("\n");
            Err(FixfmtError::TasksPanicked {
                count: failures.len(),
                details,
            })
        }
    }
}

/// 提取 panic 信息
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
