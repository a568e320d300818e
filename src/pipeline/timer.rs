//! # 阶段计时
//!
//! 包装一次操作并记录其墙钟耗时。
//!
//! ## 依赖关系
//! - 被 `pipeline/file.rs` 和 `commands/run.rs` 使用

use std::time::{Duration, Instant};

/// 带耗时的结果
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub result: T,
    pub runtime: Duration,
}

impl<T> Timed<T> {
    /// 耗时（毫秒）
    pub fn millis(&self) -> f64 {
        self.runtime.as_secs_f64() * 1000.0
    }
}

/// 执行 `op` 并测量耗时
pub fn measure<T, F>(op: F) -> Timed<T>
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = op();
    Timed {
        result,
        runtime: start.elapsed(),
    }
}
