//! # 流水线模块
//!
//! 单文件的 预修复 → 格式化 → 后修复 流程，以及阶段计时与记录。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 使用 `capability/`、`storage.rs`
//! - 子模块: file, stage, timer

pub mod file;
pub mod stage;
pub mod timer;

pub use file::{FailureStep, FileFailure, FileOutcome, FilePipeline, FileStatus, WriteMode};
pub use stage::{Change, StageKind};
