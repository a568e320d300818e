//! # run 子命令 CLI 定义
//!
//! 对匹配的文件执行 预修复 → 格式化 → 后修复
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Glob patterns, files or directories; each one is processed as its own batch
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Number of files processed at the same time (0 = auto, default from config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Report files that would change without writing them
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// Write a per-stage CSV report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Include files and directories starting with '.'
    #[arg(long, default_value_t = false)]
    pub hidden: bool,

    /// Only print failures and the final summary
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}
