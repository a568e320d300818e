//! # root 子命令 CLI 定义
//!
//! 打印一组路径的公共根目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/root.rs`

use clap::Args;

/// root 子命令参数
#[derive(Args, Debug)]
pub struct RootArgs {
    /// File paths (used as-is, no glob expansion)
    pub paths: Vec<String>,

    /// Also print every path relative to the root
    #[arg(short, long, default_value_t = false)]
    pub relative: bool,
}
