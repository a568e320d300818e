//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `run`: 对匹配的文件执行 修复 → 格式化 → 修复
//! - `root`: 打印一组路径的公共根目录
//! - `languages`: 列出扩展名映射表
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: languages, root, run

pub mod languages;
pub mod root;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fixfmt - 批量自动修复与格式化
#[derive(Parser)]
#[command(name = "fixfmt")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch autofix + format runner with bounded concurrency", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ./fixfmt.toml when present)
    #[arg(long, global = true, env = "FIXFMT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Fix and format all files matching the given patterns
    Run(run::RunArgs),

    /// Print the common root directory of the given paths
    Root(root::RootArgs),

    /// List the extension table used to pick parser and fixer
    Languages(languages::LanguagesArgs),
}
