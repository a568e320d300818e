//! # fixfmt - 批量修复与格式化工具
//!
//! 对一组文件依次执行 预修复 → 格式化 → 条件后修复，仅在内容变化时写回，
//! 并限制同时处理的文件数。
//!
//! ## 子命令
//! - `run`       - 处理匹配的文件
//! - `root`      - 打印一组路径的公共根目录
//! - `languages` - 列出扩展名映射表
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/      (根目录解析、调度、批量执行)
//!   │     ├── pipeline/   (单文件流水线)
//!   │     └── capability/ (修复器与格式化器)
//!   ├── config.rs   (配置文件)
//!   ├── storage.rs  (文件读写)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod capability;
mod cli;
mod commands;
mod config;
mod error;
mod pipeline;
mod storage;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
