//! # 美化输出工具
//!
//! 提供统一的终端输出样式，以及单文件结果行使用的状态符号。
//!
//! ## 依赖关系
//! - 被 `commands/`、`batch/runner.rs` 使用
//! - 使用 `colored` crate

use crate::pipeline::Change;

use colored::{ColoredString, Colorize};

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 阶段变化对应的符号：修改 ✔，跳过 •，忽略 -
pub fn change_symbol(change: Option<Change>) -> ColoredString {
    match change {
        Some(Change::Changed) => "✔".green(),
        Some(Change::Ignored) => "-".dimmed(),
        Some(Change::Unchanged) | None => "•".dimmed(),
    }
}

/// 失败符号
pub fn error_symbol() -> ColoredString {
    "✖".red()
}

/// 打印单文件结果行
pub fn print_file_line(format: ColoredString, fix: ColoredString, path: &str, millis: f64) {
    println!("{} {} {} {}", format, fix, path, format!("({:.0}ms)", millis).dimmed());
}
