//! # 统一错误处理模块
//!
//! 定义 fixfmt 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 致命错误：`SetupError`, `PreconditionError`（在调度前中止整个批次）
//! - 单文件错误：I/O 与 `CapabilityError`（记录在该文件的结果中，其余文件继续）
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// fixfmt 统一错误类型
#[derive(Error, Debug)]
pub enum FixfmtError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 能力（fixer / formatter）错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to initialize {capability}: {reason}")]
    SetupError { capability: String, reason: String },

    #[error("Precondition violated: {0}")]
    PreconditionError(String),

    #[error("{capability} failed on {path}: {reason}")]
    CapabilityError {
        capability: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 调度错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to build worker pool: {0}")]
    ThreadPoolError(String),

    #[error("{count} task(s) panicked:\n{details}")]
    TasksPanicked { count: usize, details: String },

    // ─────────────────────────────────────────────────────────────
    // 配置与参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid config file: {path}\nReason: {reason}")]
    ConfigError { path: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("{count} file(s) failed")]
    FilesFailed { count: usize },

    #[error("{count} file(s) would be changed")]
    FilesWouldChange { count: usize },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, FixfmtError>;
