//! # 批量处理模块
//!
//! 提供统一的文件批量处理能力。
//!
//! ## 功能
//! - 根据模式收集文件列表
//! - 解析公共根目录
//! - 有界并发调度
//! - 批量执行、统计与 CSV 报告
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度
//! - 子模块: collector, export, root, runner, scheduler

pub mod collector;
pub mod export;
pub mod root;
pub mod runner;
pub mod scheduler;

pub use collector::FileCollector;
pub use runner::{BatchReport, BatchRunner};
