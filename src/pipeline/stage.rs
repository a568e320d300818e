//! # 阶段记录
//!
//! 定义流水线阶段种类、变更标记和单阶段结果。
//!
//! ## 依赖关系
//! - 被 `pipeline/file.rs`、`batch/runner.rs`、`batch/export.rs` 使用

use std::fmt;
use std::time::Duration;

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// 格式化前的自动修复
    PreFix,
    /// 格式化
    Format,
    /// 格式化改动后的再次修复
    PostFix,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::PreFix => "pre-fix",
            StageKind::Format => "format",
            StageKind::PostFix => "post-fix",
        }
    }

    pub fn is_fix(&self) -> bool {
        matches!(self, StageKind::PreFix | StageKind::PostFix)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 阶段对内容的影响
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Changed,
    Unchanged,
    /// 阶段主动跳过了该文件（如被忽略列表排除），不算作修改
    Ignored,
}

impl Change {
    pub fn is_changed(&self) -> bool {
        matches!(self, Change::Changed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Change::Changed => "changed",
            Change::Unchanged => "unchanged",
            Change::Ignored => "ignored",
        }
    }
}

impl From<bool> for Change {
    fn from(changed: bool) -> Self {
        if changed {
            Change::Changed
        } else {
            Change::Unchanged
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个阶段的结果
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage: StageKind,
    /// 阶段结束后的工作内容
    pub output: String,
    pub runtime: Duration,
    pub changed: Change,
}

impl StageResult {
    pub fn millis(&self) -> f64 {
        self.runtime.as_secs_f64() * 1000.0
    }
}
