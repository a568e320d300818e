//! # 忽略列表
//!
//! 从配置和批次根目录下的 `.fixfmtignore` 读取 glob 模式，
//! 被匹配的文件在格式化阶段标记为 `ignored`。
//!
//! ## 匹配规则
//! - 模式与相对根目录的完整路径匹配
//! - 不含 `/` 的模式同时与文件名匹配
//! - 模式匹配任一上级目录时，目录下所有文件都被忽略
//!
//! ## 依赖关系
//! - 被 `capability/builtin.rs`、`capability/command.rs` 使用
//! - 使用 `glob::Pattern`

use crate::error::{FixfmtError, Result};

use glob::Pattern;
use std::fs;
use std::path::Path;

/// 忽略文件名
pub const IGNORE_FILE: &str = ".fixfmtignore";

/// 忽略列表
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    /// 从模式列表构建
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut list = Self::default();
        for p in patterns {
            list.add(p.as_ref())?;
        }
        Ok(list)
    }

    /// 添加一个模式（空行和 `#` 注释被跳过）
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern.starts_with('#') {
            return Ok(());
        }

        let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
        let compiled = Pattern::new(pattern).map_err(|e| FixfmtError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.patterns.push(compiled);
        Ok(())
    }

    /// 合并 `root` 下的忽略文件（不存在时忽略）
    pub fn load_file(&mut self, root: &Path) -> Result<()> {
        let path = root.join(IGNORE_FILE);
        if !path.is_file() {
            return Ok(());
        }

        let content = fs::read_to_string(&path).map_err(|e| FixfmtError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        for line in content.lines() {
            self.add(line)?;
        }
        Ok(())
    }

    /// 检查相对路径是否被忽略
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let file_name = path.file_name().and_then(|n| n.to_str());

        self.patterns.iter().any(|pattern| {
            if pattern.matches_path(path) {
                return true;
            }
            if !pattern.as_str().contains('/') {
                if let Some(name) = file_name {
                    if pattern.matches(name) {
                        return true;
                    }
                }
            }
            path.ancestors()
                .skip(1)
                .filter(|a| !a.as_os_str().is_empty())
                .any(|a| pattern.matches_path(a))
        })
    }
}
