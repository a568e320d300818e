//! # 文件收集器
//!
//! 把命令行模式展开为待处理文件列表。
//!
//! ## 功能
//! - 单文件直接返回
//! - 目录递归搜索（跳过 `.git`、`node_modules` 等目录）
//! - 其余输入按 glob 模式匹配，不匹配隐藏文件
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`、`commands/root.rs` 调用
//! - 使用 `glob` 匹配模式，`walkdir` 遍历目录

use crate::error::{FixfmtError, Result};

use glob::MatchOptions;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// 遍历目录时跳过的目录名
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn", "node_modules", "target"];

/// 文件收集器
pub struct FileCollector {
    /// 输入模式
    pattern: String,
    /// 是否匹配以 `.` 开头的文件
    include_hidden: bool,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            include_hidden: false,
        }
    }

    /// 设置是否包含隐藏文件
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// 收集所有匹配的文件（排序去重）
    ///
    /// 没有任何匹配时返回 `NoFilesFound`。
    pub fn collect(&self) -> Result<Vec<String>> {
        let input = Path::new(&self.pattern);

        let mut files = if input.is_file() {
            vec![self.pattern.clone()]
        } else if input.is_dir() {
            self.walk(input)
        } else {
            self.glob()?
        };

        files.sort();
        files.dedup();

        if files.is_empty() {
            return Err(FixfmtError::NoFilesFound {
                pattern: self.pattern.clone(),
            });
        }
        Ok(files)
    }

    /// 递归遍历目录
    fn walk(&self, dir: &Path) -> Vec<String> {
        WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_skipped(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| path_string(e.path()))
            .collect()
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()) {
            return true;
        }
        !self.include_hidden && name.starts_with('.')
    }

    /// glob 模式匹配
    fn glob(&self) -> Result<Vec<String>> {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: !self.include_hidden,
        };

        let paths = glob::glob_with(&self.pattern, options).map_err(|e| {
            FixfmtError::InvalidPattern {
                pattern: self.pattern.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(paths
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file())
            .map(|p| path_string(&p))
            .collect())
    }
}

/// 路径转为 `/` 分隔的字符串
fn path_string(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
