//! # 外部能力接口
//!
//! 流水线只通过这里定义的接口调用自动修复器（fixer）与格式化器（formatter），
//! 不关心它们内部如何加载规则或语法。
//!
//! ## 后端
//! - `builtin`: 内置的空白修复与格式化
//! - `command`: 调用外部程序（stdin 输入，stdout 输出）
//!
//! ## 依赖关系
//! - 被 `pipeline/`、`batch/runner.rs`、`commands/run.rs` 使用
//! - 子模块: builtin, command, ignore, languages

pub mod builtin;
pub mod command;
pub mod ignore;
pub mod languages;

pub use ignore::IgnoreList;
pub use languages::LanguageTable;

use crate::config::FormatSettings;
use crate::error::{FixfmtError, Result};
use std::path::Path;

/// 修复结果，`output` 为 `None` 表示没有产生修复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutput {
    pub output: Option<String>,
    pub changed: bool,
}

impl FixOutput {
    /// 根据输入与输出构造结果
    pub fn compare(input: &str, output: String) -> Self {
        if output == input {
            Self::unchanged()
        } else {
            Self {
                output: Some(output),
                changed: true,
            }
        }
    }

    pub fn unchanged() -> Self {
        Self {
            output: None,
            changed: false,
        }
    }
}

/// 自动修复器
pub trait Fixer: Send + Sync {
    /// 描述（名称与版本）
    fn describe(&self) -> String;

    fn apply(&self, text: &str, path: &Path) -> Result<FixOutput>;
}

/// 自动修复器的构造过程，每个批次只调用一次
pub trait FixerFactory {
    fn init(&self, root: &Path) -> Result<Box<dyn Fixer>>;
}

/// 单文件格式化选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// 解析器名称（来自扩展名映射表）
    pub parser: String,
    pub tab_width: usize,
    pub use_tabs: bool,
    pub max_blank_lines: usize,
}

/// 格式化器
pub trait Formatter: Send + Sync {
    fn describe(&self) -> String;

    /// 是否识别该文件类型
    fn supports(&self, path: &Path) -> bool;

    fn resolve_options(&self, path: &Path) -> Result<FormatOptions>;

    /// 是否被忽略列表排除
    fn is_ignored(&self, path: &Path) -> bool;

    fn format(&self, text: &str, path: &Path, options: &FormatOptions) -> Result<String>;
}

/// 格式化器的构造过程，每个批次只调用一次
pub trait FormatterFactory {
    fn init(&self, root: &Path) -> Result<Box<dyn Formatter>>;
}

/// 构建格式化器所需的配置项
#[derive(Debug, Clone, Default)]
pub struct FormatterSetup {
    pub languages: LanguageTable,
    pub settings: FormatSettings,
    /// 配置中的忽略模式
    pub ignore: Vec<String>,
}

impl FormatterSetup {
    /// 合并 `root` 下的忽略文件，生成文件规则
    pub fn rules(&self, root: &Path) -> Result<FormatRules> {
        let mut ignore = IgnoreList::new(&self.ignore)?;
        ignore.load_file(root)?;
        Ok(FormatRules {
            languages: self.languages.clone(),
            settings: self.settings.clone(),
            ignore,
        })
    }
}

/// 格式化器共用的文件规则
#[derive(Debug, Clone)]
pub struct FormatRules {
    pub languages: LanguageTable,
    pub settings: FormatSettings,
    pub ignore: IgnoreList,
}

impl FormatRules {
    pub fn supports(&self, path: &Path) -> bool {
        self.languages.supports(path)
    }

    pub fn resolve_options(&self, capability: &str, path: &Path) -> Result<FormatOptions> {
        self.languages
            .options_for(path, &self.settings)
            .ok_or_else(|| FixfmtError::CapabilityError {
                capability: capability.to_string(),
                path: path.display().to_string(),
                reason: "no parser registered for this file type".to_string(),
            })
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore.is_ignored(path)
    }
}
