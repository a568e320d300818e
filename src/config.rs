//! # 配置文件
//!
//! 读取可选的 `fixfmt.toml`，所有字段均有默认值。
//!
//! ```toml
//! parallel = 4
//! ignore = ["dist/**", "*.min.js"]
//!
//! [format]
//! tab_width = 2
//! use_tabs = false
//! max_blank_lines = 1
//!
//! [fixer]
//! backend = "command"
//! program = "eslint_d"
//! args = ["--fix-to-stdout", "--stdin", "--stdin-filename", "{path}"]
//! version_args = ["--version"]
//!
//! [languages]
//! ".toml" = { parser = "toml" }
//! ```
//!
//! ## 依赖关系
//! - 被 `main.rs` / `commands/` 使用
//! - 使用 `serde` + `toml` 反序列化

use crate::capability::LanguageTable;
use crate::error::{FixfmtError, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const CONFIG_FILE: &str = "fixfmt.toml";

/// 默认并发任务数
pub const PARALLEL_TASKS: usize = 4;

/// 顶层配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 同时处理的文件数
    pub parallel: usize,
    /// 额外的忽略模式
    pub ignore: Vec<String>,
    pub format: FormatSettings,
    pub fixer: BackendConfig,
    pub formatter: BackendConfig,
    /// 扩展名映射覆盖项，`parser = ""` 表示移除该扩展名
    pub languages: BTreeMap<String, LanguageOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel: PARALLEL_TASKS,
            ignore: Vec::new(),
            format: FormatSettings::default(),
            fixer: BackendConfig::Builtin,
            formatter: BackendConfig::Builtin,
            languages: BTreeMap::new(),
        }
    }
}

/// 格式化设置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatSettings {
    pub tab_width: usize,
    pub use_tabs: bool,
    pub max_blank_lines: usize,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            tab_width: 2,
            use_tabs: false,
            max_blank_lines: 1,
        }
    }
}

/// 后端选择
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum BackendConfig {
    #[default]
    Builtin,
    Command(CommandSpec),
}

/// 外部命令描述
///
/// `args` 中的 `{path}` 替换为相对根目录的文件路径，`{parser}` 替换为解析器名称。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// 初始化时执行一次，用于确认命令可用并获取版本
    #[serde(default)]
    pub version_args: Vec<String>,
}

/// 扩展名映射覆盖项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageOverride {
    pub parser: String,
    #[serde(default)]
    pub fixable: bool,
}

impl Config {
    /// 加载配置
    ///
    /// 显式给出的路径必须存在；否则尝试当前目录下的 `fixfmt.toml`，不存在时使用默认值。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };

        if !path.is_file() {
            if required {
                return Err(FixfmtError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| FixfmtError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path)
    }

    /// 解析 TOML 文本
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| FixfmtError::ConfigError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.format.tab_width == 0 {
            return Err(FixfmtError::ConfigError {
                path: path.display().to_string(),
                reason: "format.tab_width must be at least 1".to_string(),
            });
        }
        for backend in [&self.fixer, &self.formatter] {
            if let BackendConfig::Command(spec) = backend {
                if spec.program.trim().is_empty() {
                    return Err(FixfmtError::ConfigError {
                        path: path.display().to_string(),
                        reason: "command backend requires a non-empty 'program'".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// 生成扩展名映射表
    pub fn language_table(&self) -> LanguageTable {
        LanguageTable::default().with_overrides(&self.languages)
    }
}
