//! # 内置后端
//!
//! 不依赖外部工具的修复器与格式化器，只处理空白与换行。两者都是幂等的。
//!
//! ## 修复规则
//! - 移除文件开头的 BOM
//! - 移除每行末尾的空格与制表符
//!
//! ## 格式化规则
//! - 换行统一为 LF
//! - 行首缩进按 `tab_width` / `use_tabs` 重新生成
//! - 连续空行压缩到 `max_blank_lines`，去除首尾空行
//! - 非空文件以单个换行结尾
//!
//! ## 依赖关系
//! - 实现 `capability/mod.rs` 中的接口
//! - 使用 `regex` 匹配行尾空白

use crate::capability::{
    FixOutput, Fixer, FixerFactory, FormatOptions, FormatRules, Formatter, FormatterFactory,
    FormatterSetup,
};
use crate::error::Result;

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static TRAILING_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+(\r?)$").unwrap());

const BOM: char = '\u{feff}';

// ─────────────────────────────────────────────────────────────
// 修复器
// ─────────────────────────────────────────────────────────────

/// 内置修复器
#[derive(Debug, Default)]
pub struct BuiltinFixer;

impl Fixer for BuiltinFixer {
    fn describe(&self) -> String {
        format!("builtin fixer v{}", env!("CARGO_PKG_VERSION"))
    }

    fn apply(&self, text: &str, _path: &Path) -> Result<FixOutput> {
        let without_bom = text.strip_prefix(BOM).unwrap_or(text);
        let fixed = TRAILING_WS_RE.replace_all(without_bom, "$1");
        Ok(FixOutput::compare(text, fixed.into_owned()))
    }
}

/// 内置修复器工厂
#[derive(Debug, Default)]
pub struct BuiltinFixerFactory;

impl FixerFactory for BuiltinFixerFactory {
    fn init(&self, _root: &Path) -> Result<Box<dyn Fixer>> {
        Ok(Box::new(BuiltinFixer))
    }
}

// ─────────────────────────────────────────────────────────────
// 格式化器
// ─────────────────────────────────────────────────────────────

/// 内置格式化器
#[derive(Debug)]
pub struct BuiltinFormatter {
    rules: FormatRules,
}

impl BuiltinFormatter {
    pub fn new(rules: FormatRules) -> Self {
        Self { rules }
    }
}

impl Formatter for BuiltinFormatter {
    fn describe(&self) -> String {
        format!("builtin formatter v{}", env!("CARGO_PKG_VERSION"))
    }

    fn supports(&self, path: &Path) -> bool {
        self.rules.supports(path)
    }

    fn resolve_options(&self, path: &Path) -> Result<FormatOptions> {
        self.rules.resolve_options("builtin formatter", path)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.rules.is_ignored(path)
    }

    fn format(&self, text: &str, _path: &Path, options: &FormatOptions) -> Result<String> {
        Ok(format_text(text, options))
    }
}

/// 内置格式化器工厂
#[derive(Debug, Default)]
pub struct BuiltinFormatterFactory {
    setup: FormatterSetup,
}

impl BuiltinFormatterFactory {
    pub fn new(setup: FormatterSetup) -> Self {
        Self { setup }
    }
}

impl FormatterFactory for BuiltinFormatterFactory {
    fn init(&self, root: &Path) -> Result<Box<dyn Formatter>> {
        Ok(Box::new(BuiltinFormatter::new(self.setup.rules(root)?)))
    }
}

/// 格式化文本
pub fn format_text(text: &str, options: &FormatOptions) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0;

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            blank_run += 1;
            // 跳过文件开头的空行
            if lines.is_empty() || blank_run > options.max_blank_lines {
                continue;
            }
            lines.push(String::new());
        } else {
            blank_run = 0;
            lines.push(reindent(line, options));
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// 重新生成行首缩进
fn reindent(line: &str, options: &FormatOptions) -> String {
    let tab_width = options.tab_width.max(1);
    let body = line.trim_start_matches([' ', '\t']);
    let indent = &line[..line.len() - body.len()];

    let mut width = 0;
    for c in indent.chars() {
        if c == '\t' {
            width += tab_width - width % tab_width;
        } else {
            width += 1;
        }
    }

    let prefix = if options.use_tabs {
        format!("{}{}", "\t".repeat(width / tab_width), " ".repeat(width % tab_width))
    } else {
        " ".repeat(width)
    };

    format!("{}{}", prefix, body)
}
