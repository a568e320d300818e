//! # 扩展名映射表
//!
//! 显式的 扩展名 → 语言描述 映射，决定文件能否被格式化以及能否被自动修复。
//! 作为配置注入到各后端，而不是在运行时按第三方命名约定查找。
//!
//! ## 依赖关系
//! - 被 `capability/builtin.rs`、`capability/command.rs`、`pipeline/file.rs` 使用
//! - 覆盖项来自 `config.rs`

use crate::capability::FormatOptions;
use crate::config::{FormatSettings, LanguageOverride};

use std::collections::BTreeMap;
use std::path::Path;

/// 单个语言描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// 格式化器使用的解析器名称
    pub parser: String,
    /// 是否交给自动修复器处理
    pub fixable: bool,
}

/// 扩展名映射表（键为带点的小写扩展名，如 `.ts`）
#[derive(Debug, Clone)]
pub struct LanguageTable {
    entries: BTreeMap<String, Language>,
}

/// 默认映射: (扩展名, 解析器, 可修复)
const DEFAULT_LANGUAGES: &[(&str, &str, bool)] = &[
    (".json", "json", false),
    (".css", "css", false),
    (".tsx", "typescript", true),
    (".ts", "typescript", true),
    (".cts", "typescript", true),
    (".mts", "typescript", true),
    (".jsx", "babel", true),
    (".js", "babel", true),
    (".cjs", "babel", true),
    (".mjs", "babel", true),
    (".md", "markdown", false),
    (".mdx", "mdx", false),
    (".html", "html", false),
    (".htm", "html", false),
    (".yaml", "yaml", false),
    (".yml", "yaml", false),
];

impl Default for LanguageTable {
    fn default() -> Self {
        let entries = DEFAULT_LANGUAGES
            .iter()
            .map(|(ext, parser, fixable)| {
                (
                    ext.to_string(),
                    Language {
                        parser: parser.to_string(),
                        fixable: *fixable,
                    },
                )
            })
            .collect();
        Self { entries }
    }
}

impl LanguageTable {
    /// 添加或替换一项
    fn insert(&mut self, ext: &str, language: Language) {
        self.entries.insert(normalize_ext(ext), language);
    }

    /// 应用配置中的覆盖项
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, LanguageOverride>) -> Self {
        for (ext, o) in overrides {
            if o.parser.is_empty() {
                self.entries.remove(&normalize_ext(ext));
            } else {
                self.insert(
                    ext,
                    Language {
                        parser: o.parser.clone(),
                        fixable: o.fixable,
                    },
                );
            }
        }
        self
    }

    /// 查找文件对应的语言
    pub fn lookup(&self, path: &Path) -> Option<&Language> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        self.entries.get(&format!(".{}", ext.to_lowercase()))
    }

    pub fn supports(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    pub fn is_fixable(&self, path: &Path) -> bool {
        self.lookup(path).map(|l| l.fixable).unwrap_or(false)
    }

    /// 生成该文件的格式化选项
    pub fn options_for(&self, path: &Path, settings: &FormatSettings) -> Option<FormatOptions> {
        self.lookup(path).map(|language| FormatOptions {
            parser: language.parser.clone(),
            tab_width: settings.tab_width,
            use_tabs: settings.use_tabs,
            max_blank_lines: settings.max_blank_lines,
        })
    }

    /// 按扩展名遍历
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Language)> {
        self.entries.iter()
    }
}

fn normalize_ext(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = LanguageTable::default();
        assert_eq!(table.lookup(Path::new("src/a.ts")).unwrap().parser, "typescript");
        assert!(table.is_fixable(Path::new("a.mjs")));
        assert!(!table.is_fixable(Path::new("README.md")));
        assert!(table.supports(Path::new("config.YML")));
        assert!(!table.supports(Path::new("image.bin")));
        assert!(!table.supports(Path::new("Makefile")));
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "toml".to_string(),
            LanguageOverride {
                parser: "toml".to_string(),
                fixable: false,
            },
        );
        overrides.insert(
            ".html".to_string(),
            LanguageOverride {
                parser: String::new(),
                fixable: false,
            },
        );
        overrides.insert(
            ".json".to_string(),
            LanguageOverride {
                parser: "json5".to_string(),
                fixable: true,
            },
        );

        let table = LanguageTable::default().with_overrides(&overrides);
        assert!(table.supports(Path::new("Cargo.toml")));
        assert!(!table.supports(Path::new("index.html")));
        assert!(table.supports(Path::new("index.htm")));
        assert_eq!(table.lookup(Path::new("a.json")).unwrap().parser, "json5");
        assert!(table.is_fixable(Path::new("a.json")));
    }
}
