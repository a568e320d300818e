//! # languages 命令实现
//!
//! 以表格列出扩展名映射表。
//!
//! ## 依赖关系
//! - 使用 `cli/languages.rs` 定义的参数
//! - 使用 `config.rs`、`capability/languages.rs`

use crate::cli::languages::LanguagesArgs;
use crate::config::Config;
use crate::error::Result;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 映射表行
#[derive(Debug, Clone, Tabled)]
struct LanguageRow {
    #[tabled(rename = "Extension")]
    extension: String,
    #[tabled(rename = "Parser")]
    parser: String,
    #[tabled(rename = "Fixable")]
    fixable: String,
}

/// 执行 languages 命令
pub fn execute(args: LanguagesArgs, config: &Config) -> Result<()> {
    let table = config.language_table();

    let rows: Vec<LanguageRow> = table
        .iter()
        .filter(|(_, l)| !args.fixable || l.fixable)
        .map(|(ext, l)| LanguageRow {
            extension: ext.clone(),
            parser: l.parser.clone(),
            fixable: if l.fixable { "yes" } else { "no" }.to_string(),
        })
        .collect();

    output::print_header(&format!("{} registered extensions", rows.len()));
    println!("{}", Table::new(&rows));
    Ok(())
}
