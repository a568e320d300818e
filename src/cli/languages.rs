//! # languages 子命令 CLI 定义
//!
//! 列出扩展名映射表（包含配置文件中的覆盖项）
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/languages.rs`

use clap::Args;

/// languages 子命令参数
#[derive(Args, Debug)]
pub struct LanguagesArgs {
    /// Only list extensions handled by the fixer
    #[arg(long, default_value_t = false)]
    pub fixable: bool,
}
