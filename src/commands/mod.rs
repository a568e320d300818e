//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `capability/`, `config.rs`, `utils/`
//! - 子模块: languages, root, run

pub mod languages;
pub mod root;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(args, &Config::load(cli.config.as_deref())?),
        Commands::Root(args) => root::execute(args),
        Commands::Languages(args) => {
            languages::execute(args, &Config::load(cli.config.as_deref())?)
        }
    }
}
