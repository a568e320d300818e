//! # root 命令实现
//!
//! 打印一组路径的公共根目录，可选列出改写后的相对路径。
//!
//! ## 依赖关系
//! - 使用 `cli/root.rs` 定义的参数
//! - 使用 `batch/root.rs`

use crate::batch::root;
use crate::cli::root::RootArgs;
use crate::error::Result;

/// 执行 root 命令
pub fn execute(args: RootArgs) -> Result<()> {
    let common = root::common_root(&args.paths);
    println!("{}", common);

    if args.relative {
        for path in &args.paths {
            println!("  {}", root::relative_to(&common, path));
        }
    }

    Ok(())
}
