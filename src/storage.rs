//! # 文件存储
//!
//! 流水线读写文件的接口。写回只在内容变化时发生，直接覆盖原路径。
//!
//! ## 依赖关系
//! - 被 `pipeline/file.rs` 使用

use crate::error::{FixfmtError, Result};

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 文件存储
pub trait FileStore: Send + Sync {
    fn read(&self, path: &Path) -> Result<String>;

    fn write(&self, path: &Path, text: &str) -> Result<()>;
}

/// 本地文件系统
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl FileStore for FsStore {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FixfmtError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => FixfmtError::FileReadError {
                path: path.display().to_string(),
                source: e,
            },
        })
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        fs::write(path, text).map_err(|e| FixfmtError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
