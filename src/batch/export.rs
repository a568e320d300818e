//! # 批处理报告导出
//!
//! 把每个文件每个阶段的结果导出为 CSV。
//!
//! ## 格式
//! `path,stage,changed,millis,written,failure`，不支持的文件只有一行，阶段为 `-`。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{FixfmtError, Result};
use crate::pipeline::FileOutcome;

use std::io::Write;
use std::path::Path;

const HEADER: [&str; 6] = ["path", "stage", "changed", "millis", "written", "failure"];

/// 导出到文件
pub fn to_csv(outcomes: &[FileOutcome], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path).map_err(|e| FixfmtError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    write_csv(outcomes, file)
}

/// 写入任意输出
pub fn write_csv<W: Write>(outcomes: &[FileOutcome], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for outcome in outcomes {
        let written = outcome.was_written.to_string();
        let failure = outcome
            .failure
            .as_ref()
            .map(|f| f.to_string())
            .unwrap_or_default();

        if outcome.stages.is_empty() {
            let changed = if outcome.supported { "" } else { "unsupported" };
            wtr.write_record([
                outcome.path.as_str(),
                "-",
                changed,
                "0",
                written.as_str(),
                failure.as_str(),
            ])?;
            continue;
        }

        for stage in &outcome.stages {
            wtr.write_record([
                outcome.path.as_str(),
                stage.stage.as_str(),
                stage.changed.as_str(),
                format!("{:.2}", stage.millis()).as_str(),
                written.as_str(),
                failure.as_str(),
            ])?;
        }
    }

    wtr.flush().map_err(|e| FixfmtError::CsvError(e.into()))?;
    Ok(())
}
