//! # 单文件流水线
//!
//! 每个文件按固定顺序经过以下状态：
//!
//! ```text
//! 类型检查 ──不支持──▶ 结束（零个阶段）
//!    │
//!    ▼
//! 读取 ─▶ 预修复（仅可修复类型）─▶ 格式化 ─▶ 后修复（仅当格式化有改动）─▶ 写回（内容有差异时）
//! ```
//!
//! 每个阶段单独计时并记录变更标记。读写或能力调用失败记录在该文件的结果中，
//! 不影响其他文件；缺少已初始化的修复器属于致命错误。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `pipeline/timer.rs`、`pipeline/stage.rs`
//! - 使用 `capability/` 接口和 `storage.rs`

use crate::batch::root;
use crate::capability::{Fixer, Formatter, LanguageTable};
use crate::error::{FixfmtError, Result};
use crate::pipeline::stage::{Change, StageKind, StageResult};
use crate::pipeline::timer::measure;
use crate::storage::FileStore;

use std::fmt;
use std::path::Path;
use std::time::Duration;

/// 写回策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// 内容有差异时覆盖原文件
    #[default]
    Write,
    /// 只报告，不写回
    Check,
}

/// 失败发生的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStep {
    Read,
    Stage(StageKind),
    Write,
}

impl fmt::Display for FailureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStep::Read => f.write_str("read"),
            FailureStep::Stage(kind) => write!(f, "{}", kind),
            FailureStep::Write => f.write_str("write"),
        }
    }
}

/// 单文件失败标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub step: FailureStep,
    pub message: String,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.step, self.message)
    }
}

/// 文件最终状态（用于汇总）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// 格式化器不识别该类型
    Unsupported,
    /// 被忽略列表排除且没有改动
    Ignored,
    Unchanged,
    Written,
    /// 检查模式下内容会改变
    WouldChange,
    Failed,
}

/// 单文件处理结果
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// 相对根目录的路径
    pub path: String,
    pub stages: Vec<StageResult>,
    pub final_content: String,
    /// 最终内容与原始内容不同
    pub changed: bool,
    pub was_written: bool,
    pub supported: bool,
    pub failure: Option<FileFailure>,
}

impl FileOutcome {
    fn unsupported(path: &str) -> Self {
        Self {
            path: path.to_string(),
            stages: Vec::new(),
            final_content: String::new(),
            changed: false,
            was_written: false,
            supported: false,
            failure: None,
        }
    }

    fn failed(path: &str, stages: Vec<StageResult>, content: String, failure: FileFailure) -> Self {
        Self {
            path: path.to_string(),
            stages,
            final_content: content,
            changed: false,
            was_written: false,
            supported: true,
            failure: Some(failure),
        }
    }

    /// 查找某个阶段的结果
    pub fn stage(&self, kind: StageKind) -> Option<&StageResult> {
        self.stages.iter().find(|s| s.stage == kind)
    }

    /// 所有修复阶段中是否有改动
    pub fn fix_changed(&self) -> bool {
        self.stages
            .iter()
            .any(|s| s.stage.is_fix() && s.changed.is_changed())
    }

    /// 各阶段耗时之和
    pub fn total_runtime(&self) -> Duration {
        self.stages.iter().map(|s| s.runtime).sum()
    }

    pub fn status(&self) -> FileStatus {
        if self.failure.is_some() {
            FileStatus::Failed
        } else if !self.supported {
            FileStatus::Unsupported
        } else if self.was_written {
            FileStatus::Written
        } else if self.changed {
            FileStatus::WouldChange
        } else if self
            .stage(StageKind::Format)
            .is_some_and(|s| s.changed == Change::Ignored)
        {
            FileStatus::Ignored
        } else {
            FileStatus::Unchanged
        }
    }
}

/// 单文件流水线
///
/// 修复器与格式化器由调用方在批次开始时创建一次，这里只借用。
pub struct FilePipeline<'a> {
    root: &'a str,
    fixer: Option<&'a dyn Fixer>,
    formatter: &'a dyn Formatter,
    /// 哪些文件类型交给修复器
    languages: &'a LanguageTable,
    store: &'a dyn FileStore,
    mode: WriteMode,
}

impl<'a> FilePipeline<'a> {
    pub fn new(
        root: &'a str,
        fixer: Option<&'a dyn Fixer>,
        formatter: &'a dyn Formatter,
        languages: &'a LanguageTable,
        store: &'a dyn FileStore,
        mode: WriteMode,
    ) -> Self {
        Self {
            root,
            fixer,
            formatter,
            languages,
            store,
            mode,
        }
    }

    /// 处理单个文件
    ///
    /// 只有致命错误（修复器未初始化）以 `Err` 返回，其余失败记录在结果中。
    pub fn process_file(&self, path: &str) -> Result<FileOutcome> {
        let rel = Path::new(path);

        if !self.formatter.supports(rel) {
            return Ok(FileOutcome::unsupported(path));
        }

        let fixer = if self.languages.is_fixable(rel) {
            Some(self.fixer.ok_or_else(|| {
                FixfmtError::PreconditionError(format!(
                    "fixer not initialized before processing {}",
                    path
                ))
            })?)
        } else {
            None
        };

        let full_path = root::join(self.root, path);
        let original = match self.store.read(&full_path) {
            Ok(content) => content,
            Err(e) => {
                let failure = FileFailure {
                    step: FailureStep::Read,
                    message: e.to_string(),
                };
                return Ok(FileOutcome::failed(path, Vec::new(), String::new(), failure));
            }
        };

        let mut stages = Vec::with_capacity(3);
        let mut content = original.clone();

        // 预修复
        if let Some(fixer) = fixer {
            match self.fix_stage(StageKind::PreFix, fixer, &content, rel) {
                Ok(stage) => {
                    content = stage.output.clone();
                    stages.push(stage);
                }
                Err(failure) => return Ok(FileOutcome::failed(path, stages, content, failure)),
            }
        }

        // 格式化
        let format_changed = match self.format_stage(&content, rel) {
            Ok(stage) => {
                let changed = stage.changed.is_changed();
                content = stage.output.clone();
                stages.push(stage);
                changed
            }
            Err(failure) => return Ok(FileOutcome::failed(path, stages, content, failure)),
        };

        // 后修复：仅当格式化改动了内容
        if let Some(fixer) = fixer {
            if format_changed {
                match self.fix_stage(StageKind::PostFix, fixer, &content, rel) {
                    Ok(stage) => {
                        content = stage.output.clone();
                        stages.push(stage);
                    }
                    Err(failure) => {
                        return Ok(FileOutcome::failed(path, stages, content, failure))
                    }
                }
            }
        }

        let changed = content != original;
        let mut was_written = false;
        if changed && self.mode == WriteMode::Write {
            if let Err(e) = self.store.write(&full_path, &content) {
                let failure = FileFailure {
                    step: FailureStep::Write,
                    message: e.to_string(),
                };
                return Ok(FileOutcome::failed(path, stages, content, failure));
            }
            was_written = true;
        }

        Ok(FileOutcome {
            path: path.to_string(),
            stages,
            final_content: content,
            changed,
            was_written,
            supported: true,
            failure: None,
        })
    }

    fn fix_stage(
        &self,
        kind: StageKind,
        fixer: &dyn Fixer,
        content: &str,
        path: &Path,
    ) -> std::result::Result<StageResult, FileFailure> {
        let timed = measure(|| fixer.apply(content, path));
        let fix = timed.result.map_err(|e| FileFailure {
            step: FailureStep::Stage(kind),
            message: e.to_string(),
        })?;

        let (output, changed) = match fix.output {
            Some(output) if fix.changed && output != content => (output, Change::Changed),
            _ => (content.to_string(), Change::Unchanged),
        };

        Ok(StageResult {
            stage: kind,
            output,
            runtime: timed.runtime,
            changed,
        })
    }

    fn format_stage(
        &self,
        content: &str,
        path: &Path,
    ) -> std::result::Result<StageResult, FileFailure> {
        let timed = measure(|| -> Result<Option<String>> {
            if self.formatter.is_ignored(path) {
                return Ok(None);
            }
            let options = self.formatter.resolve_options(path)?;
            self.formatter.format(content, path, &options).map(Some)
        });

        let formatted = timed.result.map_err(|e| FileFailure {
            step: FailureStep::Stage(StageKind::Format),
            message: e.to_string(),
        })?;

        let (output, changed) = match formatted {
            None => (content.to_string(), Change::Ignored),
            Some(output) if output != content => (output, Change::Changed),
            Some(_) => (content.to_string(), Change::Unchanged),
        };

        Ok(StageResult {
            stage: StageKind::Format,
            output,
            runtime: timed.runtime,
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::builtin::{BuiltinFixer, BuiltinFormatter};
    use crate::capability::{FixOutput, FormatOptions, FormatterSetup};
    use crate::storage::memory::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 统计调用次数的修复器
    #[derive(Default)]
    struct CountingFixer {
        calls: AtomicUsize,
    }

    impl Fixer for CountingFixer {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn apply(&self, text: &str, path: &Path) -> Result<FixOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            BuiltinFixer.apply(text, path)
        }
    }

    /// 用函数改写内容的格式化器
    struct FnFormatter {
        inner: BuiltinFormatter,
        rewrite: fn(&str) -> Result<String>,
    }

    impl FnFormatter {
        fn new(rewrite: fn(&str) -> Result<String>) -> Self {
            Self {
                inner: builtin_formatter(&[]),
                rewrite,
            }
        }
    }

    impl Formatter for FnFormatter {
        fn describe(&self) -> String {
            "fn".to_string()
        }

        fn supports(&self, path: &Path) -> bool {
            self.inner.supports(path)
        }

        fn resolve_options(&self, path: &Path) -> Result<FormatOptions> {
            self.inner.resolve_options(path)
        }

        fn is_ignored(&self, path: &Path) -> bool {
            self.inner.is_ignored(path)
        }

        fn format(&self, text: &str, _path: &Path, _options: &FormatOptions) -> Result<String> {
            (self.rewrite)(text)
        }
    }

    fn builtin_formatter(ignore: &[&str]) -> BuiltinFormatter {
        let setup = FormatterSetup {
            ignore: ignore.iter().map(|s| s.to_string()).collect(),
            ..FormatterSetup::default()
        };
        let dir = tempfile::tempdir().unwrap();
        BuiltinFormatter::new(setup.rules(dir.path()).unwrap())
    }

    fn stage_flags(outcome: &FileOutcome) -> Vec<(StageKind, Change)> {
        outcome.stages.iter().map(|s| (s.stage, s.changed)).collect()
    }

    #[test]
    fn test_unsupported_short_circuit() {
        let store = MemoryStore::default();
        let fixer = CountingFixer::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("c.bin").unwrap();
        assert!(outcome.stages.is_empty());
        assert!(!outcome.was_written);
        assert_eq!(outcome.status(), FileStatus::Unsupported);
        assert_eq!(fixer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fix_and_format_written() {
        let store = MemoryStore::with_files(&[("a.ts", "let a = 1;   \n\n\n\nlet b;")]);
        let fixer = CountingFixer::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("a.ts").unwrap();
        assert_eq!(
            stage_flags(&outcome),
            vec![
                (StageKind::PreFix, Change::Changed),
                (StageKind::Format, Change::Changed),
                (StageKind::PostFix, Change::Unchanged),
            ]
        );
        assert!(outcome.was_written);
        assert!(outcome.fix_changed());
        assert_eq!(outcome.status(), FileStatus::Written);
        assert_eq!(outcome.final_content, "let a = 1;\n\nlet b;\n");
        assert_eq!(store.get("a.ts").unwrap(), outcome.final_content);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_second_run_is_noop() {
        let store = MemoryStore::with_files(&[("src/a.ts", "\tif (x) {  \n\t\ty();\n\n\n}")]);
        let fixer = CountingFixer::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let first = pipeline.process_file("src/a.ts").unwrap();
        assert!(first.was_written);

        let second = pipeline.process_file("src/a.ts").unwrap();
        assert!(second
            .stages
            .iter()
            .all(|s| s.changed == Change::Unchanged));
        assert!(second.stage(StageKind::PostFix).is_none());
        assert!(!second.was_written);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_format_only_file_unchanged() {
        let store = MemoryStore::with_files(&[("b.md", "# Title\n\nBody text  \n")]);
        let fixer = CountingFixer::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("b.md").unwrap();
        assert_eq!(stage_flags(&outcome), vec![(StageKind::Format, Change::Unchanged)]);
        assert!(!outcome.was_written);
        assert_eq!(store.writes(), 0);
        assert_eq!(fixer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_write_when_nothing_changed() {
        let store = MemoryStore::with_files(&[("a.ts", "const ok = true;\n")]);
        let fixer = CountingFixer::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("a.ts").unwrap();
        assert_eq!(
            stage_flags(&outcome),
            vec![
                (StageKind::PreFix, Change::Unchanged),
                (StageKind::Format, Change::Unchanged),
            ]
        );
        assert_eq!(outcome.status(), FileStatus::Unchanged);
        assert_eq!(store.writes(), 0);
        assert_eq!(fixer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_post_fix_skipped_when_format_unchanged() {
        let store = MemoryStore::with_files(&[("a.js", "x();  \n")]);
        let fixer = CountingFixer::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("a.js").unwrap();
        assert_eq!(
            stage_flags(&outcome),
            vec![
                (StageKind::PreFix, Change::Changed),
                (StageKind::Format, Change::Unchanged),
            ]
        );
        assert!(outcome.was_written);
        assert_eq!(fixer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_post_fix_reverts_formatter_style() {
        let store = MemoryStore::with_files(&[("a.ts", "f() {\n}\n")]);
        let fixer = CountingFixer::default();
        let formatter = FnFormatter::new(|t| Ok(t.replace('{', "{  ")));
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("a.ts").unwrap();
        assert_eq!(
            stage_flags(&outcome),
            vec![
                (StageKind::PreFix, Change::Unchanged),
                (StageKind::Format, Change::Changed),
                (StageKind::PostFix, Change::Changed),
            ]
        );
        // 净变化为零，不写回
        assert!(!outcome.was_written);
        assert_eq!(store.writes(), 0);
        assert_eq!(fixer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ignored_file() {
        let store = MemoryStore::with_files(&[("vendor/lib.md", "\n\n# messy\n\n\n")]);
        let formatter = builtin_formatter(&["vendor/**"]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", None, &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("vendor/lib.md").unwrap();
        assert_eq!(stage_flags(&outcome), vec![(StageKind::Format, Change::Ignored)]);
        assert_eq!(outcome.status(), FileStatus::Ignored);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_read_failure_recorded() {
        let store = MemoryStore::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new("proj", None, &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("missing.md").unwrap();
        assert_eq!(outcome.status(), FileStatus::Failed);
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.step, FailureStep::Read);
        assert!(failure.message.contains("proj/missing.md"));
    }

    #[test]
    fn test_formatter_failure_keeps_earlier_stages() {
        let store = MemoryStore::with_files(&[("a.ts", "x;  \n")]);
        let fixer = CountingFixer::default();
        let formatter = FnFormatter::new(|_| {
            Err(FixfmtError::CapabilityError {
                capability: "fn".to_string(),
                path: "a.ts".to_string(),
                reason: "syntax error".to_string(),
            })
        });
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Write);

        let outcome = pipeline.process_file("a.ts").unwrap();
        assert_eq!(outcome.status(), FileStatus::Failed);
        assert_eq!(stage_flags(&outcome), vec![(StageKind::PreFix, Change::Changed)]);
        assert_eq!(
            outcome.failure.unwrap().step,
            FailureStep::Stage(StageKind::Format)
        );
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_missing_fixer_is_precondition_error() {
        let store = MemoryStore::with_files(&[("a.ts", "x;\n"), ("b.md", "b\n")]);
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", None, &formatter, &languages, &store, WriteMode::Write);

        let err = pipeline.process_file("a.ts").unwrap_err();
        assert!(matches!(err, FixfmtError::PreconditionError(_)));
        assert!(pipeline.process_file("b.md").is_ok());
    }

    #[test]
    fn test_check_mode_does_not_write() {
        let store = MemoryStore::with_files(&[("a.ts", "x;  \n")]);
        let fixer = CountingFixer::default();
        let formatter = builtin_formatter(&[]);
        let languages = LanguageTable::default();
        let pipeline =
            FilePipeline::new(".", Some(&fixer), &formatter, &languages, &store, WriteMode::Check);

        let outcome = pipeline.process_file("a.ts").unwrap();
        assert!(outcome.changed);
        assert!(!outcome.was_written);
        assert_eq!(outcome.status(), FileStatus::WouldChange);
        assert_eq!(store.get("a.ts").unwrap(), "x;  \n");
    }
}
