//! # 批量执行器
//!
//! 组合公共根目录解析、有界调度与单文件流水线，完成一次批处理。
//!
//! ## 流程
//! 1. 解析公共根目录，把所有路径改写为相对根目录
//! 2. 初始化修复器与格式化器（每批次一次）
//! 3. 为每个文件构建任务，交给调度器执行
//! 4. 汇总结果：处理、写回、跳过、失败
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `batch/root.rs`、`batch/scheduler.rs`、`pipeline/`
//! - 使用 `utils/progress.rs` 创建进度条

use crate::batch::root;
use crate::batch::scheduler::{Scheduler, Task};
use crate::capability::{FixerFactory, FormatterFactory, LanguageTable};
use crate::error::Result;
use crate::pipeline::{FileFailure, FileOutcome, FilePipeline, FileStatus, WriteMode};
use crate::storage::FileStore;
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use std::path::Path;

/// 一次批处理的输出
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// 公共根目录（空列表时为空字符串）
    pub root: String,
    /// 按输入顺序排列的结果
    pub outcomes: Vec<FileOutcome>,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 正常经过流水线的文件数
    pub processed: usize,
    /// 写回（或检查模式下会改变）的文件数
    pub modified: usize,
    /// 跳过数量（不支持的类型或被忽略）
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, FileFailure)>,
}

impl BatchReport {
    /// 合并单个文件结果
    pub fn merge(&mut self, outcome: &FileOutcome) {
        match outcome.status() {
            FileStatus::Unsupported | FileStatus::Ignored => self.skipped += 1,
            FileStatus::Unchanged => self.processed += 1,
            FileStatus::Written | FileStatus::WouldChange => {
                self.processed += 1;
                self.modified += 1;
            }
            FileStatus::Failed => {
                self.failed += 1;
                if let Some(failure) = &outcome.failure {
                    self.failures.push((outcome.path.clone(), failure.clone()));
                }
            }
        }
    }

    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            report.merge(outcome);
        }
        report
    }

    /// 总文件数
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// 批量执行器
pub struct BatchRunner<'a> {
    fixer_factory: &'a dyn FixerFactory,
    formatter_factory: &'a dyn FormatterFactory,
    languages: &'a LanguageTable,
    store: &'a dyn FileStore,
    /// 并行作业数
    jobs: usize,
    mode: WriteMode,
    quiet: bool,
}

impl<'a> BatchRunner<'a> {
    /// 创建新的批量执行器，`jobs == 0` 时使用 CPU 核数
    pub fn new(
        fixer_factory: &'a dyn FixerFactory,
        formatter_factory: &'a dyn FormatterFactory,
        languages: &'a LanguageTable,
        store: &'a dyn FileStore,
        jobs: usize,
    ) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            fixer_factory,
            formatter_factory,
            languages,
            store,
            jobs,
            mode: WriteMode::Write,
            quiet: false,
        }
    }

    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// 关闭进度条与提示信息
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// 处理文件列表
    ///
    /// 单文件失败记录在对应结果中；初始化失败和前置条件错误以 `Err` 返回。
    pub fn run<S: AsRef<str>>(&self, paths: &[S]) -> Result<BatchOutput> {
        if paths.is_empty() {
            return Ok(BatchOutput::default());
        }

        // 先规范化，使根目录的段与每个路径的段一致
        let normalized: Vec<String> = paths.iter().map(|p| root::normalize(p.as_ref())).collect();
        let root = root::common_root(&normalized);
        self.info(&format!("Detected root folder: {}", root));

        let relative: Vec<String> = normalized
            .iter()
            .map(|p| root::relative_to(&root, p))
            .collect();

        let root_dir = if root.is_empty() { "." } else { root.as_str() };
        let fixer = self.fixer_factory.init(Path::new(root_dir))?;
        self.info(&format!("Initialized {}", fixer.describe()));
        let formatter = self.formatter_factory.init(Path::new(root_dir))?;
        self.info(&format!("Initialized {}", formatter.describe()));

        let pipeline = FilePipeline::new(
            &root,
            Some(fixer.as_ref()),
            formatter.as_ref(),
            self.languages,
            self.store,
            self.mode,
        );

        let scheduler = Scheduler::new(self.jobs)?;
        self.info(&format!(
            "Processing {} files ({} in parallel)...",
            relative.len(),
            scheduler.max_parallel()
        ));

        let pb = if self.quiet {
            ProgressBar::hidden()
        } else {
            progress::create_progress_bar(relative.len() as u64, "Processing")
        };

        let tasks: Vec<Task<'_, Result<FileOutcome>>> = relative
            .iter()
            .map(|path| {
                let pipeline = &pipeline;
                let pb = pb.clone();
                Box::new(move || {
                    let result = pipeline.process_file(path);
                    pb.inc(1);
                    result
                }) as Task<'_, Result<FileOutcome>>
            })
            .collect();

        let settled = scheduler.run(tasks);
        pb.finish_and_clear();

        // 所有任务结束后再报告致命错误
        let outcomes = settled?.into_iter().collect::<Result<Vec<_>>>()?;

        Ok(BatchOutput { root, outcomes })
    }

    fn info(&self, msg: &str) {
        if !self.quiet {
            output::print_info(msg);
        }
    }
}
