//! # run 命令实现
//!
//! 对每个输入模式收集文件，作为独立批次执行 预修复 → 格式化 → 后修复。
//!
//! ## 流程
//! 1. 按配置选择修复器与格式化器后端
//! 2. 每个模式单独展开、单独计时
//! 3. 打印单文件结果行与汇总表，可选导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `batch/`、`capability/`、`pipeline/`
//! - 使用 `utils/output.rs` 打印结果

use crate::batch::{export, BatchReport, BatchRunner, FileCollector};
use crate::capability::builtin::{BuiltinFixerFactory, BuiltinFormatterFactory};
use crate::capability::command::{CommandFixerFactory, CommandFormatterFactory};
use crate::capability::{FixerFactory, FormatterFactory, FormatterSetup};
use crate::cli::run::RunArgs;
use crate::config::{BackendConfig, Config};
use crate::error::{FixfmtError, Result};
use crate::pipeline::timer::measure;
use crate::pipeline::{FailureStep, FileOutcome, FileStatus, StageKind, WriteMode};
use crate::storage::FsStore;
use crate::utils::output;

use std::time::Duration;
use tabled::{Table, Tabled};

/// 汇总表行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(metric: &str, value: impl ToString) -> Self {
        Self {
            metric: metric.to_string(),
            value: value.to_string(),
        }
    }
}

/// 执行 run 命令
pub fn execute(args: RunArgs, config: &Config) -> Result<()> {
    if !args.quiet {
        output::print_header("fixfmt - Fix & Format");
    }

    let jobs = args.jobs.unwrap_or(config.parallel);
    let languages = config.language_table();
    let setup = FormatterSetup {
        languages: languages.clone(),
        settings: config.format.clone(),
        ignore: config.ignore.clone(),
    };

    let fixers = fixer_factory(&config.fixer);
    let formatters = formatter_factory(&config.formatter, setup);
    let store = FsStore;

    let mode = if args.check {
        WriteMode::Check
    } else {
        WriteMode::Write
    };

    let runner = BatchRunner::new(
        fixers.as_ref(),
        formatters.as_ref(),
        &languages,
        &store,
        jobs,
    )
    .mode(mode)
    .quiet(args.quiet);

    let mut all_outcomes: Vec<FileOutcome> = Vec::new();

    for pattern in &args.patterns {
        if !args.quiet {
            output::print_info(&format!("Searching for files using: {}...", pattern));
        }
        let files = FileCollector::new(pattern)
            .include_hidden(args.hidden)
            .collect()?;
        if !args.quiet {
            output::print_info(&format!("Found {} files.", files.len()));
        }

        all_outcomes.extend(run_batch(&runner, &files, args.quiet)?);
    }

    let report = BatchReport::from_outcomes(&all_outcomes);
    print_summary(&report, &all_outcomes, mode);

    if let Some(path) = &args.report {
        export::to_csv(&all_outcomes, path)?;
        if !args.quiet {
            output::print_info(&format!("Report written to {}", path.display()));
        }
    }

    if report.has_failures() {
        return Err(FixfmtError::FilesFailed {
            count: report.failed,
        });
    }
    if mode == WriteMode::Check && report.modified > 0 {
        output::print_warning(&format!("{} file(s) are not formatted", report.modified));
        return Err(FixfmtError::FilesWouldChange {
            count: report.modified,
        });
    }
    Ok(())
}

/// 执行一个模式对应的批次并打印结果
fn run_batch(runner: &BatchRunner<'_>, files: &[String], quiet: bool) -> Result<Vec<FileOutcome>> {
    let timed = measure(|| runner.run(files));
    let elapsed = timed.millis();
    let batch = timed.result?;

    for outcome in &batch.outcomes {
        report_outcome(outcome, quiet);
    }
    if !quiet {
        output::print_done(&format!("Done: {:.0}ms", elapsed));
    }
    Ok(batch.outcomes)
}

fn fixer_factory(backend: &BackendConfig) -> Box<dyn FixerFactory> {
    match backend {
        BackendConfig::Builtin => Box::new(BuiltinFixerFactory),
        BackendConfig::Command(spec) => Box::new(CommandFixerFactory::new(spec.clone())),
    }
}

fn formatter_factory(backend: &BackendConfig, setup: FormatterSetup) -> Box<dyn FormatterFactory> {
    match backend {
        BackendConfig::Builtin => Box::new(BuiltinFormatterFactory::new(setup)),
        BackendConfig::Command(spec) => {
            Box::new(CommandFormatterFactory::new(spec.clone(), setup))
        }
    }
}

/// 打印单文件结果行
fn report_outcome(outcome: &FileOutcome, quiet: bool) {
    if quiet {
        return;
    }
    if let Some(msg) = skip_message(outcome) {
        output::print_skip(&msg);
        return;
    }

    let failed_step = outcome.failure.as_ref().map(|f| f.step);

    let format_symbol = match failed_step {
        Some(FailureStep::Read)
        | Some(FailureStep::Write)
        | Some(FailureStep::Stage(StageKind::Format)) => output::error_symbol(),
        _ => output::change_symbol(outcome.stage(StageKind::Format).map(|s| s.changed)),
    };

    let fix_symbol = match failed_step {
        Some(FailureStep::Read) => output::error_symbol(),
        Some(FailureStep::Stage(kind)) if kind.is_fix() => output::error_symbol(),
        _ => output::change_symbol(Some(outcome.fix_changed().into())),
    };

    let millis = outcome.total_runtime().as_secs_f64() * 1000.0;
    output::print_file_line(format_symbol, fix_symbol, &outcome.path, millis);
}

/// 不支持的文件类型只打印一行跳过信息
fn skip_message(outcome: &FileOutcome) -> Option<String> {
    (outcome.status() == FileStatus::Unsupported)
        .then(|| format!("{} (unsupported file type)", outcome.path))
}

/// 各阶段耗时之和（毫秒）
fn stage_total(outcomes: &[FileOutcome], kind: StageKind) -> f64 {
    let total: Duration = outcomes
        .iter()
        .filter_map(|o| o.stage(kind))
        .map(|s| s.runtime)
        .sum();
    total.as_secs_f64() * 1000.0
}

fn summary_rows(report: &BatchReport, outcomes: &[FileOutcome], mode: WriteMode) -> Vec<SummaryRow> {
    let modified_label = match mode {
        WriteMode::Write => "Written",
        WriteMode::Check => "Would change",
    };

    vec![
        SummaryRow::new("Files", report.total()),
        SummaryRow::new("Processed", report.processed),
        SummaryRow::new(modified_label, report.modified),
        SummaryRow::new("Skipped", report.skipped),
        SummaryRow::new("Failed", report.failed),
        SummaryRow::new(
            "Pre-fix time",
            format!("{:.2}ms", stage_total(outcomes, StageKind::PreFix)),
        ),
        SummaryRow::new(
            "Format time",
            format!("{:.2}ms", stage_total(outcomes, StageKind::Format)),
        ),
        SummaryRow::new(
            "Post-fix time",
            format!("{:.2}ms", stage_total(outcomes, StageKind::PostFix)),
        ),
    ]
}

fn print_summary(report: &BatchReport, outcomes: &[FileOutcome], mode: WriteMode) {
    let rows = summary_rows(report, outcomes, mode);
    println!();
    println!("{}", Table::new(&rows));

    for (path, failure) in &report.failures {
        output::print_error(&format!("{}: {}", path, failure));
    }
}
