//! # 外部命令后端
//!
//! 把文件内容通过 stdin 交给外部程序，stdout 作为输出。
//! 参数中的 `{path}` 替换为相对根目录的路径，`{parser}` 替换为解析器名称；
//! 命令的工作目录为批次根目录。
//!
//! ## 依赖关系
//! - 实现 `capability/mod.rs` 中的接口
//! - 使用 `config.rs` 中的 `CommandSpec`

use crate::capability::{
    FixOutput, Fixer, FixerFactory, FormatOptions, FormatRules, Formatter, FormatterFactory,
    FormatterSetup,
};
use crate::config::CommandSpec;
use crate::error::{FixfmtError, Result};

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 绑定到工作目录的外部命令
#[derive(Debug, Clone)]
struct BoundCommand {
    spec: CommandSpec,
    workdir: PathBuf,
}

impl BoundCommand {
    fn display_name(&self) -> String {
        self.spec.program.clone()
    }

    fn expand_args(&self, path: &Path, parser: &str) -> Vec<String> {
        let path = path.display().to_string();
        self.spec
            .args
            .iter()
            .map(|a| a.replace("{path}", &path).replace("{parser}", parser))
            .collect()
    }

    /// 执行命令，`input` 写入 stdin，返回 stdout
    fn run(&self, args: &[String], input: Option<&str>) -> Result<String> {
        let mut child = Command::new(&self.spec.program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|_| FixfmtError::CommandNotFound {
                command: self.display_name(),
            })?;

        let stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            // 另起线程写入 stdin，避免输出填满管道时互相等待
            let writer = scope.spawn(move || -> std::io::Result<()> {
                match (input, stdin) {
                    (Some(text), Some(mut stdin)) => match stdin.write_all(text.as_bytes()) {
                        Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                        _ => Ok(()),
                    },
                    _ => Ok(()),
                }
            });

            let output = child.wait_with_output();
            let written = writer.join().unwrap_or(Ok(()));
            written.and(output)
        })
        .map_err(|e| FixfmtError::CommandFailed {
            command: self.display_name(),
            stderr: e.to_string(),
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(FixfmtError::CommandFailed {
                command: format!("{} {}", self.spec.program, args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 修复器
// ─────────────────────────────────────────────────────────────

/// 外部命令修复器
#[derive(Debug)]
pub struct CommandFixer {
    command: BoundCommand,
    version: Option<String>,
}

impl Fixer for CommandFixer {
    fn describe(&self) -> String {
        match &self.version {
            Some(v) => format!("{} {}", self.command.display_name(), v),
            None => self.command.display_name(),
        }
    }

    fn apply(&self, text: &str, path: &Path) -> Result<FixOutput> {
        let args = self.command.expand_args(path, "");
        let output = self.command.run(&args, Some(text))?;
        Ok(FixOutput::compare(text, output))
    }
}

/// 外部命令修复器工厂
///
/// 初始化时执行一次 `version_args`，命令不可用即为致命错误。
#[derive(Debug, Clone)]
pub struct CommandFixerFactory {
    spec: CommandSpec,
}

impl CommandFixerFactory {
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }
}

impl FixerFactory for CommandFixerFactory {
    fn init(&self, root: &Path) -> Result<Box<dyn Fixer>> {
        let command = BoundCommand {
            spec: self.spec.clone(),
            workdir: root.to_path_buf(),
        };

        let version = if self.spec.version_args.is_empty() {
            None
        } else {
            let stdout = command
                .run(&self.spec.version_args, None)
                .map_err(|e| FixfmtError::SetupError {
                    capability: self.spec.program.clone(),
                    reason: e.to_string(),
                })?;
            stdout.lines().next().map(|l| l.trim().to_string())
        };

        Ok(Box::new(CommandFixer { command, version }))
    }
}

// ─────────────────────────────────────────────────────────────
// 格式化器
// ─────────────────────────────────────────────────────────────

/// 外部命令格式化器
#[derive(Debug)]
pub struct CommandFormatter {
    command: BoundCommand,
    rules: FormatRules,
}

impl Formatter for CommandFormatter {
    fn describe(&self) -> String {
        self.command.display_name()
    }

    fn supports(&self, path: &Path) -> bool {
        self.rules.supports(path)
    }

    fn resolve_options(&self, path: &Path) -> Result<FormatOptions> {
        self.rules.resolve_options(&self.command.spec.program, path)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.rules.is_ignored(path)
    }

    fn format(&self, text: &str, path: &Path, options: &FormatOptions) -> Result<String> {
        let args = self.command.expand_args(path, &options.parser);
        self.command.run(&args, Some(text))
    }
}

/// 外部命令格式化器工厂
#[derive(Debug, Clone)]
pub struct CommandFormatterFactory {
    spec: CommandSpec,
    setup: FormatterSetup,
}

impl CommandFormatterFactory {
    pub fn new(spec: CommandSpec, setup: FormatterSetup) -> Self {
        Self { spec, setup }
    }
}

impl FormatterFactory for CommandFormatterFactory {
    fn init(&self, root: &Path) -> Result<Box<dyn Formatter>> {
        Ok(Box::new(CommandFormatter {
            command: BoundCommand {
                spec: self.spec.clone(),
                workdir: root.to_path_buf(),
            },
            rules: self.setup.rules(root)?,
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn spec(program: &str, args: &[&str]) -> CommandSpec {
        CommandSpec {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            version_args: Vec::new(),
        }
    }

    #[test]
    fn test_command_fixer_pipes_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let factory = CommandFixerFactory::new(spec("tr", &["a-z", "A-Z"]));
        let fixer = factory.init(dir.path()).unwrap();

        let result = fixer.apply("abc\n", Path::new("x.ts")).unwrap();
        assert!(result.changed);
        assert_eq!(result.output.as_deref(), Some("ABC\n"));

        let result = fixer.apply("ABC\n", Path::new("x.ts")).unwrap();
        assert!(!result.changed);
        assert!(result.output.is_none());
    }

    #[test]
    fn test_command_fixer_init_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = spec("fixfmt-definitely-missing-binary", &[]);
        s.version_args = vec!["--version".to_string()];
        let err = CommandFixerFactory::new(s).init(dir.path()).err().unwrap();
        assert!(matches!(err, FixfmtError::SetupError { .. }));
    }

    #[test]
    fn test_command_formatter_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let factory =
            CommandFormatterFactory::new(spec("echo", &["{parser}:{path}"]), FormatterSetup::default());
        let formatter = factory.init(dir.path()).unwrap();

        let path = Path::new("src/a.ts");
        let options = formatter.resolve_options(path).unwrap();
        let out = formatter.format("ignored stdin", path, &options).unwrap();
        assert_eq!(out, "typescript:src/a.ts\n");
    }

    #[test]
    fn test_command_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fixer = CommandFixerFactory::new(spec("false", &[])).init(dir.path()).unwrap();
        let err = fixer.apply("x", Path::new("a.ts")).unwrap_err();
        assert!(matches!(err, FixfmtError::CommandFailed { .. }));
    }
}
