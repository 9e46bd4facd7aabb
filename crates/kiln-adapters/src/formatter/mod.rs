//! Code formatter adapters.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use kiln_core::{
    application::{ApplicationError, ports::CodeFormatter},
    error::KilnResult,
};
use tracing::{debug, instrument};

/// Runs an external formatter with the written files appended to its
/// arguments, e.g. `npx prettier --write <files…>`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
        }
    }

    /// `npx prettier --write`.
    pub fn prettier() -> Self {
        Self::new("npx", ["prettier", "--write"])
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn failed(&self, reason: impl Into<String>) -> ApplicationError {
        ApplicationError::FormatterFailed {
            program: self.program.clone(),
            reason: reason.into(),
        }
    }

    fn resolve(&self) -> Result<PathBuf, ApplicationError> {
        let candidate = Path::new(&self.program);
        if candidate.components().count() > 1 {
            return Ok(candidate.to_path_buf());
        }
        which::which(&self.program).map_err(|_| self.failed("not found on PATH"))
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::prettier()
    }
}

impl CodeFormatter for CommandFormatter {
    #[instrument(skip_all, fields(program = %self.program, files = paths.len()))]
    fn format(&self, paths: &[PathBuf]) -> KilnResult<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let executable = self.resolve()?;
        let mut command = Command::new(&executable);
        command
            .args(&self.args)
            .args(paths)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| self.failed(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                Some(last) => format!("{}: {}", output.status, last.trim()),
                None => output.status.to_string(),
            };
            return Err(self.failed(reason).into());
        }

        debug!("Formatted generated files");
        Ok(())
    }
}

/// Formatter that does nothing; used with `--no-format`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl CodeFormatter for NoopFormatter {
    fn format(&self, _paths: &[PathBuf]) -> KilnResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kiln_core::error::KilnError;

    use super::*;

    #[test]
    fn empty_path_list_runs_nothing() {
        let formatter = CommandFormatter::new("kiln-no-such-formatter", ["--write"]);
        assert!(formatter.format(&[]).is_ok());
    }

    #[test]
    fn missing_program_is_reported() {
        let formatter = CommandFormatter::new("kiln-no-such-formatter", ["--write"]);
        let err = formatter.format(&[PathBuf::from("a.ts")]).unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::FormatterFailed { ref program, .. })
                if program == "kiln-no-such-formatter"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_decides_success() {
        let files = [PathBuf::from("a.ts")];
        assert!(CommandFormatter::new("true", Vec::<String>::new()).format(&files).is_ok());
        assert!(CommandFormatter::new("false", Vec::<String>::new()).format(&files).is_err());
    }

    #[test]
    fn noop_always_succeeds() {
        assert!(NoopFormatter.format(&[PathBuf::from("x")]).is_ok());
    }
}
