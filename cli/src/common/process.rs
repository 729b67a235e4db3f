//! # Ploy Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Ploy is mostly a sequence of external commands (`docker`, `sudo`,
//! `systemctl`, `apt-get`). This module provides the single seam through
//! which all of them run: the `CommandRunner` trait.
//!
//! Handlers and the provisioning workflow receive a `&dyn CommandRunner`
//! instead of calling `std::process::Command` directly, so tests can swap
//! in a scripted runner without touching process-wide state.
//!
//! ## Architecture
//!
//! - **`CommandRunner::output`**: Runs a command and captures stdout/stderr.
//!   A non-zero exit is *not* an error here; callers inspect `CommandOutput`.
//! - **`CommandRunner::stream`**: Runs a command with inherited stdio (the
//!   user sees the output live) and turns a non-zero exit into
//!   `PloyError::ExternalCommand`.
//! - **`SystemRunner`**: The real implementation on top of `std::process::Command`.
//!
//! Every invocation blocks until the child exits.
//!
use crate::core::error::{PloyError, Result};
use anyhow::{anyhow, Context};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Human-readable exit status (`exit status: 1`, `signal: 9`, ...).
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout.
    #[cfg(test)]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            status: "exit status: 0".to_string(),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given stderr.
    #[cfg(test)]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            status: "exit status: 1".to_string(),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Converts a failed output into `PloyError::ExternalCommand`.
    pub fn into_result(self, program: &str, args: &[&str]) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(anyhow!(PloyError::ExternalCommand {
                cmd: command_line(program, args),
                status: self.status,
                output: if self.stderr.trim().is_empty() {
                    self.stdout
                } else {
                    self.stderr
                },
            }))
        }
    }
}

/// Executes external programs on behalf of the CLI.
pub trait CommandRunner {
    /// Runs `program args...`, capturing output. Fails only if the process could not be spawned.
    fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Runs `program args...` with inherited stdio. Fails on spawn error or non-zero exit.
    fn stream(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!("Running (captured): {}", command_line(program, args));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute '{}'", program))?;
        let captured = CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "'{}' finished: status={}, stdout='{}', stderr='{}'",
            program,
            captured.status,
            captured.stdout.trim(),
            captured.stderr.trim()
        );
        Ok(captured)
    }

    fn stream(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!("Running (streamed): {}", command_line(program, args));
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to execute '{}'", program))?;
        if !status.success() {
            return Err(anyhow!(PloyError::ExternalCommand {
                cmd: command_line(program, args),
                status: status.to_string(),
                output: "(streamed to terminal)".to_string(),
            }));
        }
        Ok(())
    }
}

/// Joins a program and its arguments for logs and error messages.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub mod testing {
    //! Scripted `CommandRunner` for unit tests.
    use super::*;
    use std::sync::Mutex;

    /// Records every invocation and answers from a list of prefix-matched rules.
    ///
    /// Rules are checked in order against the full command line; the first rule
    /// whose prefix matches wins. Unmatched commands succeed with empty output.
    #[derive(Default)]
    pub struct ScriptedRunner {
        rules: Mutex<Vec<(String, CommandOutput)>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answers commands starting with `prefix` with `output`.
        pub fn on(self, prefix: &str, output: CommandOutput) -> Self {
            self.rules
                .lock()
                .unwrap()
                .push((prefix.to_string(), output));
            self
        }

        /// Every command line run so far, captured and streamed alike.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// Number of recorded command lines starting with `prefix`.
        pub fn count(&self, prefix: &str) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        fn answer(&self, program: &str, args: &[&str]) -> CommandOutput {
            let line = command_line(program, args);
            self.calls.lock().unwrap().push(line.clone());
            self.rules
                .lock()
                .unwrap()
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix.as_str()))
                .map(|(_, out)| out.clone())
                .unwrap_or_else(|| CommandOutput::ok(""))
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
            Ok(self.answer(program, args))
        }

        fn stream(&self, program: &str, args: &[&str]) -> Result<()> {
            self.answer(program, args)
                .into_result(program, args)
                .map(|_| ())
        }
    }
}
