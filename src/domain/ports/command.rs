use std::time::Duration;

use thiserror::Error;

use crate::domain::value_objects::OutputEncoding;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("command not found: {0}")]
    NotFound(String),
    #[error("failed to run {program}: {reason}")]
    SpawnFailed { program: String, reason: String },
    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },
    #[error("{program} produced output that is not valid {encoding}")]
    Decode {
        program: String,
        encoding: OutputEncoding,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// A subprocess invocation: program, arguments, optional stdin and a hard timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub timeout: Duration,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Decoded result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Turns a non-zero exit into `CommandError::Failed`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Failed` if the command did not exit with 0.
    pub fn require_success(self, spec: &CommandSpec) -> Result<Self, CommandError> {
        if self.success() {
            return Ok(self);
        }
        let status = self
            .code
            .map_or_else(|| "signal".to_string(), |c| format!("code {c}"));
        Err(CommandError::Failed {
            program: spec.program.clone(),
            status,
            stderr: self.stderr.trim().chars().take(200).collect(),
        })
    }
}

/// Runs external diagnostic commands.
pub trait CommandRunner: Send + Sync {
    /// Runs `spec` to completion or until its timeout expires.
    ///
    /// A non-zero exit is not an error at this level; callers decide.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the program is missing, cannot be spawned,
    /// exceeds its timeout, or emits output invalid for the declared encoding.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}
