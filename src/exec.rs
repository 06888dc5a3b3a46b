//! Child-process execution with enforced time budgets.
//!
//! Scan logic never touches `tokio::process` directly; it goes through the
//! [`CommandExecutor`] trait so tests can script success, non-zero exits,
//! timeouts, and missing binaries without spawning anything.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Captured output of one finished child process.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("binary not found: {0}")]
    NotFound(String),

    #[error("process exceeded its {}s budget", .0.as_secs())]
    TimedOut(Duration),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        budget: Duration,
    ) -> Result<ExecOutput, ExecError>;
}

/// Executor backed by real child processes.
pub struct SystemExecutor;

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        budget: Duration,
    ) -> Result<ExecOutput, ExecError> {
        debug!("Executing {} {:?} with {}s budget", program, args, budget.as_secs());

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ExecError::NotFound(program.to_string()),
                _ => ExecError::Io(e),
            })?;

        // On expiry the wait future is dropped and kill_on_drop delivers
        // SIGKILL, so the child never outlives a reported timeout.
        match tokio::time::timeout(budget, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ExecOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                success: output.status.success(),
            }),
            Ok(Err(e)) => Err(ExecError::Io(e)),
            Err(_) => Err(ExecError::TimedOut(budget)),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Pops one scripted response per invocation and records every call.
    pub struct ScriptedExecutor {
        responses: Mutex<VecDeque<Result<ExecOutput, ExecError>>>,
        pub calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedExecutor {
        pub fn new(responses: Vec<Result<ExecOutput, ExecError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CommandExecutor for ScriptedExecutor {
        async fn run(
            &self,
            program: &str,
            args: &[String],
            _budget: Duration,
        ) -> Result<ExecOutput, ExecError> {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().cloned());
            self.calls.lock().unwrap().push(call);

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("ScriptedExecutor ran out of responses")
        }
    }

    pub fn ok(stdout: &str) -> Result<ExecOutput, ExecError> {
        Ok(ExecOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            success: true,
        })
    }

    pub fn nonzero(stdout: &str, stderr: &str) -> Result<ExecOutput, ExecError> {
        Ok(ExecOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            success: false,
        })
    }

    pub fn timed_out(secs: u64) -> Result<ExecOutput, ExecError> {
        Err(ExecError::TimedOut(Duration::from_secs(secs)))
    }

    pub fn not_found(program: &str) -> Result<ExecOutput, ExecError> {
        Err(ExecError::NotFound(program.to_string()))
    }
}
