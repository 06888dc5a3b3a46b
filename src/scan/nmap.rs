//! Nmap invocation with per-phase argument sets and time budgets.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::exec::{CommandExecutor, ExecError, ExecOutput};

pub struct NmapScanner {
    config: ScanConfig,
    executor: Arc<dyn CommandExecutor>,
}

impl NmapScanner {
    pub fn new(config: ScanConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { config, executor }
    }

    /// Verify the nmap binary responds before committing to a real scan.
    pub async fn ensure_available(&self) -> Result<()> {
        let args = vec!["--version".to_string()];
        match self
            .executor
            .run(&self.config.nmap, &args, self.config.preflight_timeout())
            .await
        {
            Ok(out) if out.success => Ok(()),
            Ok(_) => Err(ScanError::DependencyMissing(format!(
                "{} --version exited with a failure status",
                self.config.nmap
            ))),
            Err(ExecError::NotFound(bin)) => Err(ScanError::DependencyMissing(bin)),
            Err(ExecError::TimedOut(_)) => Err(ScanError::DependencyMissing(format!(
                "{} --version did not respond",
                self.config.nmap
            ))),
            Err(ExecError::Io(e)) => Err(ScanError::Unexpected(format!(
                "failed to probe {}: {}",
                self.config.nmap, e
            ))),
        }
    }

    /// Port/service discovery scan.
    ///
    /// A non-zero exit triggers one retry with version detection stripped;
    /// a timeout is fatal to the phase and never retried.
    pub async fn port_scan(&self, target: &str) -> Result<String> {
        info!("Running discovery scan on {}", target);
        let budget = self.config.discovery_timeout();

        let out = self
            .invoke("discovery", &self.discovery_args(true, target), budget)
            .await?;
        if out.success {
            return Ok(out.stdout);
        }

        warn!(
            "Discovery scan on {} exited non-zero, retrying without version detection: {}",
            target,
            out.stderr.trim()
        );
        let out = self
            .invoke("discovery", &self.discovery_args(false, target), budget)
            .await?;
        if out.success {
            info!("Discovery fallback scan on {} completed", target);
            return Ok(out.stdout);
        }

        Err(ScanError::ExecutionFailed(out.stderr))
    }

    /// Vulnerability script scan.
    ///
    /// A non-zero exit is tolerated: scripts fail individually and the rest
    /// of the report is still worth parsing. When configured, the phase is
    /// re-run once without version detection first.
    pub async fn vuln_scan(&self, target: &str) -> Result<String> {
        info!("Running vulnerability scan on {}", target);
        let budget = self.config.vuln_timeout();

        let out = self
            .invoke("vulnerability", &self.vuln_args(true, target), budget)
            .await?;
        if out.success {
            return Ok(out.stdout);
        }

        warn!(
            "Vulnerability scan on {} exited non-zero: {}",
            target,
            out.stderr.trim()
        );
        if !self.config.retry_vuln_without_version_detection {
            return Ok(out.stdout);
        }

        info!("Retrying vulnerability scan on {} without version detection", target);
        let retry = self
            .invoke("vulnerability", &self.vuln_args(false, target), budget)
            .await?;
        if !retry.success {
            warn!(
                "Vulnerability retry on {} exited non-zero, parsing partial output: {}",
                target,
                retry.stderr.trim()
            );
        }
        Ok(retry.stdout)
    }

    async fn invoke(&self, phase: &str, args: &[String], budget: Duration) -> Result<ExecOutput> {
        match self.executor.run(&self.config.nmap, args, budget).await {
            Ok(out) => Ok(out),
            Err(ExecError::NotFound(bin)) => Err(ScanError::DependencyMissing(bin)),
            Err(ExecError::TimedOut(d)) => Err(ScanError::Timeout {
                phase: phase.to_string(),
                budget_secs: d.as_secs(),
            }),
            Err(ExecError::Io(e)) => Err(ScanError::Unexpected(format!(
                "{} scan failed to execute: {}",
                phase, e
            ))),
        }
    }

    fn discovery_args(&self, version_detection: bool, target: &str) -> Vec<String> {
        let profile_args = if version_detection {
            self.config.profile.discovery_args()
        } else {
            self.config.profile.discovery_fallback_args()
        };

        let mut args: Vec<String> = profile_args.iter().map(|s| s.to_string()).collect();
        args.push(target.to_string());
        args
    }

    fn vuln_args(&self, version_detection: bool, target: &str) -> Vec<String> {
        let profile_args = if version_detection {
            self.config.profile.discovery_args()
        } else {
            self.config.profile.discovery_fallback_args()
        };

        let mut args: Vec<String> = profile_args.iter().map(|s| s.to_string()).collect();
        args.extend([
            "--script".to_string(),
            "vuln".to_string(),
            "--script-timeout".to_string(),
            format!("{}s", self.config.script_timeout_secs),
        ]);
        args.push(target.to_string());
        args
    }
}
