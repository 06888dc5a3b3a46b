use thiserror::Error;

/// Classified scan failures surfaced to the HTTP layer.
///
/// The first three variants propagate with their specific detail; anything
/// else that goes wrong during orchestration is folded into `Unexpected`,
/// whose detail is logged server-side and never shown to the client.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("nmap is not installed or not executable: {0}")]
    DependencyMissing(String),

    #[error("{phase} scan timed out after {budget_secs}s")]
    Timeout { phase: String, budget_secs: u64 },

    #[error("nmap scan failed: {0}")]
    ExecutionFailed(String),

    #[error("unexpected scan failure: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
