//! Request-scoped scan value objects.
//!
//! All of these are constructed fresh for one request and discarded with
//! the response; nothing here is cached or persisted.

use serde::{Deserialize, Serialize};

/// Scan depth requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Port/service discovery only
    Quick,
    /// Discovery plus vulnerability probing
    Full,
}

/// One row of the nmap port table, tokens kept exactly as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Port token as printed, e.g. `22/tcp`
    pub port: String,
    pub state: String,
    pub service: String,
    /// Remainder of the row; empty when nmap printed no version column
    pub version: String,
}

/// Assembled response record for one scan request.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub open_ports: Vec<PortRecord>,
    /// Sorted, de-duplicated CVE identifiers; empty in quick mode
    pub cves: Vec<String>,
}
