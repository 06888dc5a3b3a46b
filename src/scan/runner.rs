//! Two-phase scan orchestration.

use std::sync::Arc;

use tracing::info;

use crate::config::ScanConfig;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::models::{ScanMode, ScanReport};
use crate::report::ReportParser;

use super::NmapScanner;

/// Drives the scan phases for one request and assembles the response.
///
/// Phases run strictly in sequence: the vulnerability probe only starts
/// once discovery output is in hand, and quick mode skips it entirely.
pub struct ScanRunner {
    nmap: NmapScanner,
    parser: ReportParser,
}

impl ScanRunner {
    pub fn new(config: ScanConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            nmap: NmapScanner::new(config, executor),
            parser: ReportParser::new(),
        }
    }

    /// True when the nmap binary is present and responding.
    pub async fn is_available(&self) -> bool {
        self.nmap.ensure_available().await.is_ok()
    }

    /// Run one scan request against a pre-validated target.
    pub async fn run(&self, target: &str, mode: ScanMode) -> Result<ScanReport> {
        self.nmap.ensure_available().await?;

        let discovery = self.nmap.port_scan(target).await?;
        let open_ports = self.parser.parse_ports(&discovery);
        info!("Discovery found {} ports on {}", open_ports.len(), target);

        let cves = match mode {
            ScanMode::Quick => Vec::new(),
            ScanMode::Full => {
                let report = self.nmap.vuln_scan(target).await?;
                let cves = self.parser.extract_cve_ids(&report);
                info!("Vulnerability scan found {} CVE ids on {}", cves.len(), target);
                cves
            }
        };

        Ok(ScanReport {
            target: target.to_string(),
            open_ports,
            cves,
        })
    }
}
