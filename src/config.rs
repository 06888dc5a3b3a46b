//! Service configuration.
//!
//! Everything the scan runner needs is carried in an explicit [`ScanConfig`]
//! handed to it at construction; there is no ambient process-wide state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP API listens on
    pub port: u16,
}

/// Scan runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Path to the nmap binary
    pub nmap: String,

    /// Argument/timing profile for both scan phases
    pub profile: ScanProfile,

    /// Discovery budget override in seconds; profile default when unset
    #[serde(default)]
    pub discovery_timeout_secs: Option<u64>,

    /// Vulnerability budget override in seconds; profile default when unset
    #[serde(default)]
    pub vuln_timeout_secs: Option<u64>,

    /// Budget for the `nmap --version` preflight probe
    pub preflight_timeout_secs: u64,

    /// Per-script ceiling passed to nmap as `--script-timeout`
    pub script_timeout_secs: u64,

    /// Retry the vulnerability phase without version detection when the
    /// primary invocation exits non-zero
    pub retry_vuln_without_version_detection: bool,
}

/// Argument/timing profile for the external scanner.
///
/// Consolidates the two deployment variants seen in production: an
/// unprivileged-safe TCP-connect scan with aggressive timing, and a plain
/// version-detection scan with tighter budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanProfile {
    /// `-sT -sV -T4 -Pn`: connect scan, version detection, aggressive
    /// timing, no host-liveness probe. Works without raw-socket privileges.
    Aggressive,
    /// `-sV` only, with nmap's default timing and host discovery.
    Plain,
}

impl ScanProfile {
    pub fn discovery_args(&self) -> &'static [&'static str] {
        match self {
            ScanProfile::Aggressive => &["-sT", "-sV", "-T4", "-Pn"],
            ScanProfile::Plain => &["-sV"],
        }
    }

    /// Discovery argument set with version detection stripped, used for the
    /// degraded retry after a non-zero exit.
    pub fn discovery_fallback_args(&self) -> &'static [&'static str] {
        match self {
            ScanProfile::Aggressive => &["-sT", "-T4", "-Pn"],
            ScanProfile::Plain => &[],
        }
    }

    pub fn discovery_budget_secs(&self) -> u64 {
        match self {
            ScanProfile::Aggressive => 300,
            ScanProfile::Plain => 180,
        }
    }

    pub fn vuln_budget_secs(&self) -> u64 {
        match self {
            ScanProfile::Aggressive => 600,
            ScanProfile::Plain => 300,
        }
    }
}

impl ScanConfig {
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(
            self.discovery_timeout_secs
                .unwrap_or_else(|| self.profile.discovery_budget_secs()),
        )
    }

    pub fn vuln_timeout(&self) -> Duration {
        Duration::from_secs(
            self.vuln_timeout_secs
                .unwrap_or_else(|| self.profile.vuln_budget_secs()),
        )
    }

    pub fn preflight_timeout(&self) -> Duration {
        Duration::from_secs(self.preflight_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Load config from default locations or create default
    pub fn load_or_default() -> Result<Self> {
        let paths = [
            PathBuf::from("/etc/scanbridge/config.toml"),
            dirs_next::config_dir()
                .map(|p| p.join("scanbridge/config.toml"))
                .unwrap_or_default(),
            PathBuf::from("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            nmap: "nmap".into(),
            profile: ScanProfile::Aggressive,
            discovery_timeout_secs: None,
            vuln_timeout_secs: None,
            preflight_timeout_secs: 5,
            script_timeout_secs: 120,
            retry_vuln_without_version_detection: true,
        }
    }
}
