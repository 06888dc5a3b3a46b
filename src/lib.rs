//! scanbridge: nmap port and vulnerability scans over HTTP.
//!
//! A request flows: target validation, discovery scan, port-table parsing,
//! then in full mode a vulnerability-script scan and CVE-id extraction.
//! The external tool is driven through an injectable executor so the whole
//! pipeline is testable without spawning processes.

pub mod config;
pub mod error;
pub mod exec;
pub mod models;
pub mod report;
pub mod scan;
pub mod server;

pub use config::Config;
pub use error::{Result, ScanError};
