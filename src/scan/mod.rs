//! Nmap orchestration
//!
//! - `nmap`: per-phase invocation, argument sets, degraded retry
//! - `runner`: two-phase scan drive and response assembly

mod nmap;
mod runner;

pub use nmap::NmapScanner;
pub use runner::ScanRunner;
