//! Parsing of nmap's human-readable console report.
//!
//! Pure text transforms over one invocation's stdout: no I/O, no process
//! state, re-parsing the same report always yields the same result.

use regex::Regex;

use crate::models::PortRecord;

/// Extracts structured data from a scan report.
pub struct ReportParser {
    cve: Regex,
}

impl ReportParser {
    pub fn new() -> Self {
        Self {
            cve: Regex::new(r"CVE-\d{4}-\d+").unwrap(),
        }
    }

    /// Extract the port table.
    ///
    /// The table body is every line after a header starting with `PORT`, up
    /// to the first blank line or a line mentioning `Service detection`.
    /// Rows with fewer than three whitespace-separated fields are skipped;
    /// everything past the service field is joined into the version column.
    /// A report with no header yields an empty table, not an error.
    pub fn parse_ports(&self, report: &str) -> Vec<PortRecord> {
        let mut ports = Vec::new();
        let mut in_table = false;

        for line in report.lines() {
            let line = line.trim();

            if line.starts_with("PORT") {
                in_table = true;
                continue;
            }

            if in_table && (line.is_empty() || line.contains("Service detection")) {
                in_table = false;
            }

            if in_table {
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() >= 3 {
                    ports.push(PortRecord {
                        port: fields[0].to_string(),
                        state: fields[1].to_string(),
                        service: fields[2].to_string(),
                        version: fields[3..].join(" "),
                    });
                }
            }
        }

        ports
    }

    /// Collect every CVE identifier in the report, de-duplicated and in
    /// ascending lexicographic order.
    pub fn extract_cve_ids(&self, report: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .cve
            .find_iter(report)
            .map(|m| m.as_str().to_string())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_REPORT: &str = "\
Starting Nmap 7.94 ( https://nmap.org )
Nmap scan report for 192.168.1.10
Host is up (0.0012s latency).

PORT     STATE SERVICE VERSION
22/tcp   open  ssh     OpenSSH
80/tcp   open  http    Apache 2.4

Service detection performed. Please report any incorrect results.
Nmap done: 1 IP address (1 host up) scanned in 12.34 seconds
";

    #[test]
    fn test_parse_ports_basic() {
        let parser = ReportParser::new();
        let ports = parser.parse_ports(BASIC_REPORT);

        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].port, "22/tcp");
        assert_eq!(ports[0].state, "open");
        assert_eq!(ports[0].service, "ssh");
        assert_eq!(ports[0].version, "OpenSSH");
        assert_eq!(ports[1].port, "80/tcp");
        assert_eq!(ports[1].version, "Apache 2.4");
    }

    #[test]
    fn test_parse_ports_without_version_column() {
        let parser = ReportParser::new();
        let report = "PORT     STATE SERVICE\n53/udp   open  domain\n\n";

        let ports = parser.parse_ports(report);
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].service, "domain");
        assert_eq!(ports[0].version, "");
    }

    #[test]
    fn test_parse_ports_no_header_is_empty() {
        let parser = ReportParser::new();
        let report = "Nmap scan report for 10.0.0.1\nHost is up.\nAll 1000 ports closed\n";

        assert!(parser.parse_ports(report).is_empty());
    }

    #[test]
    fn test_parse_ports_table_ends_at_service_detection_line() {
        let parser = ReportParser::new();
        let report = "\
PORT     STATE SERVICE VERSION
22/tcp   open  ssh     OpenSSH
Service detection performed on 1 host
8080/tcp open  http-proxy ignored
";

        let ports = parser.parse_ports(report);
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, "22/tcp");
    }

    #[test]
    fn test_parse_ports_short_rows_skipped() {
        let parser = ReportParser::new();
        let report = "PORT     STATE SERVICE\n22/tcp   open\n80/tcp open http\n\n";

        let ports = parser.parse_ports(report);
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, "80/tcp");
    }

    #[test]
    fn test_parse_ports_multiple_tables_append_in_order() {
        let parser = ReportParser::new();
        let report = "\
PORT     STATE SERVICE
22/tcp   open  ssh

PORT     STATE SERVICE
443/tcp  open  https
";

        let ports = parser.parse_ports(report);
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].port, "22/tcp");
        assert_eq!(ports[1].port, "443/tcp");
    }

    #[test]
    fn test_extract_cve_ids_sorted_and_deduped() {
        let parser = ReportParser::new();
        let report = "\
| vulners:
|   CVE-2023-1000  7.5  https://vulners.com/cve/CVE-2023-1000
|   CVE-2021-5     5.0  https://vulners.com/cve/CVE-2021-5
|_  CVE-2023-1000  7.5
";

        let ids = parser.extract_cve_ids(report);
        assert_eq!(ids, vec!["CVE-2021-5", "CVE-2023-1000"]);
    }

    #[test]
    fn test_extract_cve_ids_requires_four_digit_year() {
        let parser = ReportParser::new();
        let report = "CVE-123-4567 is not an id, CVE-2019-0708 is";

        let ids = parser.extract_cve_ids(report);
        assert_eq!(ids, vec!["CVE-2019-0708"]);
    }

    #[test]
    fn test_extract_cve_ids_empty_report() {
        let parser = ReportParser::new();
        assert!(parser.extract_cve_ids("nothing to see here").is_empty());
    }

    #[test]
    fn test_reparsing_is_idempotent() {
        let parser = ReportParser::new();
        assert_eq!(
            parser.parse_ports(BASIC_REPORT),
            parser.parse_ports(BASIC_REPORT)
        );
        assert_eq!(
            parser.extract_cve_ids(BASIC_REPORT),
            parser.extract_cve_ids(BASIC_REPORT)
        );
    }
}
