//! Target precondition checks.
//!
//! The scan runner trusts its target; this is the collaborator that earns
//! that trust. A target is acceptable when it is an IP literal or a
//! hostname the host's resolver can look up.

use std::net::IpAddr;

use tokio::net::lookup_host;

pub async fn is_valid_target(target: &str) -> bool {
    if target.parse::<IpAddr>().is_ok() {
        return true;
    }
    resolves(target).await
}

async fn resolves(host: &str) -> bool {
    match lookup_host((host, 0u16)).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ipv4_literal_is_valid() {
        assert!(is_valid_target("192.168.1.10").await);
    }

    #[tokio::test]
    async fn test_ipv6_literal_is_valid() {
        assert!(is_valid_target("::1").await);
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_invalid() {
        // .invalid is reserved and never resolves
        assert!(!is_valid_target("scanbridge-test.invalid").await);
    }

    #[tokio::test]
    async fn test_garbage_is_invalid() {
        assert!(!is_valid_target("not a hostname").await);
    }
}
