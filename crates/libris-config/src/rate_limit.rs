//! Rate limits for the anonymous endpoints.
//!
//! Two token buckets are configured, keyed by client IP:
//!
//! - auth (`POST /api/auth/login`): `RATE_LIMIT_AUTH_PER_SECOND` (default 10,
//!   one token replenished every 10 seconds) and `RATE_LIMIT_AUTH_BURST_SIZE`
//!   (default 5)
//! - general (`GET /api/catalog`): `RATE_LIMIT_GENERAL_PER_SECOND` (default 2)
//!   and `RATE_LIMIT_GENERAL_BURST_SIZE` (default 30)
//!
//! Buckets are keyed by the TCP peer address, so the server must be served
//! with connect info. Forwarding headers are ignored.

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

use crate::env_or;

pub type IpGovernorConfig =
    GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Seconds between token replenishments on general endpoints.
    pub general_per_second: u64,
    pub general_burst_size: u32,
    /// Seconds between token replenishments on login.
    pub auth_per_second: u64,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 2,
            general_burst_size: 30,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_per_second: env_or("RATE_LIMIT_GENERAL_PER_SECOND", defaults.general_per_second),
            general_burst_size: env_or("RATE_LIMIT_GENERAL_BURST_SIZE", defaults.general_burst_size),
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// # Panics
    ///
    /// Never in practice: zero values are raised to 1 before building.
    #[must_use]
    pub fn general_governor_config(&self) -> IpGovernorConfig {
        build(self.general_per_second, self.general_burst_size)
    }

    /// # Panics
    ///
    /// Never in practice: zero values are raised to 1 before building.
    #[must_use]
    pub fn auth_governor_config(&self) -> IpGovernorConfig {
        build(self.auth_per_second, self.auth_burst_size)
    }
}

fn build(per_second: u64, burst_size: u32) -> IpGovernorConfig {
    GovernorConfigBuilder::default()
        .per_second(per_second.max(1))
        .burst_size(burst_size.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("governor config with non-zero period and burst")
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::extract::ConnectInfo;
    use axum::http::Request;
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.general_per_second, 2);
        assert_eq!(config.general_burst_size, 30);
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_governor_configs_build() {
        let config = RateLimitConfig::default();
        let _ = config.general_governor_config();
        let _ = config.auth_governor_config();
    }

    #[test]
    fn test_zero_values_do_not_panic() {
        let config = RateLimitConfig {
            general_per_second: 0,
            general_burst_size: 0,
            auth_per_second: 0,
            auth_burst_size: 0,
        };
        let _ = config.general_governor_config();
        let _ = config.auth_governor_config();
    }

    #[test]
    fn test_key_is_peer_address_not_forwarded_header() {
        let peer = SocketAddr::from(([203, 0, 113, 7], 40_000));
        let request = |forwarded_for: &str| {
            let mut req = Request::builder()
                .header("x-forwarded-for", forwarded_for)
                .header("x-real-ip", forwarded_for)
                .body(())
                .unwrap();
            req.extensions_mut().insert(ConnectInfo(peer));
            req
        };

        let first = PeerIpKeyExtractor.extract(&request("198.51.100.1")).unwrap();
        let second = PeerIpKeyExtractor.extract(&request("198.51.100.2")).unwrap();

        assert_eq!(first, peer.ip());
        assert_eq!(first, second);
    }

    #[test]
    fn test_request_without_peer_address_has_no_key() {
        let req = Request::builder()
            .header("x-forwarded-for", "198.51.100.1")
            .body(())
            .unwrap();

        assert!(PeerIpKeyExtractor.extract(&req).is_err());
    }
}
