//! Application configuration loaded from environment variables.
//!
//! Telemetry settings are read separately so logging is up before anything
//! here logs.

use std::env;

use orbit_infra::JwtConfig;

#[cfg(feature = "postgres")]
use orbit_infra::DatabaseConfig;
#[cfg(feature = "rate-limit")]
use orbit_infra::RateLimitConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Port the socket.io listener binds on the same host.
    pub socket_port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_port("PORT", 8080),
            socket_port: parse_port("SOCKET_PORT", 8081),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

fn parse_port(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(default)
}
