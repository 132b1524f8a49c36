//! # Orbit Infrastructure
//!
//! Concrete implementations of the ports defined in `orbit-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory storage only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `rate-limit` - Rate limiting via governor

pub mod auth;
pub mod database;
pub mod live;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::InMemoryStore;
pub use live::InMemoryLiveNotifier;

#[cfg(feature = "postgres")]
pub use database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
