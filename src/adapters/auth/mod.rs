//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` and `TokenBlacklist` ports:
//!
//! - `jwt` - HS256 bearer tokens checked against the blacklist
//! - `blacklist` - In-memory revoked-token store
//! - `mock` - Test implementations that don't require signed tokens

mod blacklist;
mod jwt;
mod mock;

pub use blacklist::{token_digest, InMemoryTokenBlacklist};
pub use jwt::{JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
