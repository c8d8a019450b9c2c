//! Credentials and request authentication.
//!
//! - [`password`]: argon2 hashing of account passwords
//! - [`token`]: signed, time-limited `{account id, role}` tokens
//! - [`guard`]: axum extractors that authenticate a request before its handler runs

pub mod guard;
pub mod password;
pub mod token;

pub use guard::{AdminOnly, Authenticated, OptionalPrincipal, Owned, VendorOnly, can_mutate};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenIssuer};
