//! `invoicehub-auth` — credentials and bearer tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod user;

pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use credentials::{validate_registration, validate_update, ProfileChanges, Registration};
pub use jwt::{token_ttl, Hs256Jwt, JwtValidator, TokenError};
pub use password::{hash_password, verify_password, PasswordError};
pub use user::{RegisterUser, UpdateUser, User, UserProfile};
