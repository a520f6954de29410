//! Web middleware.

mod auth;

pub use auth::{jwt_auth, AuthUser, JwtClaims, JwtState};
