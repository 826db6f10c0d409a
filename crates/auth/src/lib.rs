//! Authorization core for the Coffee Shop API
//!
//! Extracts bearer tokens, verifies them as RS-signed JWTs against the
//! issuer's JWKS, checks permission scopes, and exposes the result to axum
//! handlers through a per-route guard layer.

mod claims;
mod config;
mod error;
mod gate;
mod guard;
mod jwks;
mod jwt;
mod permissions;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use claims::{Audience, ValidatedClaims};
pub use config::AuthConfig;
pub use error::AuthError;
pub use gate::{AuthGate, AuthStage};
pub use guard::{RequirePermission, RequirePermissionService};
pub use jwks::{
    HttpJwksSource, Jwk, JwkSetDocument, JwksSource, KeySet, KeySetProvider, SigningKey,
    StaticJwksSource, MAX_JWKS_BYTES,
};
pub use jwt::{extract_bearer_token, TokenVerifier};
pub use permissions::check_permission;
