//! Authorization gate
//!
//! Runs extraction, verification and the permission check in order and
//! stops at the first failure. No permission check runs without a fully
//! validated token.

use std::fmt;

use axum::http::HeaderMap;

use crate::claims::ValidatedClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::{extract_bearer_token, TokenVerifier};
use crate::permissions::check_permission;

/// How far a request got through the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Unauthenticated,
    TokenExtracted,
    ClaimsValidated,
    PermissionGranted,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStage::Unauthenticated => write!(f, "unauthenticated"),
            AuthStage::TokenExtracted => write!(f, "token_extracted"),
            AuthStage::ClaimsValidated => write!(f, "claims_validated"),
            AuthStage::PermissionGranted => write!(f, "permission_granted"),
        }
    }
}

/// Shared authorization entry point.
///
/// Routes are guarded by wrapping the gate in a layer:
/// ```ignore
/// get(list_drinks_detail).route_layer(RequirePermission::new(gate, "get:drinks-detail"))
/// ```
#[derive(Clone)]
pub struct AuthGate {
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Gate backed by the issuer's HTTP JWKS endpoint
    pub fn from_config(config: AuthConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(TokenVerifier::from_config(config)?))
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Authorize a request for `required`, returning the validated claims.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        required: &str,
    ) -> Result<ValidatedClaims, AuthError> {
        let mut stage = AuthStage::Unauthenticated;
        let result = self.run(headers, required, &mut stage).await;

        match &result {
            Ok(claims) => {
                tracing::debug!(sub = %claims.sub, permission = %required, "Authorization granted")
            }
            Err(e) => tracing::debug!(
                stage = %stage,
                code = e.error_code(),
                permission = %required,
                "Authorization denied"
            ),
        }

        result
    }

    async fn run(
        &self,
        headers: &HeaderMap,
        required: &str,
        stage: &mut AuthStage,
    ) -> Result<ValidatedClaims, AuthError> {
        let token = extract_bearer_token(headers)?;
        *stage = AuthStage::TokenExtracted;

        let claims = self.verifier.verify(&token).await?;
        *stage = AuthStage::ClaimsValidated;

        check_permission(&claims, required)?;
        *stage = AuthStage::PermissionGranted;

        Ok(claims)
    }
}
