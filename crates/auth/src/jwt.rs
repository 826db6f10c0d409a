//! Bearer token extraction and JWT verification

use std::str::FromStr;
use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Header, Validation};
use serde_json::{Map, Value};

use crate::claims::ValidatedClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwks::{HttpJwksSource, KeySetProvider, SigningKey};

const UNPARSABLE_TOKEN: &str = "Unable to parse authentication token.";

/// Extract the bearer token from the `Authorization` header.
///
/// The header must be exactly `Bearer <token>`; the scheme is case-sensitive.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::AuthorizationHeaderMissing)?;

    let header_str = header
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization header must be bearer token."))?;

    let parts: Vec<&str> = header_str.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok((*token).to_string()),
        [_, _] => Err(AuthError::invalid_header(
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::invalid_header("Token not found.")),
        _ => Err(AuthError::invalid_header(
            "Authorization header must be bearer token.",
        )),
    }
}

/// Verifies RS-signed tokens against the issuer's JWKS.
#[derive(Clone)]
pub struct TokenVerifier {
    config: Arc<AuthConfig>,
    keys: KeySetProvider,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig, keys: KeySetProvider) -> Self {
        Self {
            config: Arc::new(config),
            keys,
        }
    }

    /// Verifier backed by the configured HTTP JWKS endpoint
    pub fn from_config(config: AuthConfig) -> Result<Self, reqwest::Error> {
        let source = HttpJwksSource::new(config.jwks_url.clone(), config.fetch_timeout)?;
        let keys = KeySetProvider::new(Arc::new(source), config.cache_ttl);
        Ok(Self::new(config, keys))
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn key_set_provider(&self) -> &KeySetProvider {
        &self.keys
    }

    /// Verify signature, expiry, audience and issuer; return the decoded claims.
    pub async fn verify(&self, token: &str) -> Result<ValidatedClaims, AuthError> {
        let header = decode_token_structure(token)?;

        if header.alg != self.config.algorithm {
            tracing::debug!(alg = ?header.alg, "Rejected token algorithm");
            return Err(AuthError::invalid_header("Unsupported token algorithm."));
        }

        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Token header has no key id."))?;

        let key = self.find_signing_key(&kid).await?;

        if let Some(key_alg) = key.alg.as_deref() {
            if Algorithm::from_str(key_alg).ok() != Some(header.alg) {
                tracing::debug!(kid = %kid, key_alg = %key_alg, "Key algorithm does not match token");
                return Err(AuthError::invalid_header("Unsupported token algorithm."));
            }
        }

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|e| {
            tracing::warn!(error = %e, kid = %kid, "Published key cannot be used");
            AuthError::invalid_header("Unable to find the appropriate key.")
        })?;

        let token_data = decode::<ValidatedClaims>(token, &decoding_key, &self.validation())
            .map_err(|e| {
                tracing::debug!(error = %e, kid = %kid, "JWT validation failed");
                map_jwt_error(e.kind())
            })?;

        Ok(token_data.claims)
    }

    /// Look `kid` up, forcing one refresh on a miss.
    async fn find_signing_key(&self, kid: &str) -> Result<SigningKey, AuthError> {
        let keys = self.keys.current_key_set().await?;
        if let Some(key) = keys.find(kid) {
            return Ok(key.clone());
        }

        tracing::debug!(kid = %kid, "Unknown key id, refreshing JWKS");
        let keys = self.keys.refresh().await?;
        keys.find(kid).cloned().ok_or_else(|| {
            tracing::debug!(kid = %kid, "Key id not published by issuer");
            AuthError::invalid_header("Unable to find the appropriate key.")
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.leeway = self.config.leeway_secs;
        validation.validate_exp = true;
        validation
    }
}

/// Check the three-segment structure and decode header and payload JSON
/// without verifying anything.
fn decode_token_structure(token: &str) -> Result<Header, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(AuthError::invalid_header(UNPARSABLE_TOKEN));
    };

    let header = decode_header(token).map_err(|e| {
        tracing::debug!(error = %e, "Undecodable token header");
        AuthError::invalid_header(UNPARSABLE_TOKEN)
    })?;

    let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|e| {
        tracing::debug!(error = %e, "Undecodable token payload");
        AuthError::invalid_header(UNPARSABLE_TOKEN)
    })?;
    serde_json::from_slice::<Map<String, Value>>(&payload).map_err(|e| {
        tracing::debug!(error = %e, "Token payload is not a JSON object");
        AuthError::invalid_header(UNPARSABLE_TOKEN)
    })?;

    Ok(header)
}

fn map_jwt_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => {
            AuthError::invalid_claims("Incorrect claims. Please, check the audience and issuer.")
        }
        ErrorKind::Json(e) if e.classify() == serde_json::error::Category::Data => {
            AuthError::invalid_claims("Token claims are missing or malformed.")
        }
        _ => AuthError::invalid_header(UNPARSABLE_TOKEN),
    }
}
