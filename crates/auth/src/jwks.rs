//! Issuer signing keys (JWKS)
//!
//! `KeySetProvider` caches the issuer's key set as an immutable
//! `Arc<KeySet>` snapshot. Refreshes fetch without holding any lock and then
//! swap the snapshot in; concurrent refreshes may overlap and the last
//! successful one wins. Readers only ever see a complete set.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Largest JWKS document accepted from the issuer
pub const MAX_JWKS_BYTES: usize = 64 * 1024;

/// A single entry of a JWKS document as published by the issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(default)]
    pub kid: Option<String>,
    pub kty: String,
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

/// JWKS document: `{"keys": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSetDocument {
    pub keys: Vec<Jwk>,
}

/// RSA public key usable for signature verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub kid: String,
    pub alg: Option<String>,
    /// Base64url modulus
    pub n: String,
    /// Base64url exponent
    pub e: String,
}

/// Signing keys indexed by `kid`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: HashMap<String, SigningKey>,
}

impl KeySet {
    /// Keep RSA signature keys that carry a `kid` and both components.
    pub fn from_document(document: JwkSetDocument) -> Self {
        let mut keys = HashMap::new();
        for jwk in document.keys {
            let Some(kid) = jwk.kid else {
                tracing::debug!("Skipping JWK without kid");
                continue;
            };
            if jwk.kty != "RSA" {
                tracing::debug!(kid = %kid, kty = %jwk.kty, "Skipping non-RSA JWK");
                continue;
            }
            if jwk.key_use.as_deref().is_some_and(|u| u != "sig") {
                tracing::debug!(kid = %kid, "Skipping JWK not meant for signatures");
                continue;
            }
            let (Some(n), Some(e)) = (jwk.n, jwk.e) else {
                tracing::debug!(kid = %kid, "Skipping RSA JWK without modulus/exponent");
                continue;
            };
            keys.insert(
                kid.clone(),
                SigningKey {
                    kid,
                    alg: jwk.alg,
                    n,
                    e,
                },
            );
        }
        Self { keys }
    }

    pub fn find(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Where JWKS documents come from
#[async_trait::async_trait]
pub trait JwksSource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSetDocument, AuthError>;
}

/// Fetches the JWKS document over HTTP with a bounded timeout.
pub struct HttpJwksSource {
    http: reqwest::Client,
    url: String,
}

impl HttpJwksSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    fn oversized(&self) -> AuthError {
        tracing::warn!(url = %self.url, limit = MAX_JWKS_BYTES, "JWKS document too large");
        AuthError::KeySetUnavailable(format!(
            "JWKS document exceeds {} bytes",
            MAX_JWKS_BYTES
        ))
    }
}

#[async_trait::async_trait]
impl JwksSource for HttpJwksSource {
    async fn fetch(&self) -> Result<JwkSetDocument, AuthError> {
        let mut response = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::warn!(error = %e, url = %self.url, "JWKS request failed");
            AuthError::KeySetUnavailable(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, url = %self.url, "JWKS endpoint returned an error");
            return Err(AuthError::KeySetUnavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        if response
            .content_length()
            .is_some_and(|len| len > MAX_JWKS_BYTES as u64)
        {
            return Err(self.oversized());
        }

        // Content-Length may be absent or wrong; enforce the cap while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            tracing::warn!(error = %e, url = %self.url, "JWKS body read failed");
            AuthError::KeySetUnavailable(e.to_string())
        })? {
            if body.len() + chunk.len() > MAX_JWKS_BYTES {
                return Err(self.oversized());
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice::<JwkSetDocument>(&body).map_err(|e| {
            tracing::warn!(error = %e, url = %self.url, "Malformed JWKS document");
            AuthError::KeySetUnavailable(format!("malformed JWKS document: {}", e))
        })
    }
}

/// A fixed, locally supplied key set
pub struct StaticJwksSource {
    document: JwkSetDocument,
}

impl StaticJwksSource {
    pub fn new(document: JwkSetDocument) -> Self {
        Self { document }
    }
}

#[async_trait::async_trait]
impl JwksSource for StaticJwksSource {
    async fn fetch(&self) -> Result<JwkSetDocument, AuthError> {
        Ok(self.document.clone())
    }
}

struct CachedKeySet {
    keys: Arc<KeySet>,
    fetched_at: Instant,
}

/// Process-scoped, shared JWKS cache.
///
/// Cloning is cheap; all clones share one cache. Dropping the last clone
/// releases it.
#[derive(Clone)]
pub struct KeySetProvider {
    source: Arc<dyn JwksSource>,
    cache: Arc<RwLock<Option<CachedKeySet>>>,
    ttl: Duration,
}

impl KeySetProvider {
    pub fn new(source: Arc<dyn JwksSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Cached key set, fetching it first when the cache is empty or stale.
    pub async fn current_key_set(&self) -> Result<Arc<KeySet>, AuthError> {
        if let Some(keys) = self.cached() {
            return Ok(keys);
        }
        self.refresh().await
    }

    /// Fetch the key set unconditionally and install it as the new snapshot.
    pub async fn refresh(&self) -> Result<Arc<KeySet>, AuthError> {
        let document = self.source.fetch().await?;
        let keys = Arc::new(KeySet::from_document(document));

        {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            *cache = Some(CachedKeySet {
                keys: Arc::clone(&keys),
                fetched_at: Instant::now(),
            });
        }

        tracing::debug!(key_count = keys.len(), "JWKS refreshed");
        Ok(keys)
    }

    fn cached(&self) -> Option<Arc<KeySet>> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.keys))
    }
}
