//! Issuer configuration

use std::str::FromStr;
use std::time::Duration;

use coffeeshop_common::Config;
use jsonwebtoken::Algorithm;

/// Algorithms a JWKS of RSA keys can verify
const RSA_ALGORITHMS: &[Algorithm] = &[
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

/// Authorization configuration, fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub domain: String,
    pub audience: String,
    pub algorithm: Algorithm,
    pub jwks_url: String,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Configuration with the default algorithm (RS256), the well-known
    /// JWKS location under `domain`, a 10 minute cache and a 5 second fetch timeout.
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        let domain = domain.into();
        let jwks_url = format!("https://{}/.well-known/jwks.json", domain);
        Self {
            domain,
            audience: audience.into(),
            algorithm: Algorithm::RS256,
            jwks_url,
            cache_ttl: Duration::from_secs(600),
            fetch_timeout: Duration::from_secs(5),
            leeway_secs: 0,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Clock skew tolerated on `exp` and `nbf`, in seconds
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Expected `iss` claim: `https://<domain>/`
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// Build from the process configuration, rejecting symmetric or unknown algorithms.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let algorithm = Algorithm::from_str(config.jwt_algorithm.trim())
            .map_err(|_| anyhow::anyhow!("Unknown JWT_ALGORITHM: {}", config.jwt_algorithm))?;

        if !RSA_ALGORITHMS.contains(&algorithm) {
            anyhow::bail!(
                "JWT_ALGORITHM must be an RSA signing algorithm, got {:?}",
                algorithm
            );
        }

        let mut auth_config = Self::new(&config.auth0_domain, &config.api_audience)
            .with_algorithm(algorithm)
            .with_leeway(config.jwt_leeway_secs)
            .with_cache_ttl(Duration::from_secs(config.jwks_cache_ttl_secs))
            .with_fetch_timeout(Duration::from_secs(config.jwks_fetch_timeout_secs));

        if let Some(url) = &config.jwks_url {
            auth_config = auth_config.with_jwks_url(url);
        }

        Ok(auth_config)
    }
}
