//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables at process start
//! and is immutable afterwards.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Token issuer domain, e.g. `coffee.us.auth0.com`
    pub auth0_domain: String,
    /// Audience every accepted token must carry
    pub api_audience: String,
    /// Asymmetric signing algorithm tokens must declare
    pub jwt_algorithm: String,
    /// JWKS endpoint override; derived from the domain when unset
    pub jwks_url: Option<String>,
    pub jwks_cache_ttl_secs: u64,
    pub jwks_fetch_timeout_secs: u64,
    pub jwt_leeway_secs: u64,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            auth0_domain: env::var("AUTH0_DOMAIN")
                .map_err(|_| anyhow::anyhow!("AUTH0_DOMAIN is required"))?,
            api_audience: env::var("API_AUDIENCE")
                .map_err(|_| anyhow::anyhow!("API_AUDIENCE is required"))?,
            jwt_algorithm: env::var("JWT_ALGORITHM").unwrap_or_else(|_| "RS256".to_string()),
            jwks_url: env::var("JWKS_URL").ok().filter(|url| !url.is_empty()),
            jwks_cache_ttl_secs: parse_or("JWKS_CACHE_TTL_SECS", 600)?,
            jwks_fetch_timeout_secs: parse_or("JWKS_FETCH_TIMEOUT_SECS", 5)?,
            jwt_leeway_secs: parse_or("JWT_LEEWAY_SECS", 0)?,

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "coffeeshop=debug".to_string()),
            port: parse_or("PORT", 3000)?,
        };

        Ok(config)
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is invalid: {e}")),
        Err(_) => Ok(default),
    }
}
