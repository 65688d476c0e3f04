use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use driftfolio_core::analysis::MissingPricePolicy;
use rand::{rngs::OsRng, RngCore};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_PATH: &str = "./db/app.db";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub missing_price_policy: MissingPricePolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("DF_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .context("Invalid DF_LISTEN_ADDR")?;
        let db_path = env_or("DF_DB_PATH", DEFAULT_DB_PATH);
        let cors_allow = parse_origins(&env_or("DF_CORS_ALLOW_ORIGINS", "*"));
        let timeout_ms: u64 = env_or("DF_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);

        let jwt_secret = match std::env::var("DF_JWT_SECRET") {
            Ok(raw) => decode_secret_key(&raw)?,
            Err(_) => {
                tracing::warn!(
                    "DF_JWT_SECRET is not set; using a random secret. Tokens will not survive a restart."
                );
                random_secret()
            }
        };

        let ttl_minutes: u64 = env_or("DF_ACCESS_TOKEN_TTL_MINUTES", "60")
            .parse()
            .context("Invalid DF_ACCESS_TOKEN_TTL_MINUTES")?;

        let missing_price_policy = match std::env::var("DF_MISSING_PRICE_POLICY") {
            Ok(raw) => raw
                .parse::<MissingPricePolicy>()
                .context("Invalid DF_MISSING_PRICE_POLICY")?,
            Err(_) => MissingPricePolicy::default(),
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            access_token_ttl: Duration::from_secs(ttl_minutes * 60),
            missing_price_policy,
        })
    }

    /// Defaults suitable for tests: a random secret and the given database.
    pub fn for_db_path(db_path: impl Into<String>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            db_path: db_path.into(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            jwt_secret: random_secret(),
            access_token_ttl: Duration::from_secs(60 * 60),
            missing_price_policy: MissingPricePolicy::default(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn random_secret() -> Vec<u8> {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.to_vec()
}

/// Accepts a base64 encoded 32-byte key or a 32-character ASCII string.
pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    match BASE64.decode(trimmed) {
        Ok(bytes) if bytes.len() == 32 => Ok(bytes),
        _ if trimmed.len() == 32 => Ok(trimmed.as_bytes().to_vec()),
        Ok(_) => anyhow::bail!("JWT secret must decode to exactly 32 bytes"),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    }
}
