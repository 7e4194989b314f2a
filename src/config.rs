use crate::domain::MAX_SCALE;
use ethers::types::{H160, H256};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: String,
    pub scorer_api_key: String,
    pub scorer_api_url: String,
    pub scorer_id: u128,
    pub attester_address: H160,
    pub schema_uid: H256,
    pub chain_id: Option<u64>,
    pub score_decimals: u32,
    pub batch_size: usize,
    pub request_delay: Duration,
    pub http_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let rpc_url = required(&env_map, "RPC_URL")?;
        let private_key = required(&env_map, "PRIVATE_KEY")?;
        let scorer_api_key = required(&env_map, "SCORER_API_KEY")?;
        let scorer_api_url = required(&env_map, "SCORER_API_URL")?;

        let scorer_id = required(&env_map, "SCORER_ID")?
            .parse::<u128>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SCORER_ID".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        let attester_address = parse_hex::<H160>(&env_map, "ATTESTER_ADDRESS", 40)?;
        let schema_uid = parse_hex::<H256>(&env_map, "SCHEMA_UID", 64)?;

        let chain_id = match env_map.get("CHAIN_ID").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue("CHAIN_ID".to_string(), "must be a valid u64".to_string())
            })?),
            None => None,
        };

        let score_decimals = env_map
            .get("SCORE_DECIMALS")
            .map(|s| s.as_str())
            .unwrap_or("4")
            .parse::<u32>()
            .ok()
            .filter(|d| *d <= MAX_SCALE)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SCORE_DECIMALS".to_string(),
                    format!("must be an integer between 0 and {}", MAX_SCALE),
                )
            })?;

        let batch_size = env_map
            .get("BATCH_SIZE")
            .map(|s| s.as_str())
            .unwrap_or("10")
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "BATCH_SIZE".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        let request_delay_ms = env_map
            .get("REQUEST_DELAY_MS")
            .map(|s| s.as_str())
            .unwrap_or("1000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "REQUEST_DELAY_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let http_timeout_secs = env_map
            .get("HTTP_TIMEOUT_SECS")
            .map(|s| s.as_str())
            .unwrap_or("30")
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "HTTP_TIMEOUT_SECS".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        Ok(Config {
            rpc_url,
            private_key,
            scorer_api_key,
            scorer_api_url,
            scorer_id,
            attester_address,
            schema_uid,
            chain_id,
            score_decimals,
            batch_size,
            request_delay: Duration::from_millis(request_delay_ms),
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("scorer_api_key", &"<redacted>")
            .field("scorer_api_url", &self.scorer_api_url)
            .field("scorer_id", &self.scorer_id)
            .field("attester_address", &self.attester_address)
            .field("schema_uid", &self.schema_uid)
            .field("chain_id", &self.chain_id)
            .field("score_decimals", &self.score_decimals)
            .field("batch_size", &self.batch_size)
            .field("request_delay", &self.request_delay)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_hex<T: FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    digits: usize,
) -> Result<T, ConfigError> {
    let raw = required(env_map, key)?;
    let hex_digits = raw.strip_prefix("0x").unwrap_or(&raw);
    if hex_digits.len() != digits || !hex_digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be 0x followed by {} hex digits", digits),
        ));
    }
    T::from_str(hex_digits).map_err(|_| {
        ConfigError::InvalidValue(key.to_string(), "must be valid hex".to_string())
    })
}
