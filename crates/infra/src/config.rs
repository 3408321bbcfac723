//! Process configuration read once from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use helios_core::{SessionId, UserId};

pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_DB_PATH: &str = "ERP_DB_PATH";
pub const ENV_SESSION_ID: &str = "ERP_SESSION_ID";
pub const ENV_USER_ID: &str = "ERP_USER_ID";
pub const ENV_BIND: &str = "HELIOS_BIND";
pub const ENV_LLM_MODEL: &str = "HELIOS_LLM_MODEL";
pub const ENV_LLM_TIMEOUT_SECS: &str = "HELIOS_LLM_TIMEOUT_SECS";
pub const ENV_MAX_ITERATIONS: &str = "HELIOS_MAX_ITERATIONS";

const DEFAULT_DB_PATH: &str = "erp_sample.db";
const DEFAULT_SESSION_ID: &str = "demo-session";
const DEFAULT_USER_ID: &str = "demo-user";
const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_LLM_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_ITERATIONS: usize = 15;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub google_api_key: String,
    pub db_path: PathBuf,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub bind_addr: SocketAddr,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub max_iterations: usize,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let google_api_key = get(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;

        let session_id = parse_or(&get, ENV_SESSION_ID, DEFAULT_SESSION_ID)?;
        let user_id = parse_or(&get, ENV_USER_ID, DEFAULT_USER_ID)?;
        let bind_addr = parse_or(&get, ENV_BIND, DEFAULT_BIND)?;
        let timeout_secs: u64 =
            parse_or(&get, ENV_LLM_TIMEOUT_SECS, &DEFAULT_LLM_TIMEOUT_SECS.to_string())?;
        let max_iterations: usize =
            parse_or(&get, ENV_MAX_ITERATIONS, &DEFAULT_MAX_ITERATIONS.to_string())?;

        if max_iterations == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_MAX_ITERATIONS,
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            google_api_key: google_api_key.trim().to_string(),
            db_path: PathBuf::from(get(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            session_id,
            user_id,
            bind_addr,
            llm_model: get(ENV_LLM_MODEL).unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout: Duration::from_secs(timeout_secs),
            max_iterations,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
