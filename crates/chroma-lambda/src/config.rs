//! Service configuration, read from the environment at cold start.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use chroma_storage::history::{DEFAULT_HISTORY_LIMIT, Retention, RetentionPolicy};

const DEFAULT_BUCKET: &str = "chroma";
const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-haiku-4-5-20251001-v1:0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Where palette history is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StoreBackend::S3),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store {other:?} (expected \"s3\" or \"memory\")")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bucket: String,
    pub model_id: String,
    pub store: StoreBackend,
    pub history_limit: usize,
    pub retention_policy: RetentionPolicy,
    /// Serve over plain HTTP on this address instead of the Lambda runtime.
    pub local_addr: Option<SocketAddr>,
    pub s3_endpoint: Option<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let history_limit = match var("CHROMA_HISTORY_LIMIT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: "CHROMA_HISTORY_LIMIT",
                        reason: "must be at least 1".to_string(),
                    });
                }
                Ok(limit) => limit,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "CHROMA_HISTORY_LIMIT",
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_HISTORY_LIMIT,
        };

        Ok(Self {
            bucket: var("CHROMA_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            model_id: var("CHROMA_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            store: parse_or("CHROMA_STORE", var("CHROMA_STORE"), StoreBackend::S3)?,
            history_limit,
            retention_policy: parse_or(
                "CHROMA_RETENTION",
                var("CHROMA_RETENTION"),
                RetentionPolicy::TruncateOnRead,
            )?,
            local_addr: parse_opt("CHROMA_LOCAL_ADDR", var("CHROMA_LOCAL_ADDR"))?,
            s3_endpoint: var("CHROMA_S3_ENDPOINT"),
        })
    }

    pub fn retention(&self) -> Retention {
        Retention {
            policy: self.retention_policy,
            max_entries: self.history_limit,
        }
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    Ok(parse_opt(var, raw)?.unwrap_or(default))
}

fn parse_opt<T>(var: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.map(|raw| {
        raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
    })
    .transpose()
}
