//! Process configuration from environment variables

use crate::runtime::ChatId;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Settings supplied at process start
#[derive(Clone)]
pub struct BotConfig {
    /// Bot API credential
    pub token: String,
    /// Chat that receives crisis alerts
    pub operator: ChatId,
    pub api_base: String,
    pub poll_timeout: Duration,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("operator", &self.operator)
            .field("api_base", &self.api_base)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let token = get("SIGAR_BOT_TOKEN")
            .or_else(|| get("TELEGRAM_TOKEN"))
            .ok_or(ConfigError::Missing("SIGAR_BOT_TOKEN"))?;

        let operator = get("SIGAR_OPERATOR_CHAT_ID")
            .ok_or(ConfigError::Missing("SIGAR_OPERATOR_CHAT_ID"))?;
        let operator = operator
            .trim()
            .parse()
            .map(ChatId)
            .map_err(|_| ConfigError::Invalid {
                var: "SIGAR_OPERATOR_CHAT_ID",
                value: operator.clone(),
            })?;

        let poll_timeout = match get("SIGAR_POLL_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "SIGAR_POLL_TIMEOUT_SECS",
                value: raw.clone(),
            })?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };

        Ok(Self {
            token,
            operator,
            api_base: get("SIGAR_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            poll_timeout: Duration::from_secs(poll_timeout),
        })
    }
}
