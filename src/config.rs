use std::time::Duration;

use crate::extract::ytdlp;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: String,
    pub ytdlp_program: String,
    pub extract_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            ytdlp_program: ytdlp::DEFAULT_PROGRAM.to_string(),
            extract_timeout: ytdlp::DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; unset or blank variables
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(addr) = var("MEDIA_GATEWAY_ADDR") {
            config.addr = addr.trim().to_string();
        } else if let Some(port) = var("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a port number",
                value: port.clone(),
            })?;
            config.addr = format!("0.0.0.0:{port}");
        }

        if let Some(program) = var("MEDIA_GATEWAY_YTDLP") {
            config.ytdlp_program = program.trim().to_string();
        }

        if let Some(secs) = var("MEDIA_GATEWAY_TIMEOUT_SECS") {
            let parsed = secs.trim().parse::<u64>().ok().filter(|secs| *secs > 0);
            let secs = parsed.ok_or(ConfigError::Invalid {
                name: "MEDIA_GATEWAY_TIMEOUT_SECS",
                expected: "a positive number of seconds",
                value: secs,
            })?;
            config.extract_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
