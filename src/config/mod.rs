//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

use crate::util::time::DEFAULT_FRAME_RATE;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Client configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Local frame clock rate in frames per second
    pub frame_rate: u32,
    /// Optional scripted controls for headless play
    pub input_script: Option<PathBuf>,
    /// Capacity of the outbound report queue
    pub outbound_queue: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        let frame_rate = match lookup("FRAME_RATE") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|fps| (1..=1000).contains(fps))
                .ok_or(ConfigError::Invalid("FRAME_RATE"))?,
            None => DEFAULT_FRAME_RATE,
        };

        let outbound_queue = match lookup("OUTBOUND_QUEUE") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("OUTBOUND_QUEUE"))?,
            None => 32,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
            frame_rate,
            input_script: lookup("INPUT_SCRIPT").map(PathBuf::from),
            outbound_queue,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
