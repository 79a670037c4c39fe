use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub speech_workers: usize,
    pub tts_command: Option<String>,
    pub speak_detections: bool,
    pub session_ttl: Duration,
    pub max_sessions: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// This function will look for a `.env` file in the current directory
    /// and load the following variables:
    ///
    /// *   `BIND_ADDRESS`: The address and port to bind the server to.
    ///     Defaults to "127.0.0.1:5000".
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    /// *   `SPEECH_WORKERS`: (Optional) Number of text-to-speech workers.
    ///     Defaults to 2, must be at least 1.
    /// *   `TTS_COMMAND`: (Optional) External TTS program, e.g. "espeak -s 150".
    ///     When unset, speech is only logged.
    /// *   `SPEAK_DETECTIONS`: (Optional) Speak detected signs on the server.
    ///     Defaults to "false".
    /// *   `SESSION_TTL_SECS`: (Optional) Idle seconds before a session is
    ///     dropped. Defaults to 86400.
    /// *   `MAX_SESSIONS`: (Optional) Most sessions held at once. Defaults to 10000.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:5000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let speech_workers = positive_integer(&lookup, "SPEECH_WORKERS", 2)?;

        let tts_command = lookup("TTS_COMMAND").filter(|cmd| !cmd.trim().is_empty());

        let speak_detections = match lookup("SPEAK_DETECTIONS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SPEAK_DETECTIONS".to_string(),
                    format!("'{}' is not a boolean", raw),
                )
            })?,
            None => false,
        };

        let session_ttl_secs = positive_integer(&lookup, "SESSION_TTL_SECS", 24 * 60 * 60)?;
        let max_sessions = positive_integer(&lookup, "MAX_SESSIONS", 10_000)?;

        Ok(Self {
            bind_address,
            log_level,
            speech_workers,
            tts_command,
            speak_detections,
            session_ttl: Duration::from_secs(session_ttl_secs as u64),
            max_sessions,
        })
    }
}

fn positive_integer<F>(lookup: &F, key: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ConfigError::InvalidValue(
                key.to_string(),
                format!("'{}' is not a positive integer", raw),
            )),
        },
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
