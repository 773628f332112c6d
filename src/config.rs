//! Configuration loading and management

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default Twitch IRC endpoint
pub const TWITCH_SERVER: &str = "irc.chat.twitch.tv";
pub const TWITCH_IRC_PORT: u16 = 6667;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no twitch credentials provided: missing {0}")]
    Missing(&'static str),

    #[error("failed to read secret file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse secret file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid TWITCH_PORT value: {0}")]
    InvalidPort(String),
}

/// Credentials as stored in the JSON secret file
#[derive(Debug, Default, Deserialize)]
struct SecretFile {
    token: Option<String>,
    username: Option<String>,
    channel: Option<String>,
}

/// Relay configuration, loaded once at startup
#[derive(Clone)]
pub struct Config {
    /// Chat server host
    pub server: String,

    /// Chat server port
    pub port: u16,

    /// OAuth access token, always carrying the `oauth:` prefix
    pub token: String,

    /// Login name used for NICK
    pub username: String,

    /// Target channel, always carrying the leading `#`
    pub channel: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("channel", &self.channel)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment and the secret file
    ///
    /// Environment variables take precedence over the secret file. A file
    /// named by `TWITCH_SECRET_FILE` must exist; the default one may not.
    pub fn load() -> Result<Self, ConfigError> {
        let secret = load_secret(std::env::var_os("TWITCH_SECRET_FILE").map(PathBuf::from))?;

        let port = match std::env::var("TWITCH_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => TWITCH_IRC_PORT,
        };

        Self::from_parts(
            std::env::var("TWITCH_SERVER").unwrap_or_else(|_| TWITCH_SERVER.to_string()),
            port,
            env_or("TWITCH_TOKEN", secret.token),
            env_or("TWITCH_USERNAME", secret.username),
            env_or("TWITCH_CHANNEL", secret.channel),
        )
    }

    /// Build a normalized configuration from raw values
    pub fn from_parts(
        server: String,
        port: u16,
        token: Option<String>,
        username: Option<String>,
        channel: Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = non_empty(token).ok_or(ConfigError::Missing("token"))?;
        let username = non_empty(username).ok_or(ConfigError::Missing("username"))?;
        let channel = non_empty(channel).ok_or(ConfigError::Missing("channel"))?;

        let token = if token.starts_with("oauth:") {
            token
        } else {
            format!("oauth:{token}")
        };

        let channel = channel.to_lowercase();
        let channel = if channel.starts_with('#') {
            channel
        } else {
            format!("#{channel}")
        };

        Ok(Self {
            server,
            port,
            token,
            username: username.to_lowercase(),
            channel,
        })
    }
}

fn default_secret_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("twitch-hotkey-vote")
            .join("secret.json"),
    )
}

/// Read the secret file named by the environment, or the default one if present
///
/// An explicitly named file must exist; the default location is optional.
fn load_secret(explicit: Option<PathBuf>) -> Result<SecretFile, ConfigError> {
    match explicit {
        Some(path) => read_secret_file(&path),
        None => match default_secret_path() {
            Some(path) if path.exists() => read_secret_file(&path),
            _ => Ok(SecretFile::default()),
        },
    }
}

fn read_secret_file(path: &Path) -> Result<SecretFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

fn env_or(key: &str, fallback: Option<String>) -> Option<String> {
    std::env::var(key).ok().or(fallback)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Timing knobs for the chat worker loop
#[derive(Debug, Clone, Copy)]
pub struct ClientTiming {
    /// Sleep between worker iterations
    pub tick: Duration,

    /// Minimum time between keepalive checks
    pub ping_interval: Duration,

    /// How long `stop()` waits for the worker to flush and exit
    pub stop_timeout: Duration,
}

impl Default for ClientTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(500),
            ping_interval: Duration::from_secs(10),
            stop_timeout: Duration::from_secs(5),
        }
    }
}
