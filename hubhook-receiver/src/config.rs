//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and shared read-only with every handler.

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

/// Default port when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3000;

/// Which HMAC engine the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Probe the compiled-in engines, native first.
    #[default]
    Auto,
    Native,
    Ring,
}

impl FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "native" => Ok(Self::Native),
            "ring" => Ok(Self::Ring),
            other => Err(format!("unknown HMAC backend '{other}'")),
        }
    }
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Native => "native",
            Self::Ring => "ring",
        })
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Token the platform echoes back during the subscription handshake
    pub verify_token: Option<String>,

    /// App secret used as the HMAC-SHA256 key for delivery signatures
    pub app_secret: Option<String>,

    /// Preferred HMAC engine
    pub hmac_backend: BackendPreference,

    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            port: parse_or_default(&lookup, "PORT", DEFAULT_PORT),

            verify_token: lookup("VERIFY_TOKEN"),

            app_secret: lookup("APP_SECRET"),

            hmac_backend: parse_or_default(&lookup, "HMAC_BACKEND", BackendPreference::Auto),

            log_format: parse_or_default(&lookup, "LOG_FORMAT", LogFormat::Json),
        }
    }

    /// Check if delivery signature verification is enabled.
    pub fn signature_verification_enabled(&self) -> bool {
        self.app_secret
            .as_ref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }
}

// Secrets are reported as set/unset only.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("verify_token_set", &self.verify_token.is_some())
            .field("app_secret_set", &self.app_secret.is_some())
            .field("hmac_backend", &self.hmac_backend)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Parse a variable, warning and falling back to `default` on bad input.
fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(e) => {
            warn!(env_var = name, value = %raw, error = %e, "invalid_env_value_using_default");
            default
        }
    }
}
