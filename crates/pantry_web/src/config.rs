//! Command-line / environment configuration.
//!
//! [`WebArgs`] is what clap parses; [`RuntimeConfig`] is the validated form
//! the server runs with. Anything wrong here fails startup.

use clap::Parser;
use pantry_protocol::defaults::{
    DEFAULT_API_URL, DEFAULT_BIND_ADDR, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_UPLOAD_MB,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SESSION_MAX_AGE_SECS,
};
use pantry_security::{resolve_session_secret, Environment, SecretError, SessionSecret};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pantry-web",
    about = "Volunteer frontend for pantry inventory upload and review"
)]
pub struct WebArgs {
    /// Address to listen on
    #[arg(long, env = "PANTRY_BIND", default_value_t = DEFAULT_BIND_ADDR.to_string())]
    pub bind: String,

    /// Base URL of the inventory backend
    #[arg(long, env = "PANTRY_API_URL", default_value_t = DEFAULT_API_URL.to_string())]
    pub api_url: String,

    /// Public origin of this frontend (used for login return URLs)
    #[arg(long, env = "PANTRY_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Secret used to sign session tokens (required in production)
    #[arg(long, env = "PANTRY_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// development | production
    #[arg(long, env = "PANTRY_ENV", default_value = "development")]
    pub environment: Environment,

    /// Timeout for each backend request, in seconds
    #[arg(
        long,
        env = "PANTRY_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    pub request_timeout_secs: u64,

    /// Lifetime of a sign-in, in seconds
    #[arg(
        long,
        env = "PANTRY_SESSION_MAX_AGE_SECS",
        default_value_t = DEFAULT_SESSION_MAX_AGE_SECS
    )]
    pub session_max_age_secs: u32,

    /// Largest accepted photo batch, in megabytes
    #[arg(long, env = "PANTRY_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,

    /// Directory for log files (default: ~/.pantry_review/logs)
    #[arg(long, env = "PANTRY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log to stderr only
    #[arg(long)]
    pub no_log_file: bool,

    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address '{value}': {reason}")]
    Bind { value: String, reason: String },
    #[error("invalid {field} '{value}': {reason}")]
    Url {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error(transparent)]
    Secret(#[from] SecretError),
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: SocketAddr,
    pub api_url: Url,
    /// Origin used when the request carries no usable `Host`.
    pub default_origin: Url,
    pub public_url: Option<Url>,
    pub session_secret: SessionSecret,
    pub environment: Environment,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_upload_bytes: usize,
    pub session_max_age: chrono::Duration,
}

impl RuntimeConfig {
    pub fn from_args(args: &WebArgs) -> Result<Self, ConfigError> {
        let bind_addr: SocketAddr = args.bind.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Bind {
                value: args.bind.clone(),
                reason: e.to_string(),
            }
        })?;

        let api_url = parse_http_url("api-url", &args.api_url)?;
        let public_url = args
            .public_url
            .as_deref()
            .map(|raw| parse_http_url("public-url", raw))
            .transpose()?;
        let default_origin = parse_http_url("bind", &format!("http://{}", bind_addr))?;

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                field: "request-timeout-secs",
            });
        }
        if args.max_upload_mb == 0 {
            return Err(ConfigError::Zero {
                field: "max-upload-mb",
            });
        }
        if args.session_max_age_secs == 0 {
            return Err(ConfigError::Zero {
                field: "session-max-age-secs",
            });
        }

        let session_secret =
            resolve_session_secret(args.session_secret.as_deref(), args.environment)?;

        Ok(Self {
            bind_addr,
            api_url,
            default_origin,
            public_url,
            session_secret,
            environment: args.environment,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            connect_timeout: Duration::from_secs(
                DEFAULT_CONNECT_TIMEOUT_SECS.min(args.request_timeout_secs),
            ),
            max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
            session_max_age: chrono::Duration::seconds(i64::from(args.session_max_age_secs)),
        })
    }

    /// Session cookies are only marked `Secure` in production.
    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

fn parse_http_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Url {
        field,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::Url {
            field,
            value: raw.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    Ok(url)
}
