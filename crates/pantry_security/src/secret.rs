//! Session signing secret and deployment environment.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Only ever used when running in development without a configured secret.
pub const DEV_SESSION_SECRET: &str = "dev-secret-min-32-chars-for-pantry-session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(SecretError::UnknownEnvironment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error(
        "session secret is not configured; set PANTRY_SESSION_SECRET when running in production"
    )]
    Missing,
    #[error("unknown environment '{0}' (expected development or production)")]
    UnknownEnvironment(String),
}

/// HMAC key for session tokens. `Debug` never prints the value.
#[derive(Clone)]
pub struct SessionSecret(Vec<u8>);

impl SessionSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionSecret(<{} bytes>)", self.0.len())
    }
}

/// Pick the signing secret. Blank counts as unset; unset is only tolerated
/// in development, where a fixed dev secret is substituted.
pub fn resolve_session_secret(
    configured: Option<&str>,
    environment: Environment,
) -> Result<SessionSecret, SecretError> {
    match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(secret) => Ok(SessionSecret::new(secret.as_bytes())),
        None if environment.is_production() => Err(SecretError::Missing),
        None => {
            tracing::warn!("No session secret configured, using the development secret");
            Ok(SessionSecret::new(DEV_SESSION_SECRET.as_bytes()))
        }
    }
}
