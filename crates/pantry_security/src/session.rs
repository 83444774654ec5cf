//! Signed session tokens (HS256 JWT).

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pantry_ids::{PantryId, SessionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::Identity;
use crate::secret::SessionSecret;

pub const SESSION_COOKIE: &str = "pantry.session-token";

#[cfg(test)]
pub(crate) fn default_max_age() -> Duration {
    Duration::days(30)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("failed to sign session token: {0}")]
    Encode(String),
    #[error("session token expired")]
    Expired,
    #[error("invalid session token: {0}")]
    Invalid(String),
    #[error("session token has bad claims: {0}")]
    Claims(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    name: String,
    email: String,
    #[serde(rename = "pantryId", default, skip_serializing_if = "Option::is_none")]
    pantry_id: Option<String>,
    sid: String,
    iat: i64,
    exp: i64,
}

/// Read-only view of the signed-in volunteer, handed to every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub pantry_id: Option<PantryId>,
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    max_age: Duration,
}

impl SessionKeys {
    pub fn new(secret: &SessionSecret, max_age: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Mint a token for a freshly verified identity.
    pub fn issue(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<(String, Session), TokenError> {
        // whole seconds, as stored in the token
        let exp = (now + self.max_age).timestamp();
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| TokenError::Encode(format!("exp out of range: {}", exp)))?;
        let session = Session {
            user_id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            pantry_id: identity.pantry_id.clone(),
            session_id: SessionId::new(),
            expires_at,
        };
        let claims = SessionClaims {
            sub: session.user_id.clone(),
            name: session.name.clone(),
            email: session.email.clone(),
            pantry_id: session.pantry_id.as_ref().map(|p| p.to_string()),
            sid: session.session_id.to_string(),
            iat: now.timestamp(),
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))?;
        Ok((token, session))
    }

    pub fn verify(&self, token: &str) -> Result<Session, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            },
        )?;
        let claims = data.claims;

        let pantry_id = claims
            .pantry_id
            .as_deref()
            .map(PantryId::parse)
            .transpose()
            .map_err(|e| TokenError::Claims(e.to_string()))?;
        let session_id =
            SessionId::parse(&claims.sid).map_err(|e| TokenError::Claims(e.to_string()))?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| TokenError::Claims(format!("exp out of range: {}", claims.exp)))?;

        Ok(Session {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            pantry_id,
            session_id,
            expires_at,
        })
    }
}
