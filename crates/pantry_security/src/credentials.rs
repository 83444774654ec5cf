//! Credential verification.
//!
//! Real user lookup is not wired yet; [`StaticCredentials`] accepts a single
//! configured identity pair and scopes it to the pantry named by the username.

use pantry_ids::PantryId;

/// Who signed in, as attached to the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub pantry_id: Option<PantryId>,
}

pub trait CredentialVerifier: Send + Sync {
    /// `None` means the credentials were rejected.
    fn verify(&self, username: &str, password: &str) -> Option<Identity>;
}

#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new("admin", "password")
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<Identity> {
        if username.is_empty() || password.is_empty() {
            return None;
        }
        if username != self.username || password != self.password {
            return None;
        }
        Some(Identity {
            id: "1".to_string(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            pantry_id: PantryId::parse(username).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pair_accepted() {
        let identity = StaticCredentials::default().verify("admin", "password").unwrap();
        assert_eq!(identity.name, "Admin");
        assert_eq!(identity.pantry_id.unwrap().as_str(), "admin");
    }

    #[test]
    fn test_rejections() {
        let verifier = StaticCredentials::default();
        assert!(verifier.verify("admin", "wrong").is_none());
        assert!(verifier.verify("someone", "password").is_none());
        assert!(verifier.verify("", "").is_none());
    }

    #[test]
    fn test_custom_pair() {
        let verifier = StaticCredentials::new("p123", "hunter2");
        let identity = verifier.verify("p123", "hunter2").unwrap();
        assert_eq!(identity.pantry_id.unwrap().as_str(), "p123");
    }
}
