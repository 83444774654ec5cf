//! Pantry review security module.
//!
//! Provides:
//! - **Session**: HS256 session tokens carried in the session cookie
//! - **Gate**: which paths need a session, and where to send those without one
//! - **Credentials**: sign-in verification behind [`CredentialVerifier`]
//! - **Secret**: signing secret resolution per deployment environment

pub mod credentials;
pub mod gate;
pub mod secret;
pub mod session;

pub use credentials::{CredentialVerifier, Identity, StaticCredentials};
pub use gate::{evaluate, is_public_path, login_redirect, safe_return_target, GateDecision};
pub use secret::{resolve_session_secret, Environment, SecretError, SessionSecret};
pub use session::{Session, SessionKeys, TokenError, SESSION_COOKIE};
