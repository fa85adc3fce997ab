//! Secret handling utilities.
//!
//! Re-exports secrecy types and provides helpers for checking
//! secrets without exposing them.

pub use secrecy::{ExposeSecret, SecretString};

/// An unset secret. Secrets never get a non-empty default.
pub fn empty() -> SecretString {
    SecretString::from(String::new())
}

/// Whether the secret holds a value.
pub fn is_set(secret: &SecretString) -> bool {
    !secret.expose_secret().is_empty()
}
