//! Caller identity as seen by the rest of the service.
//!
//! A request carries `Authorization: Bearer <token>`; the token is the user's
//! id. Parsing here is purely syntactic: whether the token names a real user is
//! decided by the active [`IdentityProvider`](super::providers::IdentityProvider).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::entities::user;

pub const MAX_TOKEN_LEN: usize = 256;

pub const MISSING_CREDENTIALS: &str = "Missing authorization header";
/// Shared by malformed and unknown tokens so callers cannot tell them apart.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenFormatError {
    #[error("authorization header is not visible ASCII")]
    NotAscii,
    #[error("authorization scheme must be Bearer")]
    WrongScheme,
    #[error("token is empty")]
    Empty,
    #[error("token contains whitespace")]
    Whitespace,
    #[error("token is longer than {MAX_TOKEN_LEN} bytes")]
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn parse(raw: &str) -> Result<Self, TokenFormatError> {
        if raw.is_empty() {
            return Err(TokenFormatError::Empty);
        }
        if raw.len() > MAX_TOKEN_LEN {
            return Err(TokenFormatError::TooLong);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(TokenFormatError::Whitespace);
        }
        if !raw.chars().all(|c| c.is_ascii_graphic()) {
            return Err(TokenFormatError::NotAscii);
        }
        Ok(Self(raw.to_string()))
    }

    /// Parses the value of an `Authorization` header.
    pub fn from_authorization(header: &str) -> Result<Self, TokenFormatError> {
        let header = header.trim();
        let (scheme, rest) = header.split_once(' ').unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(TokenFormatError::WrongScheme);
        }
        Self::parse(rest.trim())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A caller that passed the identity gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl From<user::Model> for AuthenticatedUser {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
        }
    }
}
