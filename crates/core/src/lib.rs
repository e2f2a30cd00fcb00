//! Shared primitives for all Rust crates in idkit.

#![forbid(unsafe_code)]

/// Claim keys issued by the identity provider.
pub mod claims;

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// Result type used across idkit crates.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Stable category of an [`IdentityError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityErrorKind {
    /// The compact token envelope is structurally invalid.
    MalformedToken,
    /// The payload decoded but carries no recognized identifier claim.
    NoUserIdentifierClaim,
    /// An explicit userId is empty after normalization.
    EmptyUserId,
    /// A persisted identity could not be reconstructed.
    DeserializationInvalid,
}

impl IdentityErrorKind {
    /// Returns the stable snake_case code for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedToken => "malformed_token",
            Self::NoUserIdentifierClaim => "no_user_identifier_claim",
            Self::EmptyUserId => "empty_user_id",
            Self::DeserializationInvalid => "deserialization_invalid",
        }
    }
}

impl Display for IdentityErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors produced while decoding tokens or resolving identities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Segment count, base64 payload or JSON shape is invalid.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// None of `upn`, `email`, `sub` or `oid` carries a usable value.
    #[error("no user identifier claim: {0}")]
    NoUserIdentifierClaim(String),

    /// The supplied userId normalizes to an empty string.
    #[error("empty user id: {0}")]
    EmptyUserId(String),

    /// Persisted form is missing data or violates an entity invariant.
    #[error("invalid persisted identity: {0}")]
    DeserializationInvalid(String),
}

impl IdentityError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> IdentityErrorKind {
        match self {
            Self::MalformedToken(_) => IdentityErrorKind::MalformedToken,
            Self::NoUserIdentifierClaim(_) => IdentityErrorKind::NoUserIdentifierClaim,
            Self::EmptyUserId(_) => IdentityErrorKind::EmptyUserId,
            Self::DeserializationInvalid(_) => IdentityErrorKind::DeserializationInvalid,
        }
    }

    /// Returns the human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::MalformedToken(message)
            | Self::NoUserIdentifierClaim(message)
            | Self::EmptyUserId(message)
            | Self::DeserializationInvalid(message) => message.as_str(),
        }
    }
}
