use std::fmt::{Display, Formatter};

use idkit_core::{IdentityError, IdentityResult};
use serde::Serialize;

/// Canonicalizes a userId: trims surrounding whitespace and lowercases it.
///
/// Lowercasing uses Unicode default case mapping, independent of locale.
/// A missing userId is normalized by passing an empty string.
#[must_use]
pub fn normalize_user_id(user_id: &str) -> String {
    user_id.trim().to_lowercase()
}

/// Normalized, non-empty user identifier used as the identity key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Normalizes and validates a user identifier.
    pub fn new(value: impl AsRef<str>) -> IdentityResult<Self> {
        let normalized = normalize_user_id(value.as_ref());
        if normalized.is_empty() {
            return Err(IdentityError::EmptyUserId(
                "user id must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use idkit_core::IdentityErrorKind;

    use super::{UserId, normalize_user_id};

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_user_id(" Foo@Bar.com "), "foo@bar.com");
        assert_eq!(normalize_user_id("\tJOHN@CONTOSO.COM\n"), "john@contoso.com");
        assert_eq!(normalize_user_id("ÉLODIE@Example.FR"), "élodie@example.fr");
    }

    #[test]
    fn empty_input_normalizes_to_empty_string() {
        assert_eq!(normalize_user_id(""), "");
        assert_eq!(normalize_user_id(" \t "), "");
    }

    #[test]
    fn user_id_rejects_blank_values() {
        for value in ["", "   ", "\n\t"] {
            let result = UserId::new(value);
            assert_eq!(
                result.map_err(|error| error.kind()).err(),
                Some(IdentityErrorKind::EmptyUserId)
            );
        }
    }
}
