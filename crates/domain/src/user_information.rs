//! Immutable identity derived from an id_token or a bare userId.

mod record;


use std::hash::{Hash, Hasher};

use idkit_core::{IdentityError, IdentityResult, claims};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::token::{ClaimMap, DecodedToken, decode_token};
use crate::user_id::UserId;

use self::record::UserInformationRecord;

/// Details about the user that authorized resource usage.
///
/// Equality and hashing consider only [`UserInformation::user_id`], so the
/// entity can key a token cache. There are no setters: a different userId
/// means a different entity.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "UserInformationRecord", into = "UserInformationRecord")]
pub struct UserInformation {
    user_id: UserId,
    user_id_displayable: bool,
    raw_token: Option<String>,
    all_claims: Option<ClaimMap>,
    given_name: Option<String>,
    family_name: Option<String>,
    identity_provider: Option<String>,
    email: Option<String>,
    unique_name: Option<String>,
    upn: Option<String>,
    tenant_id: Option<String>,
    subject: Option<String>,
    user_object_id: Option<String>,
    guest_id: Option<String>,
}

impl UserInformation {
    /// Decodes an id_token and resolves the identity it describes.
    pub fn from_id_token(raw_token: &str) -> IdentityResult<Self> {
        Self::from_token(decode_token(raw_token)?)
    }

    /// Resolves an identity from an already decoded token.
    ///
    /// The userId is taken from the first of `upn`, `email`, `sub`, `oid`
    /// that normalizes to a non-empty value.
    pub fn from_token(token: DecodedToken) -> IdentityResult<Self> {
        let (raw_token, all_claims) = token.into_parts();

        let Some((source, user_id)) = claims::USER_ID_FALLBACK
            .into_iter()
            .find_map(|name| {
                let value = all_claims.get(name)?;
                UserId::new(value).ok().map(|user_id| (name, user_id))
            })
        else {
            return Err(IdentityError::NoUserIdentifierClaim(format!(
                "id_token carries none of the claims: {}",
                claims::USER_ID_FALLBACK.join(", ")
            )));
        };

        let user_id_displayable = source == claims::UPN || source == claims::EMAIL;
        debug!(
            user_id_claim = source,
            user_id_displayable,
            claim_count = all_claims.len(),
            "resolved user information from id_token"
        );

        let projection = |name: &str| all_claims.get(name).map(str::to_owned);
        Ok(Self {
            user_id,
            user_id_displayable,
            given_name: projection(claims::GIVEN_NAME),
            family_name: projection(claims::FAMILY_NAME),
            identity_provider: projection(claims::IDENTITY_PROVIDER),
            email: projection(claims::EMAIL),
            unique_name: projection(claims::UNIQUE_NAME),
            upn: projection(claims::UPN),
            tenant_id: projection(claims::TENANT_ID),
            subject: projection(claims::SUBJECT),
            user_object_id: projection(claims::OBJECT_ID),
            guest_id: projection(claims::GUEST_ID),
            raw_token: Some(raw_token),
            all_claims: Some(all_claims),
        })
    }

    /// Creates an identity from a caller-supplied userId.
    ///
    /// Fails with [`IdentityError::EmptyUserId`] when the value is blank.
    pub fn from_user_id(user_id: &str) -> IdentityResult<Self> {
        Ok(Self::bare(UserId::new(user_id)?))
    }

    /// Reconstructs an identity from its persisted JSON form.
    ///
    /// Every failure, including malformed JSON, is reported as
    /// [`IdentityError::DeserializationInvalid`].
    pub fn from_json(json: &str) -> IdentityResult<Self> {
        let record: UserInformationRecord = serde_json::from_str(json).map_err(|error| {
            IdentityError::DeserializationInvalid(format!("invalid identity JSON: {error}"))
        })?;

        Self::try_from(record)
    }

    fn bare(user_id: UserId) -> Self {
        Self {
            user_id,
            user_id_displayable: true,
            raw_token: None,
            all_claims: None,
            given_name: None,
            family_name: None,
            identity_provider: None,
            email: None,
            unique_name: None,
            upn: None,
            tenant_id: None,
            subject: None,
            user_object_id: None,
            guest_id: None,
        }
    }

    /// Returns the normalized identity key.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns whether the userId is a human-readable login such as a UPN or email.
    #[must_use]
    pub fn user_id_displayable(&self) -> bool {
        self.user_id_displayable
    }

    /// Returns the id_token this identity was decoded from.
    #[must_use]
    pub fn raw_token(&self) -> Option<&str> {
        self.raw_token.as_deref()
    }

    /// Returns every claim read from the id_token.
    #[must_use]
    pub fn all_claims(&self) -> Option<&ClaimMap> {
        self.all_claims.as_ref()
    }

    /// Looks up any decoded claim by name.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.all_claims.as_ref()?.get(name)
    }

    /// Returns the `given_name` claim.
    #[must_use]
    pub fn given_name(&self) -> Option<&str> {
        self.given_name.as_deref()
    }

    /// Returns the `family_name` claim.
    #[must_use]
    pub fn family_name(&self) -> Option<&str> {
        self.family_name.as_deref()
    }

    /// Returns the `idp` claim.
    #[must_use]
    pub fn identity_provider(&self) -> Option<&str> {
        self.identity_provider.as_deref()
    }

    /// Returns the `email` claim.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the `unique_name` claim.
    #[must_use]
    pub fn unique_name(&self) -> Option<&str> {
        self.unique_name.as_deref()
    }

    /// Returns the `upn` claim.
    #[must_use]
    pub fn upn(&self) -> Option<&str> {
        self.upn.as_deref()
    }

    /// Tenant the user signed in to. Differs from the home tenant for guests.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// Returns the `sub` claim.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Directory object id of the user.
    #[must_use]
    pub fn user_object_id(&self) -> Option<&str> {
        self.user_object_id.as_deref()
    }

    /// Alternate security id assigned to guest users.
    #[must_use]
    pub fn guest_id(&self) -> Option<&str> {
        self.guest_id.as_deref()
    }
}

impl PartialEq for UserInformation {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}

impl Eq for UserInformation {}

impl Hash for UserInformation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_id.hash(state);
    }
}

impl std::fmt::Debug for UserInformation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UserInformation")
            .field("user_id", &self.user_id)
            .field("user_id_displayable", &self.user_id_displayable)
            .field("raw_token", &self.raw_token.as_ref().map(|_| "<redacted>"))
            .field("all_claims", &self.all_claims)
            .field("given_name", &self.given_name)
            .field("family_name", &self.family_name)
            .field("identity_provider", &self.identity_provider)
            .field("email", &self.email)
            .field("unique_name", &self.unique_name)
            .field("upn", &self.upn)
            .field("tenant_id", &self.tenant_id)
            .field("subject", &self.subject)
            .field("user_object_id", &self.user_object_id)
            .field("guest_id", &self.guest_id)
            .finish()
    }
}
