use idkit_core::IdentityError;
use serde::{Deserialize, Serialize};

use crate::token::{ClaimMap, decode_claims};
use crate::user_id::UserId;

use super::UserInformation;

/// Persisted form of [`UserInformation`]. Every field is re-validated on the
/// way back in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserInformationRecord {
    #[serde(default)]
    pub(super) user_id: Option<String>,
    #[serde(default = "default_user_id_displayable")]
    pub(super) user_id_displayable: bool,
    pub(super) raw_token: Option<String>,
    pub(super) all_claims: Option<ClaimMap>,
    pub(super) given_name: Option<String>,
    pub(super) family_name: Option<String>,
    pub(super) identity_provider: Option<String>,
    pub(super) email: Option<String>,
    pub(super) unique_name: Option<String>,
    pub(super) upn: Option<String>,
    pub(super) tenant_id: Option<String>,
    pub(super) subject: Option<String>,
    pub(super) user_object_id: Option<String>,
    pub(super) guest_id: Option<String>,
}

fn default_user_id_displayable() -> bool {
    true
}

impl From<UserInformation> for UserInformationRecord {
    fn from(value: UserInformation) -> Self {
        Self {
            user_id: Some(value.user_id.into()),
            user_id_displayable: value.user_id_displayable,
            raw_token: value.raw_token,
            all_claims: value.all_claims,
            given_name: value.given_name,
            family_name: value.family_name,
            identity_provider: value.identity_provider,
            email: value.email,
            unique_name: value.unique_name,
            upn: value.upn,
            tenant_id: value.tenant_id,
            subject: value.subject,
            user_object_id: value.user_object_id,
            guest_id: value.guest_id,
        }
    }
}

impl TryFrom<UserInformationRecord> for UserInformation {
    type Error = IdentityError;

    fn try_from(record: UserInformationRecord) -> Result<Self, Self::Error> {
        let user_id = match record.user_id.as_deref().map(UserId::new) {
            Some(Ok(user_id)) => user_id,
            _ => {
                return Err(IdentityError::DeserializationInvalid(
                    "userId is missing or empty".to_owned(),
                ));
            }
        };

        let all_claims = match record.raw_token.as_deref() {
            Some(raw_token) => {
                let decoded = decode_claims(raw_token).map_err(|error| {
                    IdentityError::DeserializationInvalid(format!(
                        "rawToken cannot be decoded: {}",
                        error.message()
                    ))
                })?;

                if record
                    .all_claims
                    .as_ref()
                    .is_some_and(|stored| *stored != decoded)
                {
                    return Err(IdentityError::DeserializationInvalid(
                        "allClaims does not match the rawToken payload".to_owned(),
                    ));
                }

                Some(decoded)
            }
            None => record.all_claims,
        };

        Ok(Self {
            user_id,
            user_id_displayable: record.user_id_displayable,
            raw_token: record.raw_token,
            all_claims,
            given_name: record.given_name,
            family_name: record.family_name,
            identity_provider: record.identity_provider,
            email: record.email,
            unique_name: record.unique_name,
            upn: record.upn,
            tenant_id: record.tenant_id,
            subject: record.subject,
            user_object_id: record.user_object_id,
            guest_id: record.guest_id,
        })
    }
}
