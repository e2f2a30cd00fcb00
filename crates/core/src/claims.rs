//! Claim key names are an external contract with the identity provider and
//! must match the issued id_token verbatim.

/// User principal name.
pub const UPN: &str = "upn";
/// Email address.
pub const EMAIL: &str = "email";
/// Subject identifier.
pub const SUBJECT: &str = "sub";
/// Directory object id of the user.
pub const OBJECT_ID: &str = "oid";
/// Given name.
pub const GIVEN_NAME: &str = "given_name";
/// Family name.
pub const FAMILY_NAME: &str = "family_name";
/// Identity provider that authenticated the user.
pub const IDENTITY_PROVIDER: &str = "idp";
/// Unique name, usually a displayable login.
pub const UNIQUE_NAME: &str = "unique_name";
/// Tenant id.
pub const TENANT_ID: &str = "tid";
/// Alternate security id used for guest users.
pub const GUEST_ID: &str = "altsecid";

/// Claims consulted for the userId, in priority order.
pub const USER_ID_FALLBACK: [&str; 4] = [UPN, EMAIL, SUBJECT, OBJECT_ID];
