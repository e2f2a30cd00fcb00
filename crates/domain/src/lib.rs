//! Identity entities derived from identity-provider id_tokens.
//!
//! Decoding reads the token payload without verifying signatures, issuer,
//! audience or expiry. The resulting [`UserInformation`] is a display and
//! cache-key convenience, not a security decision.

#![forbid(unsafe_code)]

mod token;
mod user_id;
mod user_information;

pub use token::{ClaimMap, DecodedToken, decode_token};
pub use user_id::{UserId, normalize_user_id};
pub use user_information::UserInformation;
