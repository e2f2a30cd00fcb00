//! Compact id_token decoding.
//!
//! Only the payload segment is read. Signatures, issuer, audience and expiry
//! are never checked here.

use std::collections::BTreeMap;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use idkit_core::{IdentityError, IdentityResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// URL-safe base64 that accepts payloads with or without trailing padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const SEGMENT_COUNT: usize = 3;

/// Flat mapping of claim name to its string form, or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimMap(BTreeMap<String, Option<String>>);

impl ClaimMap {
    /// Returns the non-null value of a claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Option::as_deref)
    }

    /// Returns whether the payload carried the claim, including null values.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no claims were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates claims in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

impl FromIterator<(String, Option<String>)> for ClaimMap {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A raw compact token kept together with the claims decoded from it.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedToken {
    raw: String,
    claims: ClaimMap,
}

impl DecodedToken {
    /// Returns the token exactly as it was received.
    #[must_use]
    pub fn raw(&self) -> &str {
        self.raw.as_str()
    }

    /// Returns the decoded payload claims.
    #[must_use]
    pub fn claims(&self) -> &ClaimMap {
        &self.claims
    }

    pub(crate) fn into_parts(self) -> (String, ClaimMap) {
        (self.raw, self.claims)
    }
}

impl std::fmt::Debug for DecodedToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("DecodedToken")
            .field("raw", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Decodes the payload of a compact `header.payload.signature` token.
///
/// Fails with [`IdentityError::MalformedToken`] when the envelope is
/// invalid. Claim values of any JSON type are accepted: strings are kept
/// as-is, other scalars are stringified, nested arrays and objects are
/// stored as their compact JSON encoding.
pub fn decode_token(raw_token: &str) -> IdentityResult<DecodedToken> {
    let claims = decode_claims(raw_token)?;
    Ok(DecodedToken {
        raw: raw_token.to_owned(),
        claims,
    })
}

pub(crate) fn decode_claims(raw_token: &str) -> IdentityResult<ClaimMap> {
    if raw_token.trim().is_empty() {
        return Err(IdentityError::MalformedToken("id_token is empty".to_owned()));
    }

    let segments: Vec<&str> = raw_token.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(IdentityError::MalformedToken(format!(
            "expected {SEGMENT_COUNT} segments, found {}",
            segments.len()
        )));
    }

    let payload = segments[1];
    if payload.is_empty() {
        return Err(IdentityError::MalformedToken(
            "payload segment is empty".to_owned(),
        ));
    }

    let bytes = PAYLOAD_ENGINE.decode(payload).map_err(|error| {
        IdentityError::MalformedToken(format!("payload is not valid base64url: {error}"))
    })?;

    // serde_json keeps the last value for duplicate keys.
    let value: Value = serde_json::from_slice(&bytes).map_err(|error| {
        IdentityError::MalformedToken(format!("payload is not valid JSON: {error}"))
    })?;

    let Value::Object(members) = value else {
        return Err(IdentityError::MalformedToken(
            "payload must be a JSON object".to_owned(),
        ));
    };

    Ok(members
        .into_iter()
        .map(|(name, value)| (name, claim_value_to_string(value)))
        .collect())
}

fn claim_value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &str) -> String {
    let header = PAYLOAD_ENGINE.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = PAYLOAD_ENGINE.encode(payload);
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE;
    use idkit_core::{IdentityErrorKind, IdentityResult};

    use super::{decode_token, encode_test_token};

    #[test]
    fn decodes_string_claims_verbatim() -> IdentityResult<()> {
        let token = encode_test_token(r#"{"upn":"Jane@Contoso.com","tid":"tenant-1"}"#);
        let decoded = decode_token(token.as_str())?;

        assert_eq!(decoded.raw(), token);
        assert_eq!(decoded.claims().len(), 2);
        assert_eq!(decoded.claims().get("upn"), Some("Jane@Contoso.com"));
        assert_eq!(decoded.claims().get("tid"), Some("tenant-1"));
        Ok(())
    }

    #[test]
    fn stringifies_non_string_claims() -> IdentityResult<()> {
        let token = encode_test_token(
            r#"{"exp":1700000000,"ratio":1.5,"verified":true,"amr":["pwd","mfa"],"ctx":{"a":1},"nothing":null}"#,
        );
        let claims = decode_token(token.as_str())?.claims().clone();

        assert_eq!(claims.get("exp"), Some("1700000000"));
        assert_eq!(claims.get("ratio"), Some("1.5"));
        assert_eq!(claims.get("verified"), Some("true"));
        assert_eq!(claims.get("amr"), Some(r#"["pwd","mfa"]"#));
        assert_eq!(claims.get("ctx"), Some(r#"{"a":1}"#));
        assert_eq!(claims.get("nothing"), None);
        assert!(claims.contains("nothing"));
        Ok(())
    }

    #[test]
    fn accepts_padded_payloads() -> IdentityResult<()> {
        let payload = URL_SAFE.encode(r#"{"sub":"abc"}"#);
        assert!(payload.ends_with('='));

        let decoded = decode_token(format!("e30.{payload}.sig").as_str())?;
        assert_eq!(decoded.claims().get("sub"), Some("abc"));
        Ok(())
    }

    #[test]
    fn keeps_numbers_outside_native_range_verbatim() -> IdentityResult<()> {
        let token = encode_test_token(
            r#"{"upn":"a@b.com","huge":1e400,"wide":123456789012345678901234567890,"neg":-98765432109876543210.5}"#,
        );
        let decoded = decode_token(token.as_str())?;

        assert_eq!(decoded.claims().get("huge"), Some("1e400"));
        assert_eq!(
            decoded.claims().get("wide"),
            Some("123456789012345678901234567890")
        );
        assert_eq!(
            decoded.claims().get("neg"),
            Some("-98765432109876543210.5")
        );
        assert_eq!(decoded.claims().get("upn"), Some("a@b.com"));
        Ok(())
    }

    #[test]
    fn duplicate_keys_keep_last_value() -> IdentityResult<()> {
        let token = encode_test_token(r#"{"upn":"first@contoso.com","upn":"last@contoso.com"}"#);
        let decoded = decode_token(token.as_str())?;

        assert_eq!(decoded.claims().len(), 1);
        assert_eq!(decoded.claims().get("upn"), Some("last@contoso.com"));
        Ok(())
    }

    #[test]
    fn rejects_malformed_envelopes() {
        let cases = [
            String::new(),
            "   ".to_owned(),
            "only-one-segment".to_owned(),
            "two.segments".to_owned(),
            "a.b.c.d".to_owned(),
            "header..signature".to_owned(),
            "not.a.validpayload".to_owned(),
            "e30.!!!!.sig".to_owned(),
            encode_test_token("not json"),
            encode_test_token(r#"["upn"]"#),
            encode_test_token(r#""just a string""#),
        ];

        for case in cases {
            let result = decode_token(case.as_str());
            assert_eq!(
                result.map_err(|error| error.kind()).err(),
                Some(IdentityErrorKind::MalformedToken),
                "expected malformed token for {case:?}"
            );
        }
    }

    #[test]
    fn debug_output_hides_raw_token() -> IdentityResult<()> {
        let token = encode_test_token(r#"{"sub":"abc"}"#);
        let decoded = decode_token(token.as_str())?;

        assert!(!format!("{decoded:?}").contains(token.as_str()));
        Ok(())
    }
}
