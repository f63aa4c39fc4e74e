//! Canonicalization and hashing of user identifiers.
//!
//! Google Ads matches uploaded conversions to users through SHA-256 digests
//! of canonicalized identifiers, so the exact byte sequence fed to the hash
//! matters: `Test.User@GMAIL.com` and `testuser@gmail.com` must digest to
//! the same value. The rules here mirror what the upload API documents.

use sha2::{Digest, Sha256};

use crate::error::ConnectorError;

/// Domains whose local part ignores dots.
const GOOGLE_MAIL_DOMAINS: [&str; 2] = ["gmail.com", "googlemail.com"];

/// Hex length of a SHA-256 digest.
const HASHED_HEX_LEN: usize = 64;

/// Whether a value is already a SHA-256 digest. Upstream sources sometimes
/// hash identifiers before they ever reach the platform; those must be
/// passed through verbatim instead of being hashed a second time.
pub fn is_prehashed(value: &str) -> bool {
    value.len() == HASHED_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Canonicalize an email address: trim, lower-case, and drop dots from the
/// local part on the dot-insensitive Google mail domains. Anything without
/// exactly one `@` separating non-empty parts is rejected.
pub fn normalize_email(raw: &str) -> Result<String, ConnectorError> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@').ok_or(ConnectorError::InvalidEmail)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConnectorError::InvalidEmail);
    }

    if GOOGLE_MAIL_DOMAINS.contains(&domain) {
        Ok(format!("{}@{}", local.replace('.', ""), domain))
    } else {
        Ok(email)
    }
}

/// Canonicalize a phone number: keep digits only, which also strips a
/// leading `+`. No length validation beyond requiring at least one digit.
pub fn normalize_phone(raw: &str) -> Result<String, ConnectorError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ConnectorError::InvalidPhone);
    }
    Ok(digits)
}

/// SHA-256 of the UTF-8 bytes, lower-case hex.
pub fn hash_identifier(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hash an identifier unless it already is a digest.
pub fn smart_hash(
    value: &str,
    normalize: impl Fn(&str) -> Result<String, ConnectorError>,
) -> Result<String, ConnectorError> {
    if is_prehashed(value) {
        return Ok(value.to_owned());
    }
    Ok(hash_identifier(&normalize(value)?))
}
