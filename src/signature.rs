//! GitHub webhook signature verification.
//!
//! GitHub signs each delivery with HMAC-SHA256 over the exact request body and
//! sends the tag as `X-Hub-Signature-256: sha256=<hex>`. The body must be the
//! raw bytes as received; re-serialized JSON will not match.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::error::{RelayError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";
/// Hex length of a SHA-256 digest.
const SIGNATURE_HEX_LEN: usize = 64;

/// Verifies a GitHub webhook signature against the raw body.
///
/// Checks, in order: header present (401), body present (400), `sha256=`
/// prefix, digest length and lowercase hex (401), then a constant-time
/// comparison of the decoded tag (401). GitHub always sends lowercase hex, so
/// only the exact digest string verifies.
pub fn verify_github_signature(
    secret: &str,
    body: &[u8],
    signature_header: Option<&str>,
) -> Result<()> {
    let signature_header = signature_header.ok_or(RelayError::MissingSignature)?;

    if body.is_empty() {
        return Err(RelayError::MissingRawBody);
    }

    let git_signature = signature_header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or(RelayError::InvalidSignature)?;

    if git_signature.len() != SIGNATURE_HEX_LEN {
        debug!(
            "Signature length {} does not match expected {}",
            git_signature.len(),
            SIGNATURE_HEX_LEN
        );
        return Err(RelayError::InvalidSignature);
    }

    if !git_signature
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        return Err(RelayError::InvalidSignature);
    }

    let git_signature_bytes =
        hex::decode(git_signature).map_err(|_| RelayError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| RelayError::InvalidSignature)?;
    mac.update(body);

    // verify_slice compares in constant time
    mac.verify_slice(&git_signature_bytes)
        .map_err(|_| RelayError::InvalidSignature)
}

/// Computes the `sha256=<hex>` header value GitHub would send for `body`.
#[cfg(test)]
pub(crate) fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    )
}
