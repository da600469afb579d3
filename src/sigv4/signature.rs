use crate::sigv4::error::SigningError;
use crate::sigv4::hash::hmac_sha256_hex;
use crate::sigv4::key::SigningKey;

/// The only signing algorithm this crate produces.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256\n
/// <amz_date>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
pub fn build_string_to_sign(
    amz_date: &str,
    credential_scope: &str,
    canonical_request_digest: &str,
) -> String {
    format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{canonical_request_digest}")
}

/// Sign `string_to_sign`, returning the lowercase hex signature.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKey`] if the MAC implementation rejects the key.
pub fn compute_signature(key: &SigningKey, string_to_sign: &str) -> Result<String, SigningError> {
    hmac_sha256_hex(key.as_bytes(), string_to_sign)
}
