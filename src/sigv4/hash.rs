//! SHA-256 digests and HMAC-SHA256, the only primitives the signing chain is built on.
//!
//! Keys and messages are accepted as text or raw bytes. The key-derivation chain feeds text
//! labels in as messages and raw intermediate keys back in as keys.

use crate::sigv4::error::SigningError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 of `data`.
pub fn sha256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Sha256::digest(data.as_ref()).into()
}

/// SHA-256 of `data`, rendered as lowercase hex.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(sha256(data))
}

/// HMAC-SHA256 of `message` under `key`, as raw bytes.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKey`] if the MAC implementation rejects the key.
pub fn hmac_sha256(
    key: impl AsRef<[u8]>,
    message: impl AsRef<[u8]>,
) -> Result<[u8; 32], SigningError> {
    let mut mac =
        HmacSha256::new_from_slice(key.as_ref()).map_err(|_| SigningError::InvalidKey)?;
    mac.update(message.as_ref());
    Ok(mac.finalize().into_bytes().into())
}

/// HMAC-SHA256 of `message` under `key`, rendered as lowercase hex.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKey`] if the MAC implementation rejects the key.
pub fn hmac_sha256_hex(
    key: impl AsRef<[u8]>,
    message: impl AsRef<[u8]>,
) -> Result<String, SigningError> {
    Ok(hex::encode(hmac_sha256(key, message)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_hash_empty_payload() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_should_hash_text_and_bytes_identically() {
        assert_eq!(sha256("dyncrab"), sha256(b"dyncrab".as_slice()));
        assert_eq!(sha256_hex("dyncrab"), sha256_hex(b"dyncrab".to_vec()));
    }

    #[test]
    fn test_should_match_rfc4231_hmac_vector() {
        // RFC 4231, test case 2.
        assert_eq!(
            hmac_sha256_hex("Jefe", "what do ya want for nothing?").unwrap(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_should_render_lowercase_hex() {
        let mac = hmac_sha256_hex(b"key".as_slice(), "message").unwrap();
        assert_eq!(mac.len(), 64);
        assert!(mac.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_eq!(mac, hex::encode(hmac_sha256("key", b"message").unwrap()));
    }
}
