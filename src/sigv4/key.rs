//! Signing key derivation.
//!
//! ```text
//! kDate    = HMAC("AWS4" + secret, date_stamp)
//! kRegion  = HMAC(kDate, region)
//! kService = HMAC(kRegion, service)
//! kSigning = HMAC(kService, "aws4_request")
//! ```
//!
//! Every intermediate key is raw bytes. Only the final signature is hex encoded.

use crate::sigv4::error::SigningError;
use crate::sigv4::hash::hmac_sha256;
use std::fmt;

/// Prefix joined to the secret access key to seed the chain.
const KEY_PREFIX: &str = "AWS4";

/// Final label of the chain and last component of every credential scope.
pub const TERMINATOR: &str = "aws4_request";

/// The date, region and service a signature is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// `YYYYMMDD`
    pub date_stamp: String,
    pub region: String,
    pub service: String,
}

impl Scope {
    /// `date_stamp/region/service/aws4_request`
    pub fn credential_scope(&self) -> String {
        format!(
            "{}/{}/{}/{TERMINATOR}",
            self.date_stamp, self.region, self.service
        )
    }
}

/// The key that signs the string to sign. Valid for exactly one [`Scope`].
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(** redacted **)")
    }
}

/// Every key produced along the derivation chain.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyChain {
    pub date: [u8; 32],
    pub region: [u8; 32],
    pub service: [u8; 32],
    pub signing: SigningKey,
}

/// Run the derivation chain for `scope`, keeping each intermediate key.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKey`] if any HMAC step rejects its key.
pub fn derive_key_chain(secret_access_key: &str, scope: &Scope) -> Result<KeyChain, SigningError> {
    let labels = [
        scope.date_stamp.as_str(),
        scope.region.as_str(),
        scope.service.as_str(),
        TERMINATOR,
    ];
    let mut keys = [[0_u8; 32]; 4];
    let seed = format!("{KEY_PREFIX}{secret_access_key}").into_bytes();

    labels
        .iter()
        .zip(keys.iter_mut())
        .try_fold(seed, |key, (label, derived)| {
            *derived = hmac_sha256(&key, *label)?;
            Ok::<_, SigningError>(derived.to_vec())
        })?;

    let [date, region, service, signing] = keys;
    Ok(KeyChain {
        date,
        region,
        service,
        signing: SigningKey(signing),
    })
}

/// Derive the signing key for `scope`.
///
/// # Errors
///
/// Returns [`SigningError::InvalidKey`] if any HMAC step rejects its key.
pub fn derive_signing_key(
    secret_access_key: &str,
    scope: &Scope,
) -> Result<SigningKey, SigningError> {
    Ok(derive_key_chain(secret_access_key, scope)?.signing)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";

    fn scope(region: &str, service: &str) -> Scope {
        Scope {
            date_stamp: "20150830".to_owned(),
            region: region.to_owned(),
            service: service.to_owned(),
        }
    }

    #[test]
    fn test_should_derive_signing_key_matching_aws_iam_vector() {
        // Published example; note the '+' in this secret.
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            &scope("us-east-1", "iam"),
        )
        .unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }

    #[test]
    fn test_should_derive_frozen_route53_chain() {
        let chain = derive_key_chain(SECRET, &scope("us-east-1", "route53")).unwrap();
        assert_eq!(
            hex::encode(chain.date),
            "68a9e4535ffbb09dcb6d25807a9ba5e3aef7cd00b3c57ed4b0c4a04988649f51"
        );
        assert_eq!(
            hex::encode(chain.signing.as_bytes()),
            "30824f18d307e7aa3379d16975e12aa45fd046f2e4bf22fbda3e02643971fb5e"
        );
    }

    #[test]
    fn test_should_keep_date_key_when_region_changes() {
        let east = derive_key_chain(SECRET, &scope("us-east-1", "route53")).unwrap();
        let west = derive_key_chain(SECRET, &scope("us-west-2", "route53")).unwrap();

        assert_eq!(east.date, west.date);
        assert_ne!(east.region, west.region);
        assert_ne!(east.service, west.service);
        assert_ne!(east.signing, west.signing);
    }

    #[test]
    fn test_should_chain_raw_bytes_not_hex() {
        let chain = derive_key_chain(SECRET, &scope("us-east-1", "route53")).unwrap();
        let region = hmac_sha256(chain.date, "us-east-1").unwrap();
        let hex_keyed = hmac_sha256(hex::encode(chain.date), "us-east-1").unwrap();
        assert_eq!(chain.region, region);
        assert_ne!(chain.region, hex_keyed);
    }

    #[test]
    fn test_should_render_credential_scope() {
        assert_eq!(
            scope("us-east-1", "route53").credential_scope(),
            "20150830/us-east-1/route53/aws4_request"
        );
    }

    #[test]
    fn test_should_redact_signing_key_debug() {
        let key = derive_signing_key(SECRET, &scope("us-east-1", "route53")).unwrap();
        assert_eq!(format!("{key:?}"), "SigningKey(** redacted **)");
    }
}
