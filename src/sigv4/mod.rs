//! AWS Signature Version 4 request signing.
//!
//! Signs the one request shape this crate sends: a `POST` with `host`, `x-amz-content-sha256`
//! and `x-amz-date` headers and no query string.
//!
//! 1. Capture one [`TimeContext`] and render the timestamp and date stamp from it.
//! 2. Build the [`CanonicalRequest`] from the [`RequestFacts`].
//! 3. Derive the [`SigningKey`] for the [`Scope`].
//! 4. Sign the string to sign.
//! 5. Render the `Authorization` header and package the headers with the body.
//!
//! The entry point is [`RequestSigner::sign`].

pub mod canonical;
pub mod clock;
pub mod credential;
pub mod error;
pub mod hash;
pub mod key;
pub mod signature;

pub use canonical::{CanonicalRequest, RequestFacts};
pub use clock::TimeContext;
pub use error::SigningError;
pub use key::{Scope, SigningKey};

use canonical::{HOST, X_AMZ_CONTENT_SHA256, X_AMZ_DATE};
use credential::authorization_header;
use key::derive_signing_key;
use signature::{build_string_to_sign, compute_signature};
use std::fmt;
use tracing::debug;

/// An access key pair supplied with a single update. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Headers produced by signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub host: String,
    pub x_amz_date: String,
    pub x_amz_content_sha256: String,
}

impl SignedHeaders {
    /// Header name and value pairs, names lowercase.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("authorization", self.authorization.as_str()),
            (HOST, self.host.as_str()),
            (X_AMZ_DATE, self.x_amz_date.as_str()),
            (X_AMZ_CONTENT_SHA256, self.x_amz_content_sha256.as_str()),
        ]
    }
}

/// Everything the transport needs to send a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequestDescriptor {
    pub headers: SignedHeaders,
    pub body: Vec<u8>,
}

/// Signs requests for one region and service.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    region: String,
    service: String,
}

impl RequestSigner {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The scope a request signed at `time` is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::Timestamp`] if the date stamp can't be rendered.
    pub fn scope(&self, time: &TimeContext) -> Result<Scope, SigningError> {
        Ok(Scope {
            date_stamp: time.date_stamp()?,
            region: self.region.clone(),
            service: self.service.clone(),
        })
    }

    /// Sign `facts` with `credentials` as of `time`.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::MissingInput`] if a credential, the region, the service or a
    /// request fact is empty. Nothing is signed in that case.
    pub fn sign(
        &self,
        credentials: &Credentials,
        facts: RequestFacts,
        time: TimeContext,
    ) -> Result<SignedRequestDescriptor, SigningError> {
        self.check_inputs(credentials, &facts)?;

        let amz_date = time.amz_date()?;
        let scope = self.scope(&time)?;
        let credential_scope = scope.credential_scope();

        let canonical = CanonicalRequest::new(&facts, &amz_date);
        debug!(canonical_request = canonical.text(), "built canonical request");

        let string_to_sign = build_string_to_sign(&amz_date, &credential_scope, &canonical.digest());
        debug!(string_to_sign = %string_to_sign, "built string to sign");

        let key = derive_signing_key(&credentials.secret_access_key, &scope)?;
        let signature = compute_signature(&key, &string_to_sign)?;
        let authorization = authorization_header(
            &credentials.access_key_id,
            &credential_scope,
            canonical.signed_headers(),
            &signature,
        );

        Ok(SignedRequestDescriptor {
            headers: SignedHeaders {
                authorization,
                host: facts.host,
                x_amz_date: amz_date,
                x_amz_content_sha256: canonical.hashed_payload().to_owned(),
            },
            body: facts.payload,
        })
    }

    fn check_inputs(
        &self,
        credentials: &Credentials,
        facts: &RequestFacts,
    ) -> Result<(), SigningError> {
        let required: [(&'static str, &str); 7] = [
            ("access key id", credentials.access_key_id.as_str()),
            ("secret access key", credentials.secret_access_key.as_str()),
            ("region", self.region.as_str()),
            ("service", self.service.as_str()),
            ("method", facts.method.as_str()),
            ("path", facts.path.as_str()),
            ("host", facts.host.as_str()),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some(&(name, _)) => Err(SigningError::MissingInput(name)),
            None => Ok(()),
        }
    }
}
