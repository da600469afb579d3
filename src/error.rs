//! Error types.

use crate::sigv4::SigningError;
use std::net::IpAddr;

/// Error enumerates the possible dyncrab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when a client calls the [`/update` API endpoint][crate::api#update-get-or-post]
    /// without an `Authorization` header.
    #[error("missing Basic authorization")]
    MissingAuthorization,

    /// Returned when the `Authorization` header isn't usable Basic credentials: another scheme,
    /// invalid BASE64, no `:` separator, or an empty username or password.
    #[error("malformed Basic authorization: {0}")]
    MalformedAuthorization(&'static str),

    /// Returned when a required query parameter is absent or empty.
    #[error("missing query parameter \"{0}\"")]
    MissingParameter(&'static str),

    /// Returned when a query parameter is present but can't describe an A record change.
    #[error("invalid query parameter \"{name}\": {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Returned when the change request couldn't be signed. Nothing is sent.
    #[error("could not sign change request")]
    Signing(#[from] SigningError),

    /// Returned when the change request never got a response from Route 53.
    #[error("change request failed: {0}")]
    Transmission(String),

    /// Returned when Route 53 answers the change request with a non-success status, e.g. for a
    /// signature mismatch or an expired timestamp.
    #[error("Route 53 rejected the change (HTTP {status}): {detail}")]
    ProviderRejected { status: u16, detail: String },

    /// Returned when the configured `api_bind_addr` is not a loopback or private address.
    ///
    /// The [`/update` API endpoint][crate::api#update-get-or-post] receives AWS secret keys
    /// as Basic credentials over plain HTTP.
    #[error("API bind address ({0}) must be a loopback or private IP")]
    InsecureAPIBind(IpAddr),

    /// Returned when a loaded [`Config`][crate::config::Config] is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [trying to load a `Config`][crate::config::Config::try_from_file] fails
    /// due to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error means the caller's authentication input was missing or unusable.
    pub fn is_auth_input(&self) -> bool {
        matches!(
            self,
            Error::MissingAuthorization
                | Error::MalformedAuthorization(_)
                | Error::MissingParameter(_)
                | Error::InvalidParameter { .. }
        )
    }
}
