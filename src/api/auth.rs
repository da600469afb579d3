use crate::api::api_error::APIError;
use crate::error::Error;
use crate::sigv4::Credentials;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::DecodePaddingMode;
use base64::{alphabet, engine, Engine};
use lazy_static::lazy_static;

lazy_static! {
    static ref BASE64_ENGINE: engine::GeneralPurpose = engine::GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
    );
}

/// The caller's AWS credentials, taken from an `Authorization: Basic` header.
///
/// The username is the access key id and the password is the secret access key. A request
/// without usable credentials is rejected before anything is signed.
pub(super) struct BasicAuth(pub Credentials);

#[axum::async_trait]
impl<S> FromRequestParts<S> for BasicAuth
where
    S: Send + Sync,
{
    type Rejection = APIError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(Error::MissingAuthorization)?
            .to_str()
            .map_err(|_| Error::MalformedAuthorization("header is not visible ASCII"))?;
        Ok(Self(credentials_from_basic(value)?))
    }
}

/// Parse an `Authorization` header value of the form `Basic base64(username:password)`.
///
/// The scheme is matched case-insensitively and the password may itself contain `:`.
pub(super) fn credentials_from_basic(value: &str) -> Result<Credentials, Error> {
    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(Error::MalformedAuthorization("expected \"Basic <credentials>\""))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(Error::MalformedAuthorization("scheme is not Basic"));
    }

    let decoded = BASE64_ENGINE
        .decode(encoded.trim())
        .map_err(|_| Error::MalformedAuthorization("invalid BASE64"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| Error::MalformedAuthorization("credentials are not UTF-8"))?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(Error::MalformedAuthorization("missing ':' separator"))?;
    if username.is_empty() || password.is_empty() {
        return Err(Error::MalformedAuthorization("empty username or password"));
    }

    Ok(Credentials {
        access_key_id: username.to_string(),
        secret_access_key: password.to_string(),
    })
}
