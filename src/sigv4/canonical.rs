//! Canonical request construction.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Signed requests always carry the same three headers, `host`, `x-amz-content-sha256` and
//! `x-amz-date`. They are still sorted by name before rendering, and the header block and the
//! signed-header list are built from the same sorted sequence so the two cannot disagree.

use crate::sigv4::hash::sha256_hex;

/// Name of the header carrying the hex SHA-256 of the request body.
pub const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

/// Name of the header carrying the signing timestamp.
pub const X_AMZ_DATE: &str = "x-amz-date";

/// Name of the host header.
pub const HOST: &str = "host";

/// The facts about an outbound request that the signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFacts {
    pub method: String,
    /// Request path, already percent-encoded. A trailing slash is significant.
    pub path: String,
    pub host: String,
    pub payload: Vec<u8>,
}

/// A rendered canonical request together with the pieces the signer and the outbound headers
/// need again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    text: String,
    hashed_payload: String,
    signed_headers: String,
}

impl CanonicalRequest {
    /// Canonicalize `facts` for a request stamped with `amz_date` (`YYYYMMDDTHHMMSSZ`).
    pub fn new(facts: &RequestFacts, amz_date: &str) -> Self {
        let hashed_payload = sha256_hex(&facts.payload);

        let mut headers = [
            (HOST, facts.host.as_str()),
            (X_AMZ_CONTENT_SHA256, hashed_payload.as_str()),
            (X_AMZ_DATE, amz_date),
        ];
        headers.sort_unstable_by_key(|(name, _)| *name);
        let names: Vec<&str> = headers.iter().map(|(name, _)| *name).collect();

        let text = build_canonical_request(
            &facts.method,
            &facts.path,
            "",
            &headers,
            &names,
            &hashed_payload,
        );
        let signed_headers = build_signed_headers(&names);

        Self {
            text,
            hashed_payload,
            signed_headers,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hex SHA-256 of the body, also sent as `x-amz-content-sha256`.
    pub fn hashed_payload(&self) -> &str {
        &self.hashed_payload
    }

    /// `;`-joined lowercase header names, in canonical order.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Hex SHA-256 of the canonical request text, the last line of the string to sign.
    pub fn digest(&self) -> String {
        sha256_hex(&self.text)
    }
}

/// Render a canonical request from explicit parts.
///
/// `headers` are rendered in the order given and `signed_headers` are joined in the order
/// given. The receiver rebuilds both from the signed-header list, so the two must agree.
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query_string: &str,
    headers: &[(&str, &str)],
    signed_headers: &[&str],
    hashed_payload: &str,
) -> String {
    let header_block: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name.to_ascii_lowercase(), value.trim()))
        .collect();
    let signed_headers = build_signed_headers(signed_headers);

    format!("{method}\n{path}\n{query_string}\n{header_block}\n{signed_headers}\n{hashed_payload}")
}

/// Join header names into the `SignedHeaders` list.
pub fn build_signed_headers(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(";")
}
