//! HTTP API for dynamic DNS updates.
//!
//! # API Endpoints
//!
//! ## `/healthcheck` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the service is operational.
//!
//! ## `/update` (GET or POST)
//!
//!   Expects the query parameters `hostedZoneId`, `hostname` and `ip`, and an `Authorization`
//!   header carrying the caller's AWS credentials as Basic credentials:
//!
//!   ```text
//!   GET /update?hostedZoneId=Z111&hostname=home.example.com&ip=203.0.113.9
//!   Authorization: Basic base64(<access key id>:<secret access key>)
//!   ```
//!
//!  The `hostname` A record in the hosted zone is set to `ip` with a signed Route 53
//!  `ChangeResourceRecordSets` UPSERT. The credentials are used for that one request and are
//!  never stored.
//!
//!  For successful updates, returns HTTP 200 (OK) and the plain text body `success`.
//!
//!  Errors are returned with a JSON body of the form `{"error": "..."}`:
//!
//!  * HTTP 403 (Forbidden) when the credentials or a parameter are missing or malformed.
//!    Nothing is signed or sent.
//!  * HTTP 500 (Internal Server Error) when the change request can't be signed.
//!  * HTTP 502 (Bad Gateway) when Route 53 can't be reached or rejects the change.

mod api_error;
mod auth;
mod model;
mod routes;
pub mod server;

pub use server::new;
