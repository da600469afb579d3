//! DynCrab
//!
//! A small dynamic DNS endpoint for [Amazon Route 53].
//!
//! Clients call `/update` with their own AWS access key pair as Basic credentials, and DynCrab
//! upserts an A record with a `ChangeResourceRecordSets` call signed by its own
//! [AWS Signature Version 4][SigV4] implementation. Credentials are used for that one request
//! and never stored.
//!
//! [Amazon Route 53]: https://aws.amazon.com/route53/
//! [SigV4]: https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv.html
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod route53;
pub mod sigv4;

pub use api::new as new_http;
pub use config::{Config, SharedConfig};
pub use route53::{upserter_from_config, DynUpserter, RecordChange, RecordUpserter};
pub use sigv4::{Credentials, RequestSigner};
