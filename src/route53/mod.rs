//! Route 53 record changes.
//!
//! An accepted update becomes a [`RecordChange`], which a [`RecordUpserter`] applies. The
//! [`SignedUpserter`] signs the `ChangeResourceRecordSets` call with [`crate::sigv4`] and sends
//! it; the [`DryRunUpserter`] signs it and only logs what it would have sent.

use crate::config::{Config, UpsertStrategy};
use crate::error::Error;
use crate::sigv4::{Credentials, RequestFacts, RequestSigner, SignedRequestDescriptor, TimeContext};
use std::sync::Arc;

pub mod change;
pub mod upsert;

pub use change::RecordChange;
pub use upsert::{DryRunUpserter, DynUpserter, RecordUpserter, SignedUpserter};

/// Signing name of the Route 53 API.
pub const SERVICE: &str = "route53";

/// API version segment of every Route 53 request path.
pub const API_VERSION: &str = "2013-04-01";

/// A signed change request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedChange {
    pub url: String,
    pub descriptor: SignedRequestDescriptor,
}

/// Where change requests go, the signer scoped to that endpoint, and the clock that stamps
/// each request.
#[derive(Debug, Clone)]
pub struct Route53Endpoint {
    host: String,
    signer: RequestSigner,
    clock: fn() -> TimeContext,
}

impl Route53Endpoint {
    pub fn new(host: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            signer: RequestSigner::new(region, SERVICE),
            clock: TimeContext::now,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.endpoint_host.clone(), config.region())
    }

    /// Stamp requests with `clock` instead of the system time.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> TimeContext) -> Self {
        self.clock = clock;
        self
    }

    pub fn region(&self) -> &str {
        self.signer.region()
    }

    /// Path of the `ChangeResourceRecordSets` call for the change's hosted zone.
    pub fn change_path(&self, change: &RecordChange) -> String {
        format!(
            "/{API_VERSION}/hostedzone/{}/rrset/",
            change.hosted_zone_id()
        )
    }

    /// Build and sign the change request as of `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signing`] if the request can't be signed.
    pub fn prepare(
        &self,
        credentials: &Credentials,
        change: &RecordChange,
        time: TimeContext,
    ) -> Result<PreparedChange, Error> {
        let path = self.change_path(change);
        let url = format!("https://{}{path}", self.host);
        let facts = RequestFacts {
            method: "POST".to_string(),
            path,
            host: self.host.clone(),
            payload: change.to_xml().into_bytes(),
        };
        let descriptor = self.signer.sign(credentials, facts, time)?;
        Ok(PreparedChange { url, descriptor })
    }

    /// [`Self::prepare`] stamped with one fresh reading of the endpoint's clock.
    ///
    /// # Errors
    ///
    /// See [`Self::prepare`].
    pub fn prepare_now(
        &self,
        credentials: &Credentials,
        change: &RecordChange,
    ) -> Result<PreparedChange, Error> {
        self.prepare(credentials, change, (self.clock)())
    }
}

/// Build the upserter selected by [`Config::upsert_strategy`].
///
/// # Errors
///
/// Returns [`Error::Transmission`] if the HTTP client can't be built.
pub fn upserter_from_config(config: &Config) -> Result<DynUpserter, Error> {
    let endpoint = Route53Endpoint::from_config(config);
    let upserter: DynUpserter = match config.upsert_strategy {
        UpsertStrategy::Signed => Arc::new(SignedUpserter::new(endpoint, config.upstream_timeout)?),
        UpsertStrategy::DryRun => Arc::new(DryRunUpserter::new(endpoint)),
    };
    Ok(upserter)
}
