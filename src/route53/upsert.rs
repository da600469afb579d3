use crate::error::Error;
use crate::route53::{PreparedChange, RecordChange, Route53Endpoint};
use crate::sigv4::Credentials;
use std::sync::Arc;
use std::time::Duration;

/// `DynUpserter` is a type alias for a [`RecordUpserter`] shared by every request handler.
#[allow(clippy::module_name_repetitions)]
pub type DynUpserter = Arc<dyn RecordUpserter + Send + Sync>;

/// Applies one A record change on behalf of the caller whose credentials are given.
///
/// Implementations never retry. A retried change must be signed again with a fresh instant.
#[async_trait::async_trait]
pub trait RecordUpserter {
    async fn upsert(&self, credentials: &Credentials, change: &RecordChange) -> Result<(), Error>;
}

/// Signs each change and sends it to Route 53.
#[derive(Debug, Clone)]
pub struct SignedUpserter {
    endpoint: Route53Endpoint,
    client: reqwest::Client,
}

impl SignedUpserter {
    /// # Errors
    ///
    /// Returns [`Error::Transmission`] if the HTTP client can't be built.
    pub fn new(endpoint: Route53Endpoint, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Transmission(err.to_string()))?;
        Ok(Self { endpoint, client })
    }

    async fn send(&self, prepared: PreparedChange) -> Result<String, Error> {
        let mut request = self.client.post(&prepared.url);
        for (name, value) in prepared.descriptor.headers.pairs() {
            request = request.header(name, value);
        }

        let response = request
            .body(prepared.descriptor.body)
            .send()
            .await
            .map_err(|err| Error::Transmission(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| Error::Transmission(format!("reading response: {err}")))?;

        if !status.is_success() {
            return Err(Error::ProviderRejected {
                status: status.as_u16(),
                detail: body,
            });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl RecordUpserter for SignedUpserter {
    async fn upsert(&self, credentials: &Credentials, change: &RecordChange) -> Result<(), Error> {
        let prepared = self.endpoint.prepare_now(credentials, change)?;
        tracing::debug!("POST {}", prepared.url);

        let body = self.send(prepared).await?;
        tracing::info!(
            "upserted {} A {} in zone {} ({})",
            change.fqdn(),
            change.ip(),
            change.hosted_zone_id(),
            self.endpoint.region()
        );
        tracing::debug!("Route 53 response: {body}");
        Ok(())
    }
}

/// Signs each change and logs it instead of sending it.
#[derive(Debug, Clone)]
pub struct DryRunUpserter {
    endpoint: Route53Endpoint,
}

impl DryRunUpserter {
    pub fn new(endpoint: Route53Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait::async_trait]
impl RecordUpserter for DryRunUpserter {
    async fn upsert(&self, credentials: &Credentials, change: &RecordChange) -> Result<(), Error> {
        let prepared = self.endpoint.prepare_now(credentials, change)?;
        let headers = &prepared.descriptor.headers;
        tracing::info!(
            url = %prepared.url,
            region = self.endpoint.region(),
            x_amz_date = %headers.x_amz_date,
            x_amz_content_sha256 = %headers.x_amz_content_sha256,
            "dry run: signed change for {} A {} not sent",
            change.fqdn(),
            change.ip()
        );
        tracing::debug!(
            "dry run body:\n{}",
            String::from_utf8_lossy(&prepared.descriptor.body)
        );
        Ok(())
    }
}
