use crate::error::Error;
use ipnetwork::IpNetwork;
use lazy_static::lazy_static;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::{BufReader, Read};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub type SharedConfig = Arc<Config>;

/// Environment variable consulted when the config file doesn't name a region.
pub const REGION_ENV_VAR: &str = "AWS_REGION";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ENDPOINT_HOST: &str = "route53.amazonaws.com";
pub const DEFAULT_RECORD_TTL: u32 = 60;

/// How accepted updates reach Route 53.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpsertStrategy {
    /// Sign the change request and send it.
    #[default]
    Signed,
    /// Sign the change request and log it without sending.
    DryRun,
}

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub api_bind_addr: SocketAddr,
    /// Must exceed `upstream_timeout` so a slow Route 53 call fails as a transmission error
    /// before the API layer times the request out.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_api_timeout")]
    pub api_timeout: Duration,
    #[serde(default)]
    region: Option<String>,
    #[serde(default = "default_endpoint_host")]
    pub endpoint_host: String,
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout: Duration,
    #[serde(default)]
    pub upsert_strategy: UpsertStrategy,
}

lazy_static! {
    // Ipv6Addr::is_unique_local is still unstable. See RFC 4193.
    static ref IPV6_UNIQUE_LOCAL_NETWORK: IpNetwork = IpNetwork::from_str("fc00::/7").unwrap();
}

fn default_api_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_upstream_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_endpoint_host() -> String {
    DEFAULT_ENDPOINT_HOST.to_string()
}

fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        Self::try_from_reader(reader, std::env::var(REGION_ENV_VAR).ok())
    }

    /// Parse a JSON config, falling back to `env_region` when the config names no region.
    pub fn try_from_reader(reader: impl Read, env_region: Option<String>) -> Result<Self, Error> {
        let mut conf: Config = serde_json::from_reader(reader)?;
        conf.region = Some(resolve_region(conf.region.take(), env_region)?);
        conf.validate()?;
        Ok(conf)
    }

    /// The one region every signed change is scoped to.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    fn validate(&self) -> Result<(), Error> {
        self.bind_addr_is_secure()?;
        if self.api_timeout <= self.upstream_timeout {
            return Err(Error::InvalidConfig(format!(
                "api_timeout ({}s) must be longer than upstream_timeout ({}s)",
                self.api_timeout.as_secs(),
                self.upstream_timeout.as_secs()
            )));
        }
        let host = self.endpoint_host.as_str();
        if host.is_empty() || host.contains(|c: char| c == '/' || c.is_whitespace()) {
            return Err(Error::InvalidConfig(format!(
                "endpoint_host \"{host}\" is not a bare host name"
            )));
        }
        if self.record_ttl == 0 {
            return Err(Error::InvalidConfig("record_ttl must be positive".into()));
        }
        Ok(())
    }

    /// Credentials arrive over plain HTTP, so the API only listens on loopback or private
    /// addresses. Put a TLS terminating proxy in front of it for anything else.
    fn bind_addr_is_secure(&self) -> Result<(), Error> {
        let ip = self.api_bind_addr.ip();
        let secure = match ip {
            IpAddr::V4(v4) => v4.is_loopback() || v4.is_private(),
            IpAddr::V6(v6) => v6.is_loopback() || IPV6_UNIQUE_LOCAL_NETWORK.contains(ip),
        };
        if !secure {
            return Err(Error::InsecureAPIBind(ip));
        }
        Ok(())
    }
}

fn resolve_region(configured: Option<String>, env_region: Option<String>) -> Result<String, Error> {
    let region = configured
        .or(env_region)
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let region = region.trim();
    if region.is_empty() || region.contains(|c: char| c == '/' || c.is_whitespace()) {
        return Err(Error::InvalidConfig(format!("region \"{region}\" is not valid")));
    }
    Ok(region.to_string())
}
