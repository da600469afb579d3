use crate::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;
use trust_dns_proto::rr::Name;

/// XML namespace of the 2013-04-01 Route 53 API.
const XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

/// Path prefix Route 53 itself uses in hosted zone ids, e.g. `/hostedzone/Z111`.
const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";

/// A validated UPSERT of one A record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    hosted_zone_id: String,
    fqdn: String,
    ip: Ipv4Addr,
    ttl: u32,
}

impl RecordChange {
    /// Validate the raw update parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when the hosted zone id isn't alphanumeric, the
    /// hostname isn't a DNS name below the root, or the IP isn't an IPv4 address.
    pub fn new(hosted_zone_id: &str, hostname: &str, ip: &str, ttl: u32) -> Result<Self, Error> {
        Ok(Self {
            hosted_zone_id: parse_hosted_zone_id(hosted_zone_id)?,
            fqdn: parse_fqdn(hostname)?,
            ip: Ipv4Addr::from_str(ip.trim()).map_err(|err| Error::InvalidParameter {
                name: "ip",
                reason: err.to_string(),
            })?,
            ttl,
        })
    }

    pub fn hosted_zone_id(&self) -> &str {
        &self.hosted_zone_id
    }

    /// Fully qualified record name, with its trailing dot.
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Render the `ChangeResourceRecordSetsRequest` body.
    pub fn to_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsRequest xmlns="{XMLNS}">
  <ChangeBatch>
    <Changes>
      <Change>
        <Action>UPSERT</Action>
        <ResourceRecordSet>
          <Name>{name}</Name>
          <Type>A</Type>
          <TTL>{ttl}</TTL>
          <ResourceRecords>
            <ResourceRecord>
              <Value>{ip}</Value>
            </ResourceRecord>
          </ResourceRecords>
        </ResourceRecordSet>
      </Change>
    </Changes>
  </ChangeBatch>
</ChangeResourceRecordSetsRequest>
"#,
            name = self.fqdn,
            ttl = self.ttl,
            ip = self.ip,
        )
    }
}

fn parse_hosted_zone_id(raw: &str) -> Result<String, Error> {
    let raw = raw.trim();
    let id = raw.strip_prefix(HOSTED_ZONE_PREFIX).unwrap_or(raw);
    // The id is interpolated into the request path unencoded.
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidParameter {
            name: "hostedZoneId",
            reason: "must be an alphanumeric hosted zone id".into(),
        });
    }
    Ok(id.to_string())
}

fn parse_fqdn(raw: &str) -> Result<String, Error> {
    let invalid = |reason: String| Error::InvalidParameter {
        name: "hostname",
        reason,
    };

    let name = Name::from_str(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if name.is_root() {
        return Err(invalid("must name a record below the root".into()));
    }
    let fqdn = name
        .append_domain(&Name::root())
        .map_err(|err| invalid(err.to_string()))?
        .to_ascii();

    // The name is interpolated into the XML body unescaped.
    if !fqdn
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '*'))
    {
        return Err(invalid("contains characters not allowed in a record name".into()));
    }
    Ok(fqdn)
}
