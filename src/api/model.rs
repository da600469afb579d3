use crate::error::Error;
use crate::route53::RecordChange;
use serde::Deserialize;

/// Query parameters of an `/update` request.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct UpdateParams {
    #[serde(rename = "hostedZoneId")]
    pub hosted_zone_id: Option<String>,
    pub hostname: Option<String>,
    pub ip: Option<String>,
}

impl UpdateParams {
    pub fn into_change(self, ttl: u32) -> Result<RecordChange, Error> {
        let hosted_zone_id = required(self.hosted_zone_id, "hostedZoneId")?;
        let hostname = required(self.hostname, "hostname")?;
        let ip = required(self.ip, "ip")?;
        RecordChange::new(&hosted_zone_id, &hostname, &ip, ttl)
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, Error> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::MissingParameter(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn params() -> UpdateParams {
        UpdateParams {
            hosted_zone_id: Some("Z111".into()),
            hostname: Some("home.example.com".into()),
            ip: Some("203.0.113.9".into()),
        }
    }

    #[test]
    fn test_should_build_change_with_ttl() {
        let change = params().into_change(300).unwrap();
        assert_eq!(change.hosted_zone_id(), "Z111");
        assert_eq!(change.fqdn(), "home.example.com.");
        assert_eq!(change.ip(), Ipv4Addr::new(203, 0, 113, 9));
        assert_eq!(change.ttl(), 300);
    }

    #[test]
    fn test_should_name_missing_parameter() {
        let result = UpdateParams {
            hostname: None,
            ..params()
        }
        .into_change(60);
        assert!(matches!(result, Err(Error::MissingParameter("hostname"))));

        let result = UpdateParams {
            hosted_zone_id: Some("  ".into()),
            ..params()
        }
        .into_change(60);
        assert!(matches!(result, Err(Error::MissingParameter("hostedZoneId"))));
    }

    #[test]
    fn test_should_deserialize_camel_case_zone_id() {
        let params: UpdateParams =
            serde_json::from_str(r#"{"hostedZoneId": "Z111", "ip": "203.0.113.9"}"#).unwrap();
        assert_eq!(params.hosted_zone_id.as_deref(), Some("Z111"));
        assert_eq!(params.hostname, None);
    }
}
