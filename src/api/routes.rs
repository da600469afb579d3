use crate::api::api_error::APIError;
use crate::api::auth::BasicAuth;
use crate::api::model::UpdateParams;
use crate::api::server::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/update", get(update).post(update))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

async fn update(
    State(state): State<AppState>,
    BasicAuth(credentials): BasicAuth,
    WithRejection(Query(params), _): WithRejection<Query<UpdateParams>, APIError>,
) -> Result<&'static str, APIError> {
    let change = match params.into_change(state.config.record_ttl) {
        Ok(change) => change,
        Err(err) => {
            tracing::debug!("rejected update: {err}");
            return Err(err.into());
        }
    };

    tracing::info!(
        "accepted update of {} A {} in zone {}",
        change.fqdn(),
        change.ip(),
        change.hosted_zone_id()
    );
    if let Err(err) = state.upserter.upsert(&credentials, &change).await {
        tracing::warn!("update of {} failed: {err}", change.fqdn());
        return Err(err.into());
    }
    Ok("success")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Error;
    use crate::route53::{PreparedChange, RecordChange, RecordUpserter, Route53Endpoint};
    use crate::sigv4::{Credentials, SigningError, TimeContext};
    use axum::body::Body;
    use axum::http::header::AUTHORIZATION;
    use axum::http::{Method, Request, StatusCode};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::sync::{Arc, Mutex};
    use time::macros::datetime;
    use tower::ServiceExt;

    const UPDATE_URI: &str = "/update?hostedZoneId=Z111&hostname=home.example.com&ip=203.0.113.9";

    struct RecordingUpserter {
        calls: Mutex<Vec<(Credentials, RecordChange)>>,
        outcome: fn() -> Result<(), Error>,
    }

    impl RecordingUpserter {
        fn returning(outcome: fn() -> Result<(), Error>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome,
            })
        }

        fn succeeding() -> Arc<Self> {
            Self::returning(|| Ok(()))
        }

        fn calls(&self) -> Vec<(Credentials, RecordChange)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl RecordUpserter for RecordingUpserter {
        async fn upsert(
            &self,
            credentials: &Credentials,
            change: &RecordChange,
        ) -> Result<(), Error> {
            self.calls
                .lock()
                .unwrap()
                .push((credentials.clone(), change.clone()));
            (self.outcome)()
        }
    }

    fn app(upserter: &Arc<RecordingUpserter>) -> Router {
        let config = Config::try_from_reader(
            r#"{"api_bind_addr": "127.0.0.1:0", "record_ttl": 120}"#.as_bytes(),
            None,
        )
        .unwrap();
        new(AppState {
            config: Arc::new(config),
            upserter: upserter.clone(),
        })
    }

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    fn update_request(method: Method, uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_should_report_healthy() {
        let response = app(&RecordingUpserter::succeeding())
            .oneshot(update_request(Method::GET, "/healthcheck", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"ok":"healthy"}"#);
    }

    #[tokio::test]
    async fn test_should_apply_update_with_basic_credentials() {
        let upserter = RecordingUpserter::succeeding();
        let response = app(&upserter)
            .oneshot(update_request(
                Method::GET,
                UPDATE_URI,
                Some(&basic("AKIDEXAMPLE:secret")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "success");

        let calls = upserter.calls();
        assert_eq!(calls.len(), 1);
        let (credentials, change) = &calls[0];
        assert_eq!(credentials.access_key_id, "AKIDEXAMPLE");
        assert_eq!(credentials.secret_access_key, "secret");
        assert_eq!(change.fqdn(), "home.example.com.");
        assert_eq!(change.ttl(), 120);
    }

    #[tokio::test]
    async fn test_should_accept_post() {
        let upserter = RecordingUpserter::succeeding();
        let response = app(&upserter)
            .oneshot(update_request(
                Method::POST,
                UPDATE_URI,
                Some(&basic("AKIDEXAMPLE:secret")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(upserter.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_should_forbid_missing_authorization_without_upserting() {
        let upserter = RecordingUpserter::succeeding();
        let response = app(&upserter)
            .oneshot(update_request(Method::GET, UPDATE_URI, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.contains("\"error\""));
        assert!(upserter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_forbid_non_basic_scheme_without_upserting() {
        let upserter = RecordingUpserter::succeeding();
        let response = app(&upserter)
            .oneshot(update_request(
                Method::GET,
                UPDATE_URI,
                Some("Bearer abc.def.ghi"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(upserter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_forbid_missing_or_invalid_parameters() {
        for uri in [
            "/update?hostedZoneId=Z111&hostname=home.example.com",
            "/update?hostedZoneId=Z111&hostname=home.example.com&ip=2001:db8::1",
            "/update",
        ] {
            let upserter = RecordingUpserter::succeeding();
            let response = app(&upserter)
                .oneshot(update_request(
                    Method::GET,
                    uri,
                    Some(&basic("AKIDEXAMPLE:secret")),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
            assert!(upserter.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_should_map_upserter_failures() {
        let cases: [(fn() -> Result<(), Error>, StatusCode); 2] = [
            (
                || Err(Error::Transmission("connection refused".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                || Err(SigningError::MissingInput("region").into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (outcome, status) in cases {
            let response = app(&RecordingUpserter::returning(outcome))
                .oneshot(update_request(
                    Method::GET,
                    UPDATE_URI,
                    Some(&basic("AKIDEXAMPLE:secret")),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), status);
            assert!(!body_string(response).await.contains("secret"));
        }
    }

    /// Prepares every change on a Route 53 endpoint and keeps the signed result.
    struct SigningRecorder {
        endpoint: Route53Endpoint,
        prepared: Mutex<Vec<PreparedChange>>,
    }

    #[async_trait::async_trait]
    impl RecordUpserter for SigningRecorder {
        async fn upsert(
            &self,
            credentials: &Credentials,
            change: &RecordChange,
        ) -> Result<(), Error> {
            let prepared = self.endpoint.prepare_now(credentials, change)?;
            self.prepared.lock().unwrap().push(prepared);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_should_sign_accepted_update_end_to_end() {
        let recorder = Arc::new(SigningRecorder {
            endpoint: Route53Endpoint::new("route53.amazonaws.com", "us-east-1")
                .with_clock(|| TimeContext::at(datetime!(2024-01-01 12:00:00 UTC))),
            prepared: Mutex::new(Vec::new()),
        });
        let config = Config::try_from_reader(
            r#"{"api_bind_addr": "127.0.0.1:0"}"#.as_bytes(),
            None,
        )
        .unwrap();
        let app = new(AppState {
            config: Arc::new(config),
            upserter: recorder.clone(),
        });

        let response = app
            .oneshot(update_request(
                Method::POST,
                UPDATE_URI,
                Some(&basic(
                    "AKIDEXAMPLE:wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
                )),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "success");

        let prepared = recorder.prepared.lock().unwrap().remove(0);
        assert_eq!(
            prepared.url,
            "https://route53.amazonaws.com/2013-04-01/hostedzone/Z111/rrset/"
        );
        let headers = &prepared.descriptor.headers;
        assert_eq!(headers.x_amz_date, "20240101T120000Z");
        let prefix = "AWS4-HMAC-SHA256 \
            Credential=AKIDEXAMPLE/20240101/us-east-1/route53/aws4_request, \
            SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature=";
        assert!(headers.authorization.starts_with(prefix));
        let signature = &headers.authorization[prefix.len()..];
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert!(String::from_utf8_lossy(&prepared.descriptor.body)
            .contains("<Name>home.example.com.</Name>"));
    }
}
