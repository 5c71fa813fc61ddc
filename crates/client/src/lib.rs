//! # rxcheck Client
//!
//! HTTP client for the analysis backend's `POST /analyze` endpoint.
//!
//! Errors are classified (transport, status, decode) for logging, but every failure is
//! presented to the user as the same fixed message: see [`BackendError::user_message`].

#![warn(rust_2018_idioms)]

use api_shared::{AnalyzeReq, AnalyzeRes};
use std::time::Duration;
use url::Url;

/// Message shown to the user whenever the backend call fails.
pub const BACKEND_ERROR_MESSAGE: &str = "Error contacting backend API";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid backend endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("failed to reach backend: {0}")]
    Transport(reqwest::Error),
    #[error("backend returned status {status}")]
    Status { status: u16 },
    #[error("failed to decode backend response: {0}")]
    Decode(reqwest::Error),
}

impl BackendError {
    /// The fixed message shown to users, independent of the failure's cause and of any
    /// response body.
    pub fn user_message(&self) -> &'static str {
        BACKEND_ERROR_MESSAGE
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `BackendError::InvalidEndpoint` if `endpoint` is not an absolute http(s) URL.
    pub fn new(endpoint: &str, timeout: Duration) -> BackendResult<Self> {
        let url = Url::parse(endpoint).map_err(|e| BackendError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BackendError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: url,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post `req` to the backend.
    ///
    /// Only `200 OK` counts as success. The response body of a failed call is never read.
    ///
    /// # Errors
    ///
    /// - `BackendError::Transport` if the backend cannot be reached or times out.
    /// - `BackendError::Status` for any status other than 200.
    /// - `BackendError::Decode` if a 200 body is not a valid analysis response.
    pub async fn analyze(&self, req: &AnalyzeReq) -> BackendResult<AnalyzeRes> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(req)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), endpoint = %self.endpoint, "backend call failed");
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<AnalyzeRes>().await.map_err(BackendError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::DosageEntry;
    use axum::{http::StatusCode, routing::post, Json, Router};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/analyze")
    }

    fn request() -> AnalyzeReq {
        AnalyzeReq {
            drugs: vec!["aspirin".into(), "ibuprofen".into()],
            age: 30,
            text: None,
        }
    }

    async fn echo_analysis(Json(req): Json<AnalyzeReq>) -> Json<AnalyzeRes> {
        Json(AnalyzeRes {
            interactions: vec!["No harmful interactions detected.".into()],
            dosage: req
                .drugs
                .into_iter()
                .map(|drug| DosageEntry {
                    drug,
                    recommendation: "Dosage recommendation here (mock)".into(),
                })
                .collect(),
            alternatives: vec!["No alternative medications needed.".into()],
            extraction: None,
        })
    }

    #[test]
    fn test_new_rejects_relative_endpoint() {
        let err = BackendClient::new("/analyze", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, BackendError::InvalidEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let endpoint = spawn_server(Router::new().route("/analyze", post(echo_analysis))).await;
        let client = BackendClient::new(&endpoint, Duration::from_secs(5)).unwrap();

        let res = client.analyze(&request()).await.unwrap();
        assert_eq!(res.dosage.len(), 2);
        assert_eq!(res.dosage[0].drug, "aspirin");
    }

    #[tokio::test]
    async fn test_non_ok_status_yields_fixed_message_regardless_of_body() {
        for (status, body) in [
            (StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            (StatusCode::BAD_REQUEST, r#"{"error":"Please enter at least one drug name."}"#),
            (StatusCode::CREATED, r#"{"interactions":[],"dosage":[],"alternatives":[]}"#),
        ] {
            let app = Router::new().route("/analyze", post(move || async move { (status, body) }));
            let endpoint = spawn_server(app).await;
            let client = BackendClient::new(&endpoint, Duration::from_secs(5)).unwrap();

            let err = client.analyze(&request()).await.unwrap_err();
            assert!(matches!(err, BackendError::Status { status: s } if s == status.as_u16()));
            assert_eq!(err.user_message(), "Error contacting backend API");
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            BackendClient::new(&format!("http://{addr}/analyze"), Duration::from_secs(2)).unwrap();
        let err = client.analyze(&request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
        assert_eq!(err.user_message(), BACKEND_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_ok_body_is_decode_error() {
        let app = Router::new().route("/analyze", post(|| async { "{\"interactions\": 3}" }));
        let endpoint = spawn_server(app).await;
        let client = BackendClient::new(&endpoint, Duration::from_secs(5)).unwrap();

        let err = client.analyze(&request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
