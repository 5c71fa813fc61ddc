//! # rxcheck NER
//!
//! Client for an external biomedical named-entity recognition service.
//!
//! The model is hosted elsewhere (for example a token-classification pipeline behind an
//! inference server); this crate only posts text to it and decodes the aggregated entity
//! spans it returns. Filtering those spans down to drug names is done by
//! [`rx_core::EntityFilter`].

#![warn(rust_2018_idioms)]

use async_trait::async_trait;
use rx_core::ner::recogniser_error;
use rx_core::{AnalysisResult, CoreConfig, Entity, EntityRecogniser};
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum NerError {
    #[error("invalid NER endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("failed to reach NER service: {0}")]
    Transport(reqwest::Error),
    #[error("NER service returned status {status}")]
    Status { status: u16 },
    #[error("failed to decode NER response: {0}")]
    Decode(reqwest::Error),
}

pub type NerResult<T> = std::result::Result<T, NerError>;

#[derive(Serialize)]
struct InferenceReq<'a> {
    inputs: &'a str,
}

/// [`EntityRecogniser`] backed by an HTTP inference endpoint.
///
/// Sends `POST {endpoint}` with `{"inputs": text}` and expects a JSON array of entities with
/// `entity_group`, `word`, `score`, `start` and `end` fields.
#[derive(Debug, Clone)]
pub struct HttpEntityRecogniser {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpEntityRecogniser {
    /// # Errors
    ///
    /// Returns `NerError::InvalidEndpoint` if `endpoint` is not an absolute http(s) URL, or
    /// `NerError::ClientBuild` if the HTTP client cannot be constructed.
    pub fn new(endpoint: &str, timeout: Duration) -> NerResult<Self> {
        let url = Url::parse(endpoint).map_err(|e| NerError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NerError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NerError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: url,
        })
    }

    /// Build a recogniser from startup config, or `None` if no endpoint is configured.
    pub fn from_config(cfg: &CoreConfig) -> NerResult<Option<Self>> {
        cfg.ner_endpoint()
            .map(|endpoint| Self::new(endpoint, cfg.http_timeout()))
            .transpose()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post `text` to the inference endpoint and decode the entity spans.
    ///
    /// # Errors
    ///
    /// - `NerError::Transport` if the service cannot be reached or times out.
    /// - `NerError::Status` for any non-success status, including a model that failed to load.
    /// - `NerError::Decode` if the body is not a JSON entity array.
    pub async fn entities(&self, text: &str) -> NerResult<Vec<Entity>> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&InferenceReq { inputs: text })
            .send()
            .await
            .map_err(NerError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint = %self.endpoint, "NER service error");
            return Err(NerError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<Vec<Entity>>().await.map_err(NerError::Decode)
    }
}

#[async_trait]
impl EntityRecogniser for HttpEntityRecogniser {
    async fn recognise(&self, text: &str) -> AnalysisResult<Vec<Entity>> {
        self.entities(text).await.map_err(recogniser_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use rx_core::{extract_drug_entities, EntityFilter};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/predict")
    }

    async fn echo_entities(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        let text = body["inputs"].as_str().unwrap_or_default().to_string();
        Json(serde_json::json!([
            {"entity_group": "MISC", "word": "aspirin", "score": 0.93, "start": 0, "end": 7},
            {"entity_group": "PER", "word": text, "score": 0.5, "start": 0, "end": 1},
            {"entity_group": "ORG", "word": "aspirin", "score": 0.61, "start": 20, "end": 27}
        ]))
    }

    #[test]
    fn test_new_rejects_bad_endpoints() {
        let err = HttpEntityRecogniser::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, NerError::InvalidEndpoint { .. }));

        let err =
            HttpEntityRecogniser::new("ftp://models.local/ner", Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_from_config_without_endpoint_is_none() {
        let recogniser = HttpEntityRecogniser::from_config(&CoreConfig::default()).unwrap();
        assert!(recogniser.is_none());
    }

    #[tokio::test]
    async fn test_entities_decodes_pipeline_output() {
        let endpoint = spawn_server(Router::new().route("/predict", post(echo_entities))).await;
        let recogniser = HttpEntityRecogniser::new(&endpoint, Duration::from_secs(5)).unwrap();

        let entities = recogniser.entities("aspirin with food").await.unwrap();
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[1].word, "aspirin with food");

        let names = extract_drug_entities(&recogniser, &EntityFilter::default(), "aspirin with food")
            .await
            .unwrap();
        assert_eq!(names, vec!["aspirin"]);
    }

    #[tokio::test]
    async fn test_entities_reports_non_success_status() {
        let app = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model is loading") }),
        );
        let endpoint = spawn_server(app).await;
        let recogniser = HttpEntityRecogniser::new(&endpoint, Duration::from_secs(5)).unwrap();

        let err = recogniser.entities("aspirin").await.unwrap_err();
        assert!(matches!(err, NerError::Status { status: 503 }));

        let err = recogniser.recognise("aspirin").await.unwrap_err();
        assert!(err.to_string().contains("status 503"));
    }

    #[tokio::test]
    async fn test_entities_reports_malformed_body() {
        let app = Router::new().route("/predict", post(|| async { "not json" }));
        let endpoint = spawn_server(app).await;
        let recogniser = HttpEntityRecogniser::new(&endpoint, Duration::from_secs(5)).unwrap();

        let err = recogniser.entities("aspirin").await.unwrap_err();
        assert!(matches!(err, NerError::Decode(_)));
    }
}
