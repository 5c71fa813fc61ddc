use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use rx_core::config::{
    http_timeout_from_env_value, max_drug_fields_from_env_value, ner_endpoint_from_env_value,
    ner_labels_from_env_value, ner_min_score_from_env_value,
};
use rx_core::constants::DEFAULT_REST_ADDR;
use rx_core::{AnalysisService, CoreConfig, EntityRecogniser};
use rx_ner::HttpEntityRecogniser;

/// Main entry point for the rxcheck analysis backend
///
/// Resolves configuration once from the environment (and `.env`, if present), then serves
/// the REST API.
///
/// # Environment Variables
/// - `RX_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `RX_MAX_DRUG_FIELDS`: maximum drug names per request (default: 10)
/// - `RX_NER_ENDPOINT`: NER inference endpoint; `/extract` answers 503 when unset
/// - `RX_NER_LABELS`: comma-separated entity labels treated as drugs
/// - `RX_NER_MIN_SCORE`: minimum entity score (default: 0.0)
/// - `RX_HTTP_TIMEOUT_SECS`: timeout for outbound NER calls (default: 10)
///
/// # Errors
/// Returns an error if configuration is invalid, the address cannot be bound, or the
/// server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rxcheck_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("rx_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RX_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = Arc::new(CoreConfig::new(
        max_drug_fields_from_env_value(std::env::var("RX_MAX_DRUG_FIELDS").ok())?,
        ner_endpoint_from_env_value(std::env::var("RX_NER_ENDPOINT").ok()),
        ner_labels_from_env_value(std::env::var("RX_NER_LABELS").ok()),
        ner_min_score_from_env_value(std::env::var("RX_NER_MIN_SCORE").ok())?,
        http_timeout_from_env_value(std::env::var("RX_HTTP_TIMEOUT_SECS").ok())?,
    )?);

    let recogniser = match HttpEntityRecogniser::from_config(&cfg)? {
        Some(recogniser) => {
            tracing::info!("++ NER endpoint: {}", recogniser.endpoint());
            Some(Arc::new(recogniser) as Arc<dyn EntityRecogniser>)
        }
        None => {
            tracing::warn!("RX_NER_ENDPOINT not set; /extract is disabled");
            None
        }
    };

    tracing::info!("++ Starting rxcheck REST on {}", rest_addr);

    let state = AppState::new(cfg, AnalysisService::mock(), recogniser);
    api_rest::serve(&rest_addr, state).await
}
