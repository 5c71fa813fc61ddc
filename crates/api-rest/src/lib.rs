//! # API REST
//!
//! REST API implementation for rxcheck.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for wire types and `rx-core` for every analysis decision.

#![warn(rust_2018_idioms)]

use api_shared::{
    AnalyzeReq, AnalyzeRes, DosageEntry, ErrorRes, ExtractReq, ExtractRes, HealthRes,
    HealthService,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rx_core::{
    extract_drug_entities, AnalysisError, AnalysisInput, AnalysisService, CoreConfig,
    EntityFilter, EntityRecogniser, PatientAge,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Application state shared across REST API handlers
///
/// Everything here is resolved at startup and is read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    analysis: AnalysisService,
    recogniser: Option<Arc<dyn EntityRecogniser>>,
    filter: EntityFilter,
}

impl AppState {
    pub fn new(
        cfg: Arc<CoreConfig>,
        analysis: AnalysisService,
        recogniser: Option<Arc<dyn EntityRecogniser>>,
    ) -> Self {
        let filter = EntityFilter::from_config(&cfg);
        Self {
            cfg,
            analysis,
            recogniser,
            filter,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze, extract),
    components(schemas(
        HealthRes,
        ErrorRes,
        AnalyzeReq,
        AnalyzeRes,
        DosageEntry,
        ExtractReq,
        ExtractRes
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/extract", post(extract))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve the REST API until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- rxcheck REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorRes {
            error: message.into(),
        }),
    )
}

fn analysis_error_response(err: AnalysisError) -> ApiError {
    if err.is_user_error() {
        tracing::warn!("Rejected analysis request: {}", err);
        return error_response(StatusCode::BAD_REQUEST, err.to_string());
    }
    tracing::error!("Analysis error: {:?}", err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Analysis result", body = AnalyzeRes),
        (status = 400, description = "No drug entered, age out of range or too many drugs", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Run the drug interaction, dosage, alternative and extraction analysers
///
/// Blank drug names are ignored. When every name is blank the request is rejected with the
/// same warning a form front end shows. The `extraction` field is only returned when the
/// request carried `text`.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - no non-blank drug name was given,
/// - the age is outside 0 to 120, or
/// - more drug names were given than the configured maximum.
#[axum::debug_handler]
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeReq>,
) -> Result<Json<AnalyzeRes>, ApiError> {
    if req.drugs.iter().all(|d| d.trim().is_empty()) {
        return Err(analysis_error_response(AnalysisError::NoDrugs));
    }

    let age = PatientAge::new(req.age)
        .map_err(|e| analysis_error_response(AnalysisError::InvalidAge(e)))?;

    let include_extraction = req.text.is_some();
    let input = AnalysisInput::from_form(
        age,
        &req.drugs,
        req.text.unwrap_or_default(),
        state.cfg.max_drug_fields(),
    )
    .map_err(analysis_error_response)?;

    let report = state.analysis.analyse(&input);
    Ok(Json(AnalyzeRes::from_report(&report, include_extraction)))
}

#[utoipa::path(
    post,
    path = "/extract",
    request_body = ExtractReq,
    responses(
        (status = 200, description = "Unique drug names found in the text", body = ExtractRes),
        (status = 502, description = "NER service failed", body = ErrorRes),
        (status = 503, description = "NER service not configured", body = ErrorRes)
    )
)]
/// Extract drug names from free text with the configured NER service
#[axum::debug_handler]
async fn extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractReq>,
) -> Result<Json<ExtractRes>, ApiError> {
    let Some(recogniser) = state.recogniser.as_ref() else {
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "NER service not configured",
        ));
    };

    match extract_drug_entities(recogniser.as_ref(), &state.filter, &req.text).await {
        Ok(drugs) => Ok(Json(ExtractRes { drugs })),
        Err(e) => {
            tracing::error!("Drug entity extraction error: {:?}", e);
            Err(error_response(
                StatusCode::BAD_GATEWAY,
                "NER service unavailable",
            ))
        }
    }
}
