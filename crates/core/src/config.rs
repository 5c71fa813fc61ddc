//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Binaries read the environment and hand the raw values to the
//! `*_from_env_value` helpers below; nothing in request handling reads process-wide state.

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_DRUG_FIELDS, DEFAULT_NER_LABELS};
use crate::{AnalysisError, AnalysisResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    max_drug_fields: usize,
    ner_endpoint: Option<String>,
    ner_labels: Vec<String>,
    ner_min_score: f32,
    http_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` if `max_drug_fields` is zero, the label set is
    /// empty, or `ner_min_score` is outside `[0, 1]`.
    pub fn new(
        max_drug_fields: usize,
        ner_endpoint: Option<String>,
        ner_labels: Vec<String>,
        ner_min_score: f32,
        http_timeout: Duration,
    ) -> AnalysisResult<Self> {
        if max_drug_fields == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_drug_fields must be at least 1".into(),
            ));
        }
        if ner_labels.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "ner_labels cannot be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&ner_min_score) {
            return Err(AnalysisError::InvalidConfig(format!(
                "ner_min_score must be between 0 and 1, got {ner_min_score}"
            )));
        }

        Ok(Self {
            max_drug_fields,
            ner_endpoint,
            ner_labels,
            ner_min_score,
            http_timeout,
        })
    }

    pub fn max_drug_fields(&self) -> usize {
        self.max_drug_fields
    }

    pub fn ner_endpoint(&self) -> Option<&str> {
        self.ner_endpoint.as_deref()
    }

    pub fn ner_labels(&self) -> &[String] {
        &self.ner_labels
    }

    pub fn ner_min_score(&self) -> f32 {
        self.ner_min_score
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_drug_fields: DEFAULT_MAX_DRUG_FIELDS,
            ner_endpoint: None,
            ner_labels: DEFAULT_NER_LABELS.iter().map(|l| l.to_string()).collect(),
            ner_min_score: 0.0,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the maximum number of drug fields from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default.
pub fn max_drug_fields_from_env_value(value: Option<String>) -> AnalysisResult<usize> {
    match non_blank(value) {
        None => Ok(DEFAULT_MAX_DRUG_FIELDS),
        Some(v) => v.parse::<usize>().map_err(|e| {
            AnalysisError::InvalidConfig(format!("RX_MAX_DRUG_FIELDS '{v}' is not a count: {e}"))
        }),
    }
}

/// Parse the NER endpoint. Blank means "not configured".
pub fn ner_endpoint_from_env_value(value: Option<String>) -> Option<String> {
    non_blank(value)
}

/// Parse a comma-separated NER label list.
///
/// Labels are trimmed and upper-cased; blank entries are dropped. If nothing remains, the
/// default label set is returned.
pub fn ner_labels_from_env_value(value: Option<String>) -> Vec<String> {
    let labels: Vec<String> = non_blank(value)
        .map(|v| {
            v.split(',')
                .map(|l| l.trim().to_uppercase())
                .filter(|l| !l.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if labels.is_empty() {
        DEFAULT_NER_LABELS.iter().map(|l| l.to_string()).collect()
    } else {
        labels
    }
}

/// Parse the minimum NER entity score. Defaults to 0.0 (no thresholding).
pub fn ner_min_score_from_env_value(value: Option<String>) -> AnalysisResult<f32> {
    match non_blank(value) {
        None => Ok(0.0),
        Some(v) => v.parse::<f32>().map_err(|e| {
            AnalysisError::InvalidConfig(format!("RX_NER_MIN_SCORE '{v}' is not a number: {e}"))
        }),
    }
}

/// Parse the outbound HTTP timeout in whole seconds.
pub fn http_timeout_from_env_value(value: Option<String>) -> AnalysisResult<Duration> {
    match non_blank(value) {
        None => Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        Some(v) => v.parse::<u64>().map(Duration::from_secs).map_err(|e| {
            AnalysisError::InvalidConfig(format!(
                "RX_HTTP_TIMEOUT_SECS '{v}' is not a number of seconds: {e}"
            ))
        }),
    }
}
