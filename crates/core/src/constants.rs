//! Constants used throughout the rxcheck core crate.
//!
//! User-facing literals live here so that every front end (CLI, REST) renders the
//! exact same text.

/// Warning shown when every drug field is blank.
pub const NO_DRUGS_WARNING: &str = "Please enter at least one drug name.";

/// Banner printed above a successful analysis.
pub const ANALYSIS_BANNER: &str =
    "Analysis Started... (This is a placeholder for backend integration)";

/// Mock interaction finding.
pub const NO_INTERACTIONS_FINDING: &str = "No harmful interactions detected.";

/// Mock per-drug dosage recommendation.
pub const MOCK_DOSAGE_RECOMMENDATION: &str = "Dosage recommendation here (mock)";

/// Mock alternative-medication suggestion.
pub const NO_ALTERNATIVES_SUGGESTION: &str = "No alternative medications needed.";

/// Rendered when the clinical text field is blank.
pub const NO_MEDICAL_TEXT: &str = "No medical text provided.";

/// Fixed lines returned by the mock drug information extractor.
pub const MOCK_EXTRACTED_DETAILS: [&str; 2] = [
    "Drug A: 50mg, twice daily (mock)",
    "Drug B: 10mg, once daily (mock)",
];

/// Default number of drug fields shown by a form front end.
pub const DEFAULT_DRUG_FIELDS: usize = 3;

/// Default upper bound on the number of drug fields per analysis.
pub const DEFAULT_MAX_DRUG_FIELDS: usize = 10;

/// Entity labels treated as drug mentions by the NER filter.
pub const DEFAULT_NER_LABELS: [&str; 4] = ["DRUG", "CHEMICAL", "MISC", "ORG"];

/// Default timeout, in seconds, for outbound HTTP calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default REST bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";

/// Default backend endpoint used by HTTP front ends.
pub const DEFAULT_BACKEND_ENDPOINT: &str = "http://127.0.0.1:8000/analyze";
