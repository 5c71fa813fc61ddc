//! JSON request/response bodies for the rxcheck HTTP API.

use rx_core::AnalysisReport;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeReq {
    /// Free-text drug names; blank entries are ignored.
    pub drugs: Vec<String>,
    /// Patient age in years, 0 to 120.
    pub age: i64,
    /// Optional clinical narrative for drug information extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DosageEntry {
    pub drug: String,
    pub recommendation: String,
}

/// Body returned by `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRes {
    pub interactions: Vec<String>,
    pub dosage: Vec<DosageEntry>,
    pub alternatives: Vec<String>,
    /// Present only when the request carried a `text` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<Vec<String>>,
}

impl AnalyzeRes {
    pub fn from_report(report: &AnalysisReport, include_extraction: bool) -> Self {
        Self {
            interactions: report
                .interactions()
                .iter()
                .map(|f| f.message().to_string())
                .collect(),
            dosage: report
                .dosage()
                .iter()
                .map(|d| DosageEntry {
                    drug: d.drug.to_string(),
                    recommendation: d.recommendation.clone(),
                })
                .collect(),
            alternatives: report.alternatives().to_vec(),
            extraction: include_extraction.then(|| report.extraction().lines()),
        }
    }
}

/// Body of `POST /extract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractReq {
    pub text: String,
}

/// Body returned by `POST /extract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtractRes {
    pub drugs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_core::{AnalysisInput, AnalysisService, PatientAge};

    #[test]
    fn test_analyze_req_text_is_optional() {
        let req: AnalyzeReq =
            serde_json::from_str(r#"{"drugs":["aspirin","ibuprofen"],"age":30}"#).unwrap();
        assert_eq!(req.drugs, vec!["aspirin", "ibuprofen"]);
        assert_eq!(req.text, None);
    }

    #[test]
    fn test_analyze_res_from_report() {
        let input = AnalysisInput::from_form(
            PatientAge::new(30).unwrap(),
            &["aspirin", "ibuprofen"],
            "",
            10,
        )
        .unwrap();
        let report = AnalysisService::mock().analyse(&input);

        let res = AnalyzeRes::from_report(&report, false);
        assert_eq!(res.interactions, vec!["No harmful interactions detected."]);
        assert_eq!(res.dosage.len(), 2);
        assert_eq!(res.dosage[1].drug, "ibuprofen");
        assert_eq!(res.alternatives, vec!["No alternative medications needed."]);

        let json = serde_json::to_value(&res).unwrap();
        assert!(json.get("extraction").is_none());

        let with_text = AnalyzeRes::from_report(&report, true);
        assert_eq!(
            with_text.extraction,
            Some(vec!["No medical text provided.".to_string()])
        );
    }
}
