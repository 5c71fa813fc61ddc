//! Analysers and the service that runs them.
//!
//! Each analysis concern sits behind its own trait so that a real engine can replace the
//! placeholder without touching the front ends. The `Mock*` implementations return fixed
//! literals and ignore their inputs beyond what is needed to shape the result.

use crate::constants::{
    MOCK_DOSAGE_RECOMMENDATION, MOCK_EXTRACTED_DETAILS, NO_ALTERNATIVES_SUGGESTION,
    NO_INTERACTIONS_FINDING,
};
use crate::input::AnalysisInput;
use crate::report::{AnalysisReport, DosageRecommendation, Extraction, InteractionFinding};
use rx_types::{DrugName, PatientAge};
use std::sync::Arc;

pub trait InteractionChecker: Send + Sync {
    fn check(&self, drugs: &[DrugName]) -> Vec<InteractionFinding>;
}

pub trait DosageAdvisor: Send + Sync {
    /// Must return one recommendation per drug, in input order.
    fn recommend(&self, age: PatientAge, drugs: &[DrugName]) -> Vec<DosageRecommendation>;
}

pub trait AlternativeAdvisor: Send + Sync {
    fn suggest(&self, age: PatientAge, drugs: &[DrugName]) -> Vec<String>;
}

pub trait DrugInfoExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Extraction;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockInteractionChecker;

impl InteractionChecker for MockInteractionChecker {
    fn check(&self, _drugs: &[DrugName]) -> Vec<InteractionFinding> {
        vec![InteractionFinding::new(NO_INTERACTIONS_FINDING)]
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockDosageAdvisor;

impl DosageAdvisor for MockDosageAdvisor {
    fn recommend(&self, _age: PatientAge, drugs: &[DrugName]) -> Vec<DosageRecommendation> {
        drugs
            .iter()
            .map(|drug| DosageRecommendation::new(drug.clone(), MOCK_DOSAGE_RECOMMENDATION))
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockAlternativeAdvisor;

impl AlternativeAdvisor for MockAlternativeAdvisor {
    fn suggest(&self, _age: PatientAge, _drugs: &[DrugName]) -> Vec<String> {
        vec![NO_ALTERNATIVES_SUGGESTION.to_string()]
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockDrugInfoExtractor;

impl DrugInfoExtractor for MockDrugInfoExtractor {
    fn extract(&self, text: &str) -> Extraction {
        if text.trim().is_empty() {
            return Extraction::NotProvided;
        }
        Extraction::Details(MOCK_EXTRACTED_DETAILS.iter().map(|l| l.to_string()).collect())
    }
}

/// Runs every analyser over one [`AnalysisInput`].
#[derive(Clone)]
pub struct AnalysisService {
    interactions: Arc<dyn InteractionChecker>,
    dosage: Arc<dyn DosageAdvisor>,
    alternatives: Arc<dyn AlternativeAdvisor>,
    extractor: Arc<dyn DrugInfoExtractor>,
}

impl AnalysisService {
    pub fn new(
        interactions: Arc<dyn InteractionChecker>,
        dosage: Arc<dyn DosageAdvisor>,
        alternatives: Arc<dyn AlternativeAdvisor>,
        extractor: Arc<dyn DrugInfoExtractor>,
    ) -> Self {
        Self {
            interactions,
            dosage,
            alternatives,
            extractor,
        }
    }

    /// Service wired with the placeholder analysers.
    pub fn mock() -> Self {
        Self::new(
            Arc::new(MockInteractionChecker),
            Arc::new(MockDosageAdvisor),
            Arc::new(MockAlternativeAdvisor),
            Arc::new(MockDrugInfoExtractor),
        )
    }

    pub fn analyse(&self, input: &AnalysisInput) -> AnalysisReport {
        let drugs = input.drugs();
        let age = input.age();

        let report = AnalysisReport::new(
            age,
            drugs.to_vec(),
            self.interactions.check(drugs),
            self.dosage.recommend(age, drugs),
            self.alternatives.suggest(age, drugs),
            self.extractor.extract(input.clinical_text()),
        );

        tracing::info!(
            report_id = %report.id(),
            drug_count = drugs.len(),
            age = age.years(),
            has_text = input.has_clinical_text(),
            "analysis completed"
        );

        report
    }
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::mock()
    }
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(age: i64, drugs: &[&str], text: &str) -> AnalysisInput {
        AnalysisInput::from_form(PatientAge::new(age).unwrap(), drugs, text, 10).unwrap()
    }

    #[test]
    fn test_mock_interactions_ignore_drug_list() {
        let checker = MockInteractionChecker;
        for drugs in [vec!["aspirin"], vec!["warfarin", "aspirin", "ibuprofen"]] {
            let names: Vec<DrugName> = drugs.iter().map(|d| DrugName::new(d).unwrap()).collect();
            let findings = checker.check(&names);
            assert_eq!(findings.len(), 1);
            assert_eq!(findings[0].message(), "No harmful interactions detected.");
        }
    }

    #[test]
    fn test_mock_dosage_one_line_per_drug_in_order() {
        let report = AnalysisService::mock().analyse(&input(120, &["b", "a", "b"], ""));
        let lines: Vec<String> = report.dosage().iter().map(|d| d.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "b: Dosage recommendation here (mock)",
                "a: Dosage recommendation here (mock)",
                "b: Dosage recommendation here (mock)",
            ]
        );
    }

    #[test]
    fn test_mock_alternatives_literal() {
        let report = AnalysisService::mock().analyse(&input(0, &["aspirin"], ""));
        assert_eq!(report.alternatives(), ["No alternative medications needed."]);
    }

    #[test]
    fn test_mock_extraction_blank_and_non_blank() {
        let extractor = MockDrugInfoExtractor;
        assert_eq!(extractor.extract("   \n"), Extraction::NotProvided);

        let first = extractor.extract("Patient takes metformin 500mg bd");
        let second = extractor.extract("anything else at all");
        assert_eq!(first, second);
        match first {
            Extraction::Details(lines) => {
                assert_eq!(
                    lines,
                    vec![
                        "Drug A: 50mg, twice daily (mock)",
                        "Drug B: 10mg, once daily (mock)"
                    ]
                );
            }
            Extraction::NotProvided => panic!("text was provided"),
        }
    }

    struct FlaggingChecker;

    impl InteractionChecker for FlaggingChecker {
        fn check(&self, drugs: &[DrugName]) -> Vec<InteractionFinding> {
            vec![InteractionFinding::new(format!("{} drugs checked", drugs.len()))]
        }
    }

    #[test]
    fn test_service_uses_injected_analysers() {
        let service = AnalysisService::new(
            Arc::new(FlaggingChecker),
            Arc::new(MockDosageAdvisor),
            Arc::new(MockAlternativeAdvisor),
            Arc::new(MockDrugInfoExtractor),
        );
        let report = service.analyse(&input(40, &["aspirin", "ibuprofen"], ""));
        assert_eq!(report.interactions()[0].message(), "2 drugs checked");
    }
}
