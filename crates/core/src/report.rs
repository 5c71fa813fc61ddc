//! Analysis report and its sectioned rendering.

use crate::constants::{ANALYSIS_BANNER, NO_MEDICAL_TEXT};
use chrono::{DateTime, Utc};
use rx_types::{DrugName, PatientAge};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InteractionFinding(String);

impl InteractionFinding {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DosageRecommendation {
    pub drug: DrugName,
    pub recommendation: String,
}

impl DosageRecommendation {
    pub fn new(drug: DrugName, recommendation: impl Into<String>) -> Self {
        Self {
            drug,
            recommendation: recommendation.into(),
        }
    }
}

impl std::fmt::Display for DosageRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.drug, self.recommendation)
    }
}

/// Outcome of drug information extraction from clinical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "details", rename_all = "snake_case")]
pub enum Extraction {
    NotProvided,
    Details(Vec<String>),
}

impl Extraction {
    /// Lines suitable for display, including the "not provided" notice.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Extraction::NotProvided => vec![NO_MEDICAL_TEXT.to_string()],
            Extraction::Details(details) => details.clone(),
        }
    }
}

/// One titled block of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    pub lines: Vec<String>,
}

impl ReportSection {
    fn new(title: &str, lines: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            lines,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    id: Uuid,
    generated_at: DateTime<Utc>,
    age: PatientAge,
    drugs: Vec<DrugName>,
    interactions: Vec<InteractionFinding>,
    dosage: Vec<DosageRecommendation>,
    alternatives: Vec<String>,
    extraction: Extraction,
}

impl AnalysisReport {
    pub fn new(
        age: PatientAge,
        drugs: Vec<DrugName>,
        interactions: Vec<InteractionFinding>,
        dosage: Vec<DosageRecommendation>,
        alternatives: Vec<String>,
        extraction: Extraction,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            age,
            drugs,
            interactions,
            dosage,
            alternatives,
            extraction,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn age(&self) -> PatientAge {
        self.age
    }

    pub fn drugs(&self) -> &[DrugName] {
        &self.drugs
    }

    pub fn interactions(&self) -> &[InteractionFinding] {
        &self.interactions
    }

    pub fn dosage(&self) -> &[DosageRecommendation] {
        &self.dosage
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }

    /// The four report sections, in display order.
    pub fn sections(&self) -> Vec<ReportSection> {
        let drug_list = self
            .drugs
            .iter()
            .map(DrugName::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let mut interactions = vec![format!("Checking interactions between drugs: {drug_list}")];
        interactions.extend(self.interactions.iter().map(|f| f.message().to_string()));

        let mut dosage = vec![format!("Recommended dosages for age {}:", self.age)];
        dosage.extend(self.dosage.iter().map(|d| format!("- {d}")));

        let extraction = match &self.extraction {
            Extraction::NotProvided => vec![NO_MEDICAL_TEXT.to_string()],
            Extraction::Details(details) => {
                let mut lines = vec!["Extracted drug details:".to_string()];
                lines.extend(details.iter().map(|d| format!("- {d}")));
                lines
            }
        };

        vec![
            ReportSection::new("1) Drug Interaction Detection", interactions),
            ReportSection::new("2) Age-Specific Dosage Recommendation", dosage),
            ReportSection::new("3) Alternative Medication Suggestions", self.alternatives.clone()),
            ReportSection::new("4) NLP-Based Drug Information Extraction", extraction),
        ]
    }

    /// Plain-text rendering: banner followed by every section.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(ANALYSIS_BANNER);
        out.push('\n');
        for section in self.sections() {
            out.push('\n');
            out.push_str(&section.title);
            out.push('\n');
            for line in &section.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}
