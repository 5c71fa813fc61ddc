//! Analysis input validation.
//!
//! Front ends hand over raw field values; this module turns them into an
//! [`AnalysisInput`] or the single warning a user sees when nothing was entered.

use crate::{AnalysisError, AnalysisResult};
use rx_types::{DrugName, PatientAge};

/// Validated input for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    age: PatientAge,
    drugs: Vec<DrugName>,
    clinical_text: String,
}

impl AnalysisInput {
    /// Build an input from raw form values.
    ///
    /// Every drug field is trimmed and blank fields are dropped. The clinical text is kept as
    /// given; a blank text means "not provided".
    ///
    /// # Errors
    ///
    /// - `AnalysisError::InvalidInput` if the number of drug fields is outside
    ///   `[1, max_fields]`.
    /// - `AnalysisError::NoDrugs` if every drug field is blank.
    pub fn from_form<S: AsRef<str>>(
        age: PatientAge,
        drug_fields: &[S],
        clinical_text: impl Into<String>,
        max_fields: usize,
    ) -> AnalysisResult<Self> {
        if drug_fields.is_empty() || drug_fields.len() > max_fields {
            return Err(AnalysisError::InvalidInput(format!(
                "number of drug fields must be between 1 and {max_fields}, got {}",
                drug_fields.len()
            )));
        }

        let drugs: Vec<DrugName> = drug_fields
            .iter()
            .filter_map(|field| DrugName::new(field).ok())
            .collect();

        if drugs.is_empty() {
            return Err(AnalysisError::NoDrugs);
        }

        Ok(Self {
            age,
            drugs,
            clinical_text: clinical_text.into(),
        })
    }

    pub fn age(&self) -> PatientAge {
        self.age
    }

    pub fn drugs(&self) -> &[DrugName] {
        &self.drugs
    }

    pub fn clinical_text(&self) -> &str {
        &self.clinical_text
    }

    pub fn has_clinical_text(&self) -> bool {
        !self.clinical_text.trim().is_empty()
    }
}

/// Split a comma-separated drug list such as `"aspirin, ibuprofen"`.
///
/// Entries are trimmed; blank entries are dropped.
pub fn parse_drug_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
