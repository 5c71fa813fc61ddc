//! # rxcheck Core
//!
//! Core business logic for the drug interaction and dosage analysis system.
//!
//! This crate contains the pure analysis operations:
//! - Input validation for age, drug fields and clinical text
//! - Analyser traits with placeholder (mock) implementations
//! - Report building and sectioned text rendering
//! - Drug mention filtering over named-entity recognition output
//!
//! **No API concerns**: HTTP servers, HTTP clients and CLI parsing belong in `api-rest`,
//! `rx-client`, `rx-ner` and `rx-cli`.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod ner;
pub mod report;

pub use analysis::{
    AlternativeAdvisor, AnalysisService, DosageAdvisor, DrugInfoExtractor, InteractionChecker,
};
pub use config::CoreConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use input::{parse_drug_list, AnalysisInput};
pub use ner::{extract_drug_entities, Entity, EntityFilter, EntityRecogniser};
pub use report::{AnalysisReport, DosageRecommendation, Extraction, ReportSection};

pub use rx_types::{AgeError, DrugName, NonEmptyText, PatientAge, TextError};
