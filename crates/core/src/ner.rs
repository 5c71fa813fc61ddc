//! Drug mention filtering over named-entity recognition output.
//!
//! The recogniser itself lives outside this crate (see `rx-ner`); this module only decides
//! which recognised spans count as drug names.

use crate::constants::DEFAULT_NER_LABELS;
use crate::{AnalysisError, AnalysisResult, CoreConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One aggregated entity span, as produced by a token-classification pipeline using simple
/// aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_group: String,
    pub word: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

/// Source of entity spans for a piece of free text.
#[async_trait]
pub trait EntityRecogniser: Send + Sync {
    async fn recognise(&self, text: &str) -> AnalysisResult<Vec<Entity>>;
}

/// Label and score filter applied to recogniser output.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFilter {
    labels: Vec<String>,
    min_score: f32,
}

impl EntityFilter {
    pub fn new(labels: Vec<String>, min_score: f32) -> Self {
        Self { labels, min_score }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(cfg.ner_labels().to_vec(), cfg.ner_min_score())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Unique drug names, in order of first occurrence.
    ///
    /// Labels are compared exactly; words are deduplicated by exact string match with no
    /// normalisation.
    pub fn drug_names(&self, entities: &[Entity]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entity in entities {
            if !self.labels.iter().any(|l| *l == entity.entity_group) {
                continue;
            }
            if entity.score < self.min_score {
                continue;
            }
            if !names.contains(&entity.word) {
                names.push(entity.word.clone());
            }
        }
        names
    }
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NER_LABELS.iter().map(|l| l.to_string()).collect(), 0.0)
    }
}

/// Run `recogniser` over `text` and keep the drug mentions.
///
/// Blank text is answered without calling the recogniser.
pub async fn extract_drug_entities(
    recogniser: &dyn EntityRecogniser,
    filter: &EntityFilter,
    text: &str,
) -> AnalysisResult<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let entities = recogniser.recognise(text).await?;
    let names = filter.drug_names(&entities);
    tracing::debug!(
        entities = entities.len(),
        drugs = names.len(),
        "filtered recognised entities"
    );
    Ok(names)
}

/// Wrap a recogniser-specific error for callers that only see [`AnalysisError`].
pub fn recogniser_error<E>(err: E) -> AnalysisError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AnalysisError::Recogniser(Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entity(group: &str, word: &str, score: f32) -> Entity {
        Entity {
            entity_group: group.into(),
            word: word.into(),
            score,
            start: None,
            end: None,
        }
    }

    #[test]
    fn test_drug_names_filters_by_label_and_dedupes_in_order() {
        let entities = vec![
            entity("PER", "Dr Smith", 0.99),
            entity("MISC", "aspirin", 0.91),
            entity("ORG", "Pfizer", 0.80),
            entity("LOC", "London", 0.95),
            entity("MISC", "aspirin", 0.70),
            entity("CHEMICAL", "Aspirin", 0.60),
        ];
        assert_eq!(
            EntityFilter::default().drug_names(&entities),
            vec!["aspirin", "Pfizer", "Aspirin"]
        );
    }

    #[test]
    fn test_drug_names_applies_min_score() {
        let filter = EntityFilter::new(vec!["DRUG".into()], 0.5);
        let entities = vec![entity("DRUG", "heparin", 0.4), entity("DRUG", "warfarin", 0.5)];
        assert_eq!(filter.drug_names(&entities), vec!["warfarin"]);
    }

    #[test]
    fn test_entity_deserialises_pipeline_output() {
        let json = r#"[{"entity_group":"MISC","score":0.87,"word":"ibuprofen","start":10,"end":19}]"#;
        let entities: Vec<Entity> = serde_json::from_str(json).unwrap();
        assert_eq!(entities[0].word, "ibuprofen");
        assert_eq!(entities[0].start, Some(10));
    }

    struct CountingRecogniser {
        calls: AtomicUsize,
        entities: Vec<Entity>,
    }

    #[async_trait]
    impl EntityRecogniser for CountingRecogniser {
        async fn recognise(&self, _text: &str) -> AnalysisResult<Vec<Entity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entities.clone())
        }
    }

    #[tokio::test]
    async fn test_extract_drug_entities_skips_blank_text() {
        let recogniser = CountingRecogniser {
            calls: AtomicUsize::new(0),
            entities: vec![entity("DRUG", "aspirin", 1.0)],
        };
        let filter = EntityFilter::default();

        let names = extract_drug_entities(&recogniser, &filter, "  ").await.unwrap();
        assert!(names.is_empty());
        assert_eq!(recogniser.calls.load(Ordering::SeqCst), 0);

        let names = extract_drug_entities(&recogniser, &filter, "aspirin 75mg")
            .await
            .unwrap();
        assert_eq!(names, vec!["aspirin"]);
        assert_eq!(recogniser.calls.load(Ordering::SeqCst), 1);
    }
}
