//! Generated commentary attached to an entry.
//!
//! The editorial is best-effort: [`curate`] turns every failure, including a
//! timeout, into [`EditorialOutcome::Plain`] so the save path never aborts
//! because of it.

use crate::errors::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// A short magazine-style headline and paragraph about one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editorial {
    pub headline: String,
    #[serde(alias = "editorial")]
    pub body: String,
}

/// Something that can write an editorial for an entry.
#[async_trait]
pub trait EditorialGenerator: Send + Sync {
    async fn generate(&self, content: &str, mood: &str) -> Result<Editorial, GenerationError>;
}

/// Result of the enrichment step of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorialOutcome {
    Enriched(Editorial),
    Plain,
}

impl EditorialOutcome {
    pub fn into_editorial(self) -> Option<Editorial> {
        match self {
            EditorialOutcome::Enriched(editorial) => Some(editorial),
            EditorialOutcome::Plain => None,
        }
    }
}

/// Runs the generator with a time limit and folds failure into `Plain`.
pub async fn curate(
    generator: &dyn EditorialGenerator,
    content: &str,
    mood: &str,
    limit: Duration,
) -> EditorialOutcome {
    let result = match tokio::time::timeout(limit, generator.generate(content, mood)).await {
        Ok(result) => result,
        Err(_) => Err(GenerationError::Timeout(limit)),
    };

    match result {
        Ok(editorial) => {
            debug!(headline = %editorial.headline, "editorial generated");
            EditorialOutcome::Enriched(editorial)
        }
        Err(e) => {
            warn!(error = %e, "editorial unavailable, saving entry without it");
            EditorialOutcome::Plain
        }
    }
}

/// Generator used when no API key is configured.
pub struct OfflineGenerator;

#[async_trait]
impl EditorialGenerator for OfflineGenerator {
    async fn generate(&self, _content: &str, _mood: &str) -> Result<Editorial, GenerationError> {
        Err(GenerationError::Unavailable(
            "no API key configured".to_string(),
        ))
    }
}

/// Accepts the structured form, the legacy JSON-string form, or null.
///
/// A legacy string that does not decode to an editorial is treated as absent.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Editorial>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Structured(Editorial),
        Encoded(String),
    }

    Ok(match Option::<Stored>::deserialize(deserializer)? {
        Some(Stored::Structured(editorial)) => Some(editorial),
        Some(Stored::Encoded(raw)) => serde_json::from_str(&raw).ok(),
        None => None,
    })
}
