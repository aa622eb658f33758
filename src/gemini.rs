//! Gemini HTTP client for editorial generation.

use crate::editorial::{Editorial, EditorialGenerator};
use crate::errors::GenerationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const EDITOR_PROMPT: &str = r#"You are the editor-in-chief of a glossy fashion and lifestyle magazine.
Turn the reader's private diary entry into a tiny magazine feature about their day.

Rules:
- Write a punchy headline of at most eight words.
- Write one short paragraph (two to four sentences) in a chic, playful, affectionate voice.
- Stay faithful to what the entry says; do not invent events.
- Answer with JSON only: {"headline": "...", "editorial": "..."}"#;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the `generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    fn prompt(content: &str, mood: &str) -> String {
        format!("{EDITOR_PROMPT}\n\nMood: {mood}\n\nEntry:\n---\n{content}\n---")
    }
}

#[async_trait]
impl EditorialGenerator for GeminiClient {
    async fn generate(&self, content: &str, mood: &str) -> Result<Editorial, GenerationError> {
        debug!(model = %self.model, "requesting editorial");

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::prompt(content, mood),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            GenerationError::MalformedResponse(format!("unexpected response body: {e}"))
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse("no text candidate".to_string()))?;

        parse_editorial(&text)
    }
}

/// Reads `{"headline", "editorial"}` out of model text, tolerating a code fence.
fn parse_editorial(text: &str) -> Result<Editorial, GenerationError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let editorial: Editorial = serde_json::from_str(unfenced)
        .map_err(|e| GenerationError::MalformedResponse(format!("editorial is not JSON: {e}")))?;

    if editorial.headline.trim().is_empty() || editorial.body.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "empty headline or body".to_string(),
        ));
    }
    Ok(editorial)
}
