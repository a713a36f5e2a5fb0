use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::provider::{GenerativeError, GenerativeProvider};
use crate::types::{AiAnswer, AnswerSource};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Google Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Option<String>,
    grounded_timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            grounded_timeout: Duration::from_secs(90),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Per-call timeouts: plain generation uses the client default,
    /// grounded calls get a longer budget since web search is slow.
    pub fn with_timeouts(mut self, plain: Duration, grounded: Duration) -> Self {
        self.client = ClientBuilder::new()
            .timeout(plain)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        self.grounded_timeout = grounded;
        self
    }

    /// Redact API key from error body to prevent leaking in logs
    fn redact_key(body: &str, key: &str) -> String {
        if key.len() > 4 {
            body.replace(key, &format!("{}...", &key[..4]))
        } else {
            body.to_string()
        }
    }

    /// Build the generateContent URL.
    /// NOTE: Gemini requires the key as a query parameter (Google's design).
    /// Do not log URLs containing the API key.
    fn api_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(GEMINI_BASE_URL);
        format!(
            "{}/models/{}:generateContent?key={}",
            base, self.model, self.api_key
        )
    }

    fn build_request_body(&self, prompt: &str, grounded: bool) -> Value {
        let mut body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });
        if grounded {
            body["tools"] = json!([{"google_search": {}}]);
        }
        body
    }

    async fn post(
        &self,
        body: &Value,
        timeout: Option<Duration>,
    ) -> Result<GeminiApiResponse, GenerativeError> {
        let url = self.api_url();
        let mut request = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerativeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerativeError::Transport(format!(
                "Gemini API error ({}): {}",
                status,
                Self::redact_key(&error_body, &self.api_key)
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GenerativeError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| GenerativeError::Protocol(e.to_string()))
    }

    fn extract_text(response: &GeminiApiResponse) -> Result<String, GenerativeError> {
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| GenerativeError::Protocol("no candidates in response".into()))?;

        let text = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }

    /// Pull attributed web sources out of the grounding metadata, in the
    /// order the API listed them. Attributions missing either field carry
    /// nothing a client can cite, so they are dropped.
    fn extract_sources(response: &GeminiApiResponse) -> Vec<AnswerSource> {
        let Some(candidate) = response.candidates.first() else {
            return Vec::new();
        };
        let Some(ref metadata) = candidate.grounding_metadata else {
            return Vec::new();
        };

        metadata
            .grounding_chunks
            .iter()
            .filter_map(|chunk| {
                let web = chunk.web.as_ref()?;
                match (&web.uri, &web.title) {
                    (Some(uri), Some(title)) => Some(AnswerSource {
                        uri: uri.clone(),
                        title: title.clone(),
                    }),
                    _ => None,
                }
            })
            .collect()
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerativeError> {
        let body = self.build_request_body(prompt, false);
        let response = self.post(&body, None).await?;
        Self::extract_text(&response)
    }

    async fn generate_grounded(&self, prompt: &str) -> Result<AiAnswer, GenerativeError> {
        let body = self.build_request_body(prompt, true);
        let response = self.post(&body, Some(self.grounded_timeout)).await?;

        let text = Self::extract_text(&response)?;
        let sources = Self::extract_sources(&response);
        Ok(AiAnswer { text, sources })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// --- Gemini API response views ---

#[derive(Debug, Deserialize)]
struct GeminiApiResponse {
    #[serde(default)]
    candidates: Vec<GeminiApiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiCandidate {
    content: Option<GeminiApiContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GeminiApiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiContent {
    parts: Option<Vec<GeminiApiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiGroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GeminiApiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiGroundingChunk {
    web: Option<GeminiApiWebSource>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiWebSource {
    uri: Option<String>,
    title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_body_plain() {
        let client = GeminiClient::new("test-key");
        let body = client.build_request_body("Summarize this", false);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarize this");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_build_request_body_grounded() {
        let client = GeminiClient::new("test-key");
        let body = client.build_request_body("Who won?", true);

        assert!(body["tools"][0]["google_search"].is_object());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GeminiApiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hello "}, {"text": "world"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(GeminiClient::extract_text(&response).unwrap(), "Hello world");
    }

    #[test]
    fn test_extract_text_no_candidates_is_protocol_error() {
        let response: GeminiApiResponse = serde_json::from_value(json!({})).unwrap();
        let err = GeminiClient::extract_text(&response).unwrap_err();
        assert!(matches!(err, GenerativeError::Protocol(_)));
    }

    #[test]
    fn test_extract_sources_in_api_order() {
        let response: GeminiApiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "answer"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://b.example", "title": "B"}},
                        {"web": {"uri": "https://a.example", "title": "A"}}
                    ]
                }
            }]
        }))
        .unwrap();

        let sources = GeminiClient::extract_sources(&response);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].uri, "https://b.example");
        assert_eq!(sources[1].title, "A");
    }

    #[test]
    fn test_extract_sources_drops_incomplete_attributions() {
        let response: GeminiApiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "answer"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.example"}},
                        {"web": {"title": "No uri"}},
                        {},
                        {"web": {"uri": "https://ok.example", "title": "Ok"}}
                    ]
                }
            }]
        }))
        .unwrap();

        let sources = GeminiClient::extract_sources(&response);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Ok");
    }

    #[test]
    fn test_extract_sources_empty_without_metadata() {
        let response: GeminiApiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "plain"}]}}]
        }))
        .unwrap();

        assert!(GeminiClient::extract_sources(&response).is_empty());
    }

    #[test]
    fn test_redact_key() {
        let redacted = GeminiClient::redact_key("error: key=AIzaSecretKey invalid", "AIzaSecretKey");
        assert!(!redacted.contains("AIzaSecretKey"));
        assert!(redacted.contains("AIza..."));
    }
}
