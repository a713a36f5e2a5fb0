use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use super::provider::{GenerativeError, GenerativeProvider};
use crate::types::AiAnswer;

const SUMMARY_INSTRUCTION: &str =
    "Provide a concise bullet-point summary of the following document:";

/// Shown for an empty question instead of calling the remote endpoint.
const EMPTY_QUERY_PROMPT: &str = "Please enter a question to get an answer.";

const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Retry policy around a generative provider.
///
/// Summarization retries transport failures with exponential backoff and
/// degrades to error text instead of failing the containing request.
/// Grounded answering short-circuits empty queries and surfaces failures
/// to the caller.
pub struct ResilientClient {
    provider: Arc<dyn GenerativeProvider>,
    max_retries: usize,
    backoff_base: Duration,
}

impl ResilientClient {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            provider,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    pub fn with_retry_policy(mut self, max_retries: usize, backoff_base: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff_base = backoff_base;
        self
    }

    /// Summarize `text`. Transport failures are retried up to the budget,
    /// waiting base, 2*base, 4*base, ... after each failed attempt.
    /// A malformed response is terminal. Never returns Err: failures
    /// degrade to descriptive error text.
    pub async fn summarize(&self, text: &str) -> String {
        let prompt = format!("{}\n\n{}", SUMMARY_INSTRUCTION, text);

        let mut last_error = String::new();
        for attempt in 0..self.max_retries {
            match self.provider.generate(&prompt).await {
                Ok(summary) => {
                    if attempt > 0 {
                        info!(
                            provider = self.provider.model_name(),
                            attempt, "Summarization succeeded after retry"
                        );
                    }
                    return summary;
                }
                Err(GenerativeError::Protocol(reason)) => {
                    error!(
                        provider = self.provider.model_name(),
                        error = %reason,
                        "Summarization response malformed"
                    );
                    return format!("Could not generate summary: {}", reason);
                }
                Err(GenerativeError::Transport(reason)) => {
                    let backoff = self.backoff_base * 2u32.pow(attempt as u32);
                    warn!(
                        provider = self.provider.model_name(),
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %reason,
                        "Summarization request failed"
                    );
                    last_error = reason;
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        format!(
            "Could not generate summary after {} attempts: {}",
            self.max_retries, last_error
        )
    }

    /// Grounded question answering. An empty query returns a client-facing
    /// prompt without touching the remote endpoint. Single attempt; the
    /// backoff policy is not applied to grounded calls.
    pub async fn answer(&self, query: &str) -> Result<AiAnswer, GenerativeError> {
        if query.trim().is_empty() {
            return Ok(AiAnswer {
                text: EMPTY_QUERY_PROMPT.to_string(),
                sources: Vec::new(),
            });
        }
        self.provider.generate_grounded(query).await
    }
}
