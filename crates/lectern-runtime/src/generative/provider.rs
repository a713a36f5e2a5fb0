use async_trait::async_trait;
use thiserror::Error;

use crate::types::AiAnswer;

/// Failure classes for the generative-text endpoint.
/// Transport failures are retryable; a malformed 2xx body is terminal.
#[derive(Debug, Error)]
pub enum GenerativeError {
    /// Connection failure, timeout, or non-2xx status
    #[error("generative API transport failure: {0}")]
    Transport(String),
    /// 2xx response that does not match the expected schema
    #[error("generative API returned a malformed response: {0}")]
    Protocol(String),
}

/// Generative-text provider abstraction. One concrete remote-backed
/// implementation plus test doubles for the gateway's own suite.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Plain text generation from a prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerativeError>;

    /// Generation with web grounding enabled; attributed sources included
    /// when the provider returns grounding metadata
    async fn generate_grounded(&self, prompt: &str) -> Result<AiAnswer, GenerativeError>;

    /// Provider model name for logging
    fn model_name(&self) -> &str;
}
