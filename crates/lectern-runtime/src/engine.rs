use async_trait::async_trait;
use thiserror::Error;

use crate::types::SearchResult;

/// Failure classes for the external search engine.
/// The gateway maps these onto HTTP statuses; `Crashed` and `Protocol`
/// keep the upstream diagnostic stream for the server-side log.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary could not be spawned at all
    #[error("search engine unavailable: {0}")]
    Unavailable(String),
    /// The engine exited non-zero
    #[error("search engine exited with status {status}: {stderr}")]
    Crashed { status: i32, stderr: String },
    /// stdout did not honor the single-JSON-array contract
    #[error("search engine protocol violation: {reason}")]
    Protocol { reason: String, raw: String },
    /// The engine itself reported an error through its wire contract
    #[error("search engine reported: {0}")]
    Reported(String),
}

/// Black-box search capability: a query string in, ranked results out.
/// The gateway assumes nothing about ranking internals, only this contract.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, EngineError>;
}
