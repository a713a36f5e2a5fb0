use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use lectern_runtime::{EngineError, SearchEngine, SearchResult};

/// Strip everything except alphanumerics and whitespace, then trim.
/// The result is handed to the engine as a single argv entry, so nothing
/// shell-significant can survive to the invocation.
pub fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Search engine backed by the external indexing binary.
/// One invocation per query; stdout carries a single JSON array of
/// `{filename, score}` records, or `[{"error": ...}]` for an engine-side
/// failure. The process is never started through a shell.
pub struct SubprocessEngine {
    binary: PathBuf,
}

impl SubprocessEngine {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    fn parse_stdout(raw: &str) -> Result<Vec<SearchResult>, EngineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            // No output means no results, not a violation
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(trimmed).map_err(|e| EngineError::Protocol {
            reason: format!("stdout is not valid JSON: {}", e),
            raw: trimmed.to_string(),
        })?;

        let Some(items) = value.as_array() else {
            return Err(EngineError::Protocol {
                reason: "expected a single JSON array".to_string(),
                raw: trimmed.to_string(),
            });
        };

        // An engine-side failure arrives as a one-element array whose first
        // entry is an error object
        if let Some(reported) = items.first().and_then(|first| first.get("error")) {
            let message = reported
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| reported.to_string());
            return Err(EngineError::Reported(message));
        }

        serde_json::from_value(value).map_err(|e| EngineError::Protocol {
            reason: format!("records do not match the {{filename, score}} schema: {}", e),
            raw: trimmed.to_string(),
        })
    }
}

#[async_trait]
impl SearchEngine for SubprocessEngine {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, EngineError> {
        let sanitized = sanitize_query(query);
        if sanitized.is_empty() {
            debug!("Query empty after sanitization, skipping engine invocation");
            return Ok(Vec::new());
        }

        debug!(binary = %self.binary.display(), query = %sanitized, "Invoking search engine");

        let output = Command::new(&self.binary)
            .arg(&sanitized)
            .output()
            .await
            .map_err(|e| EngineError::Unavailable(format!("{}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            return Err(EngineError::Crashed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Self::parse_stdout(&String::from_utf8_lossy(&output.stdout))
    }
}
