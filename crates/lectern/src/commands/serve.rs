use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use lectern_adapters::{DocRootGuard, DocumentStore, SubprocessEngine};
use lectern_gateway::{start_server, AppState};
use lectern_runtime::{GeminiClient, GenerativeProvider, ResilientClient};

use crate::config::Config;

pub async fn execute(host: Option<String>, port: Option<u16>, config: &Config) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(config.server.port);

    info!(host = %host, port, "Starting retrieval gateway");

    let root = expand(&config.documents.root);
    let guard = DocRootGuard::new(root).context("Document root is not accessible")?;
    let store = Arc::new(DocumentStore::new(guard));
    info!(root = %store.root().display(), "Serving documents");

    let engine = Arc::new(SubprocessEngine::new(expand(&config.engine.binary)));

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; summary and answer routes will report failures");
    }
    let provider: Arc<dyn GenerativeProvider> = Arc::new(
        GeminiClient::new(&api_key)
            .with_model(&config.generative.model)
            .with_timeouts(
                Duration::from_secs(config.generative.summarize_timeout_secs),
                Duration::from_secs(config.generative.answer_timeout_secs),
            ),
    );
    let generative = Arc::new(ResilientClient::new(provider).with_retry_policy(
        config.generative.max_retries,
        Duration::from_secs(config.generative.backoff_base_secs),
    ));

    let state = AppState {
        engine,
        store,
        generative,
        index_page: expand(&config.server.index_page),
    };

    start_server(state, &host, port).await
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
