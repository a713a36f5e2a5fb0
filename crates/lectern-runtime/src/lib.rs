pub mod category;
pub mod engine;
pub mod generative;
pub mod types;

pub use category::{classify, filter_results, Category, ALL_CATEGORIES, DOC_EXTENSION, LISTING_SCORE};
pub use engine::{EngineError, SearchEngine};
pub use generative::{GeminiClient, GenerativeError, GenerativeProvider, ResilientClient};
pub use types::{AiAnswer, AnswerSource, DocumentContent, SearchResult, SummaryResult};

/// Initialize structured JSON logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
