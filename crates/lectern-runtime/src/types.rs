use serde::{Deserialize, Serialize};

/// One retrieval hit: a root-relative filename plus its score.
/// Search-mode scores come from the engine; browse-mode results carry the
/// listing-marker score (present in the catalog, not ranked).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub filename: String,
    pub score: f64,
}

/// Raw document payload, decoded verbatim
#[derive(Debug, Serialize)]
pub struct DocumentContent {
    pub content: String,
}

/// Summary payload; carries degraded error text when the generative call failed
#[derive(Debug, Serialize)]
pub struct SummaryResult {
    pub summary: String,
}

/// Web source attributed by the generative API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSource {
    pub uri: String,
    pub title: String,
}

/// Grounded answer: text plus attributed sources, kept in provider order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnswer {
    pub text: String,
    pub sources: Vec<AnswerSource>,
}
