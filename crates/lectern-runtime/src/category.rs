use crate::types::SearchResult;

/// Score assigned to browse-mode results: present in the catalog, not ranked.
pub const LISTING_SCORE: f64 = 0.0;

/// Extension shared by every indexed document.
pub const DOC_EXTENSION: &str = ".txt";

/// Category selector meaning "no filtering".
pub const ALL_CATEGORIES: &str = "All";

/// Document category, derived from the filename and never stored.
/// `Unknown` covers anything outside the known corpus layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Animals,
    Engineering,
    History,
    Science,
    Sports,
    Unknown,
}

impl Category {
    /// Parse a category name as clients send it and directories are named.
    pub fn from_name(name: &str) -> Category {
        match name {
            "Animals" => Category::Animals,
            "Engineering" => Category::Engineering,
            "History" => Category::History,
            "Science" => Category::Science,
            "Sports" => Category::Sports,
            _ => Category::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::Engineering => "Engineering",
            Category::History => "History",
            Category::Science => "Science",
            Category::Sports => "Sports",
            Category::Unknown => "Unknown",
        }
    }
}

/// Derive a document's category from its root-relative filename.
///
/// Nested documents take the name of their enclosing top-level directory.
/// Flat `.txt` files predate the categorized layout and fall into the
/// Engineering bucket. Pure and total, so browse-mode and search-mode
/// filtering always agree on the same document.
pub fn classify(filename: &str) -> Category {
    if let Some(idx) = filename.find(['/', '\\']) {
        Category::from_name(&filename[..idx])
    } else if filename.ends_with(DOC_EXTENSION) {
        Category::Engineering
    } else {
        Category::Unknown
    }
}

/// Apply the category selector to a result sequence, preserving order.
/// "All" is the identity. Used on both search-mode and browse-mode output
/// so the two paths share one notion of category membership.
pub fn filter_results(results: Vec<SearchResult>, selector: &str) -> Vec<SearchResult> {
    if selector == ALL_CATEGORIES {
        return results;
    }
    let wanted = Category::from_name(selector);
    results
        .into_iter()
        .filter(|r| classify(&r.filename) == wanted)
        .collect()
}
