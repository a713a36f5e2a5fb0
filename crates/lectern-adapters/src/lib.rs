pub mod docroot_guard;
pub mod document_store;
pub mod subprocess_engine;

pub use docroot_guard::DocRootGuard;
pub use document_store::{DocumentError, DocumentStore};
pub use subprocess_engine::{sanitize_query, SubprocessEngine};
