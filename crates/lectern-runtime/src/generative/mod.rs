pub mod gemini;
pub mod provider;
pub mod resilient;

pub use gemini::GeminiClient;
pub use provider::{GenerativeError, GenerativeProvider};
pub use resilient::ResilientClient;
