//! archgraph analyze: asks a hosted LLM to describe a repository as an
//! architecture graph, then validates the answer and retries with the
//! violations until it conforms.
//!
//! LLM calls go to external APIs (Anthropic or OpenAI); nothing runs locally.

pub mod analyzer;
pub mod config;
pub mod extract;
pub mod prompt;
pub mod providers;
pub mod types;

pub use analyzer::Analyzer;
pub use config::LlmConfig;
pub use extract::extract_json;
pub use providers::{HttpModelClient, ModelClient};
pub use types::*;
