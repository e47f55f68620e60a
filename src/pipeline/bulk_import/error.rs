//! Error types for the bulk import pipeline.
//!
//! Per-chunk failures are recovered inside the runner; only these reach
//! the caller.

use thiserror::Error;

use crate::pipeline::llm::LlmError;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("No formulas extracted from {chunks} chunk(s)")]
    NothingExtracted { chunks: usize },

    #[error("Import cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}
