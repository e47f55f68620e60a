//! Bulk prescription import
//!
//! Turns long prescription documents into structured formulas:
//! ```text
//! chunker → LLM extractor → JSON repair → lenient parse
//!                 ↘ (failure) regex fallback
//! ```
//! Chunks run sequentially and results keep document order.

pub mod chunker;
pub mod error;
pub mod fallback;
pub mod json_repair;
pub mod prompt;
pub mod response;
pub mod runner;
pub mod types;

pub use chunker::{PrescriptionChunker, TextChunk, MAX_CHUNK_CHARS};
pub use error::ImportError;
pub use runner::{new_batch_id, BulkImporter};
pub use types::*;
