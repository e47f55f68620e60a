//! Bulk import runner: chunk a document, extract each chunk, collect formulas.
//!
//! Chunks run one LLM call at a time. A failing chunk never aborts the batch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use super::chunker::{PrescriptionChunker, TextChunk};
use super::error::ImportError;
use super::fallback;
use super::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::response::parse_formulas_response;
use super::types::*;
use crate::pipeline::llm::LlmClient;

pub fn new_batch_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct BulkImporter<'a> {
    llm: &'a dyn LlmClient,
    chunker: PrescriptionChunker,
    config: ImportConfig,
}

impl<'a> BulkImporter<'a> {
    pub fn new(llm: &'a dyn LlmClient, config: ImportConfig) -> Result<Self, ImportError> {
        if config.max_chunk_chars == 0 {
            return Err(ImportError::Config("max_chunk_chars must be > 0".into()));
        }
        if config.model_name.trim().is_empty() {
            return Err(ImportError::Config("model_name is empty".into()));
        }
        Ok(Self {
            llm,
            chunker: PrescriptionChunker::new(config.max_chunk_chars),
            config,
        })
    }

    /// Import every formula in `text`. `cancel` is checked before each chunk.
    pub fn run(&self, text: &str, cancel: &AtomicBool) -> Result<ImportReport, ImportError> {
        let start = Instant::now();
        let started_at = Utc::now();
        let batch_id = new_batch_id();

        let chunks = self.chunker.chunk(text);
        tracing::info!(batch_id = %batch_id, chunks = chunks.len(), "Bulk import started");

        let mut outcomes = Vec::with_capacity(chunks.len());
        let mut formulas = Vec::new();

        for chunk in &chunks {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(batch_id = %batch_id, chunk = chunk.index, "Bulk import cancelled");
                return Err(ImportError::Cancelled);
            }

            let (source, extracted) = self.extract_chunk(chunk);
            outcomes.push(ChunkOutcome {
                index: chunk.index,
                title: chunk.title.clone(),
                source,
                formulas: extracted.len(),
            });
            formulas.extend(extracted);
        }

        if formulas.is_empty() {
            tracing::warn!(batch_id = %batch_id, chunks = chunks.len(), "Bulk import extracted nothing");
            return Err(ImportError::NothingExtracted {
                chunks: chunks.len(),
            });
        }

        let report = ImportReport {
            batch_id,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            model_name: self.config.model_name.clone(),
            chunks: outcomes,
            formulas,
        };

        tracing::info!(
            batch_id = %report.batch_id,
            formulas = report.formulas.len(),
            llm = report.count(ChunkSource::Llm),
            fallback = report.count(ChunkSource::Fallback),
            skipped = report.count(ChunkSource::Skipped),
            duration_ms = report.duration_ms,
            "Bulk import complete"
        );

        Ok(report)
    }

    /// LLM first; regex fallback on call failure or unrepairable JSON.
    /// A well-formed response with no formulas is skipped without fallback.
    fn extract_chunk(&self, chunk: &TextChunk) -> (ChunkSource, Vec<ExtractedFormula>) {
        match self.extract_with_llm(chunk) {
            Ok(formulas) if formulas.is_empty() => {
                tracing::debug!(chunk = chunk.index, "No formulas in chunk, skipping");
                (ChunkSource::Skipped, formulas)
            }
            Ok(formulas) => (ChunkSource::Llm, formulas),
            Err(e) => {
                tracing::warn!(
                    chunk = chunk.index,
                    error = %e,
                    "LLM extraction failed for chunk"
                );
                if !self.config.fallback_enabled {
                    return (ChunkSource::Skipped, vec![]);
                }
                let formulas = fallback::extract_formulas(&chunk.content);
                if formulas.is_empty() {
                    tracing::debug!(chunk = chunk.index, "Fallback found nothing, dropping chunk");
                    (ChunkSource::Skipped, formulas)
                } else {
                    (ChunkSource::Fallback, formulas)
                }
            }
        }
    }

    fn extract_with_llm(&self, chunk: &TextChunk) -> Result<Vec<ExtractedFormula>, ImportError> {
        let prompt = build_extraction_prompt(&chunk.content);
        let response = self
            .llm
            .generate(&self.config.model_name, &prompt, EXTRACTION_SYSTEM_PROMPT)?;
        parse_formulas_response(&response)
    }
}
