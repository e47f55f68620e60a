use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use sha2::{Digest, Sha256};

use super::detection::detect_formulation_type;
use super::interactions::detect_interactions;
use super::parser::{parse_actives, ParseOutcome};
use super::reference::{KnowledgeBase, ReferenceData};
use super::types::{CustomActive, FormulationAnalysis, ParsedActive, ViabilityNote};
use super::validator::{total_percentage, validate_active, validate_load, ActiveCheck};
use super::viability;

/// Default number of cached analyses.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

type CacheKey = [u8; 32];

/// Top-level analysis entry point.
/// Wires detection, parsing, validation, interactions and viability together.
pub struct FormulaEngine {
    kb: KnowledgeBase,
    cache: Mutex<HashMap<CacheKey, FormulationAnalysis>>,
    cache_capacity: usize,
}

impl FormulaEngine {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            kb: KnowledgeBase::new(reference),
            cache: Mutex::new(HashMap::new()),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Cap the result cache. Zero disables caching.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Extend the knowledge base with pharmacy-defined actives.
    pub fn with_custom_actives(self, actives: &[CustomActive]) -> Self {
        Self {
            kb: self.kb.with_custom_actives(actives),
            cache: Mutex::new(HashMap::new()),
            cache_capacity: self.cache_capacity,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Parse a text with the formulation type detected from it.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        parse_actives(text, detect_formulation_type(text))
    }

    /// Analyze a formula text. Never fails: unparseable lines are counted,
    /// unknown substances are reported as safe.
    pub fn analyze(&self, text: &str) -> FormulationAnalysis {
        let key = cache_key(text);
        if let Some(hit) = self.cached(&key) {
            return hit;
        }

        let start = Instant::now();
        let analysis = self.run_analysis(text);

        tracing::info!(
            formulation = analysis.formulation_type.as_str(),
            actives = analysis.safe_actives.len() + analysis.alerts.len(),
            alerts = analysis.alerts.len(),
            interactions = analysis.interactions.len(),
            skipped = analysis.skipped_lines,
            processing_ms = start.elapsed().as_millis() as u64,
            "Formula analysis complete"
        );

        self.store(key, &analysis);
        analysis
    }

    /// Viability of the formula if `candidate` were added to it.
    pub fn check_addition(&self, text: &str, candidate: &ParsedActive) -> Option<ViabilityNote> {
        let formulation = detect_formulation_type(text);
        let outcome = parse_actives(text, formulation);
        viability::assess(&outcome.actives, formulation, Some(candidate))
    }

    fn run_analysis(&self, text: &str) -> FormulationAnalysis {
        let formulation = detect_formulation_type(text);
        let ParseOutcome {
            actives,
            skipped_lines,
        } = parse_actives(text, formulation);

        let mut analysis = FormulationAnalysis {
            formulation_type: formulation,
            skipped_lines,
            ..Default::default()
        };

        for active in &actives {
            match validate_active(&self.kb, active, formulation) {
                ActiveCheck::Alert(alert) => analysis.alerts.push(alert),
                ActiveCheck::Unknown => {
                    analysis.safe_actives.push(active.name.clone());
                    analysis.unknown_actives.push(active.name.clone());
                }
                ActiveCheck::KnownSafe | ActiveCheck::Within => {
                    analysis.safe_actives.push(active.name.clone());
                }
            }
        }

        if formulation.checks_topical() {
            let total = total_percentage(&actives);
            analysis.total_percentage = Some(total);
            if let Some(alert) = validate_load(total) {
                analysis.alerts.push(alert);
            }
        }

        analysis.interactions = detect_interactions(&self.kb, &actives);
        analysis.viability = viability::assess(&actives, formulation, None);
        analysis
    }

    fn cached(&self, key: &CacheKey) -> Option<FormulationAnalysis> {
        if self.cache_capacity == 0 {
            return None;
        }
        self.cache.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: CacheKey, analysis: &FormulationAnalysis) {
        if self.cache_capacity == 0 {
            return;
        }
        let Ok(mut cache) = self.cache.lock() else {
            tracing::warn!("Analysis cache lock poisoned, skipping cache");
            return;
        };
        if cache.len() >= self.cache_capacity {
            cache.clear();
        }
        cache.insert(key, analysis.clone());
    }
}

fn cache_key(text: &str) -> CacheKey {
    Sha256::digest(text.as_bytes()).into()
}
