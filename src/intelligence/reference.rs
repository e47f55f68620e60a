use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::helpers::lookup_variants;
use super::normalize::{contains_phrase, normalize_name};
use super::reference_data;
use super::types::{CustomActive, ReferenceError, SubstanceProfile, TopicalLimit};

/// Default ceiling for percentage-dosed substances with no topical entry.
pub const DEFAULT_TOPICAL_CEILING: f64 = 10.0;

/// One row of the commercial→scientific name table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameMapping {
    pub pattern: String,
    /// Canonical name, or empty to strip the pattern.
    pub target: String,
}

#[derive(Deserialize)]
struct SubstancesFile {
    version: String,
    substances: BTreeMap<String, SubstanceProfile>,
}

/// Static pharmacological reference. Loaded once, shared read-only.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub version: String,
    pub substances: BTreeMap<String, SubstanceProfile>,
    /// substance_a → substance_b → description. Not guaranteed symmetric.
    pub interactions: BTreeMap<String, BTreeMap<String, String>>,
    pub topical_limits: BTreeMap<String, TopicalLimit>,
    pub name_map: Vec<NameMapping>,
    pub known_safe: Vec<String>,
}

impl ReferenceData {
    /// The dataset compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            version: reference_data::BUILTIN_VERSION.to_string(),
            substances: reference_data::substances(),
            interactions: reference_data::interactions(),
            topical_limits: reference_data::topical_limits(),
            name_map: reference_data::name_map(),
            known_safe: reference_data::known_safe(),
        }
    }

    /// Load reference data from JSON files in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ReferenceError> {
        let substances: SubstancesFile = read_json(dir, "substances.json")?;
        let data = Self {
            version: substances.version,
            substances: substances.substances,
            interactions: read_json(dir, "interactions.json")?,
            topical_limits: read_json(dir, "topical_limits.json")?,
            name_map: read_json(dir, "name_map.json")?,
            known_safe: read_json(dir, "known_safe.json")?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Prefer JSON files in `dir` when present, otherwise the builtin dataset.
    pub fn load_or_builtin(dir: &Path) -> Result<Self, ReferenceError> {
        if dir.join("substances.json").exists() {
            let data = Self::load(dir)?;
            tracing::info!(
                version = %data.version,
                substances = data.substances.len(),
                "Loaded reference data from disk"
            );
            Ok(data)
        } else {
            tracing::debug!(dir = %dir.display(), "No reference files found, using builtin dataset");
            Ok(Self::builtin())
        }
    }

    fn validate(&self) -> Result<(), ReferenceError> {
        for (name, profile) in &self.substances {
            if !(profile.max_daily_dose.is_finite() && profile.max_daily_dose > 0.0) {
                return Err(ReferenceError::InvalidProfile {
                    name: name.clone(),
                    reason: format!("maxDailyDose must be > 0, got {}", profile.max_daily_dose),
                });
            }
        }
        for (name, limit) in &self.topical_limits {
            if !(limit.max_percentage.is_finite() && limit.max_percentage > 0.0) {
                return Err(ReferenceError::InvalidProfile {
                    name: name.clone(),
                    reason: format!("maxPercentage must be > 0, got {}", limit.max_percentage),
                });
            }
        }
        Ok(())
    }

    pub fn substance(&self, key: &str) -> Option<&SubstanceProfile> {
        self.substances.get(key)
    }

    pub fn topical_limit(&self, key: &str) -> Option<&TopicalLimit> {
        self.topical_limits.get(key)
    }

    /// Interaction text for a pair, trying the stored direction first.
    pub fn interaction_description(&self, a: &str, b: &str) -> Option<&str> {
        self.interactions
            .get(a)
            .and_then(|inner| inner.get(b))
            .or_else(|| self.interactions.get(b).and_then(|inner| inner.get(a)))
            .map(|s| s.as_str())
    }

    pub fn is_known_safe(&self, normalized: &str) -> bool {
        self.known_safe
            .iter()
            .any(|safe| contains_phrase(normalized, safe))
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ReferenceError> {
    let path = dir.join(file);
    let json = std::fs::read_to_string(&path)
        .map_err(|e| ReferenceError::Load(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| ReferenceError::Parse(file.into(), e.to_string()))
}

// ---------------------------------------------------------------------------
// KnowledgeBase: reference data + per-engine custom actives
// ---------------------------------------------------------------------------

/// A substance resolved from a normalized name.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a, T> {
    pub key: &'a str,
    pub entry: &'a T,
}

/// Read-only view used by the validators. Custom actives shadow the reference.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    reference: Arc<ReferenceData>,
    custom: BTreeMap<String, SubstanceProfile>,
}

impl KnowledgeBase {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            custom: BTreeMap::new(),
        }
    }

    /// Add pharmacy-defined actives. Invalid limits are skipped.
    pub fn with_custom_actives(mut self, actives: &[CustomActive]) -> Self {
        for active in actives {
            if !(active.max_daily_dose.is_finite() && active.max_daily_dose > 0.0) {
                tracing::warn!(
                    name = %active.name,
                    max = active.max_daily_dose,
                    "Ignoring custom active with invalid maxDailyDose"
                );
                continue;
            }
            let key = normalize_name(&active.name, &self.reference.name_map);
            if key.is_empty() {
                continue;
            }
            self.custom.insert(key, active.to_profile());
        }
        self
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn normalize(&self, raw: &str) -> String {
        normalize_name(raw, &self.reference.name_map)
    }

    pub fn is_known_safe(&self, normalized: &str) -> bool {
        self.reference.is_known_safe(normalized)
    }

    /// Find a substance profile by trying the lookup variants in order.
    pub fn resolve(&self, normalized: &str) -> Option<Resolved<'_, SubstanceProfile>> {
        for candidate in lookup_variants(normalized) {
            if let Some((key, entry)) = self.custom.get_key_value(candidate.as_str()) {
                return Some(Resolved { key, entry });
            }
            if let Some((key, entry)) = self.reference.substances.get_key_value(candidate.as_str()) {
                return Some(Resolved { key, entry });
            }
        }
        None
    }

    pub fn resolve_topical(&self, normalized: &str) -> Option<Resolved<'_, TopicalLimit>> {
        lookup_variants(normalized).into_iter().find_map(|candidate| {
            self.reference
                .topical_limits
                .get_key_value(candidate.as_str())
                .map(|(key, entry)| Resolved { key, entry })
        })
    }

    pub fn interaction_description(&self, a: &str, b: &str) -> Option<&str> {
        self.reference.interaction_description(a, b)
    }
}
