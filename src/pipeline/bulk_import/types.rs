use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chunker::MAX_CHUNK_CHARS;

// ═══════════════════════════════════════════
// Closed vocabularies
// ═══════════════════════════════════════════

/// Dosage form of an extracted formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PharmaceuticalForm {
    Capsule,
    Sachet,
    Powder,
    Tablet,
    Solution,
    Cream,
    Gel,
    Lotion,
    Ointment,
    Serum,
    Shampoo,
    #[default]
    Unknown,
}

const FORM_LABELS: &[(&str, PharmaceuticalForm)] = &[
    ("cápsula", PharmaceuticalForm::Capsule),
    ("capsula", PharmaceuticalForm::Capsule),
    ("capsule", PharmaceuticalForm::Capsule),
    ("sachê", PharmaceuticalForm::Sachet),
    ("sache", PharmaceuticalForm::Sachet),
    ("sachet", PharmaceuticalForm::Sachet),
    ("pó", PharmaceuticalForm::Powder),
    ("powder", PharmaceuticalForm::Powder),
    ("comprimido", PharmaceuticalForm::Tablet),
    ("tablet", PharmaceuticalForm::Tablet),
    ("solução", PharmaceuticalForm::Solution),
    ("solucao", PharmaceuticalForm::Solution),
    ("solution", PharmaceuticalForm::Solution),
    ("gotas", PharmaceuticalForm::Solution),
    ("creme", PharmaceuticalForm::Cream),
    ("cream", PharmaceuticalForm::Cream),
    ("gel", PharmaceuticalForm::Gel),
    ("loção", PharmaceuticalForm::Lotion),
    ("locao", PharmaceuticalForm::Lotion),
    ("lotion", PharmaceuticalForm::Lotion),
    ("pomada", PharmaceuticalForm::Ointment),
    ("ointment", PharmaceuticalForm::Ointment),
    ("sérum", PharmaceuticalForm::Serum),
    ("serum", PharmaceuticalForm::Serum),
    ("shampoo", PharmaceuticalForm::Shampoo),
    ("xampu", PharmaceuticalForm::Shampoo),
];

impl PharmaceuticalForm {
    /// Map a free-text label (pt-BR or English) to a form.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        FORM_LABELS
            .iter()
            .find(|(key, _)| lower.contains(key))
            .map(|(_, form)| *form)
            .unwrap_or_default()
    }

    /// First form named in running text. Matches word prefixes only, so
    /// "após" is not read as "pó".
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .find_map(|word| {
                FORM_LABELS
                    .iter()
                    .find(|(key, _)| word.starts_with(key))
                    .map(|(_, form)| *form)
            })
            .unwrap_or_default()
    }

    pub fn is_topical(&self) -> bool {
        matches!(
            self,
            Self::Cream | Self::Gel | Self::Lotion | Self::Ointment | Self::Serum | Self::Shampoo
        )
    }
}

/// Prescribing specialty of an extracted formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Dermatology,
    Trichology,
    Endocrinology,
    Nutrology,
    Orthomolecular,
    Sports,
    Gynecology,
    Psychiatry,
    Geriatrics,
    #[default]
    Unknown,
}

impl Specialty {
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        const TABLE: &[(&str, Specialty)] = &[
            ("tricolog", Specialty::Trichology),
            ("tricholog", Specialty::Trichology),
            ("dermato", Specialty::Dermatology),
            ("endocrino", Specialty::Endocrinology),
            ("nutrolog", Specialty::Nutrology),
            ("nutri", Specialty::Nutrology),
            ("ortomolecular", Specialty::Orthomolecular),
            ("orthomolecular", Specialty::Orthomolecular),
            ("esport", Specialty::Sports),
            ("sport", Specialty::Sports),
            ("gineco", Specialty::Gynecology),
            ("gyneco", Specialty::Gynecology),
            ("psiquiat", Specialty::Psychiatry),
            ("psychiat", Specialty::Psychiatry),
            ("geriat", Specialty::Geriatrics),
        ];
        TABLE
            .iter()
            .find(|(key, _)| lower.contains(key))
            .map(|(_, s)| *s)
            .unwrap_or(Specialty::Unknown)
    }
}

// ═══════════════════════════════════════════
// Extracted records
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedActive {
    pub name: String,
    /// Concentration in mg when known. UI and % values keep their raw number.
    pub concentration_mg: Option<f64>,
    /// Dose as written in the source ("500mg", "10 bilhões UFC").
    pub concentration_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedFormula {
    pub name: String,
    pub category: String,
    pub pharmaceutical_form: PharmaceuticalForm,
    pub specialty: Specialty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_indication: Option<String>,
    pub actives: Vec<ExtractedActive>,
}

// ═══════════════════════════════════════════
// Configuration & report
// ═══════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub model_name: String,
    pub max_chunk_chars: usize,
    /// Run the regex extractor when the LLM fails for a chunk.
    pub fallback_enabled: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            model_name: "llama3.1:8b".to_string(),
            max_chunk_chars: MAX_CHUNK_CHARS,
            fallback_enabled: true,
        }
    }
}

/// How a chunk's formulas were obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChunkSource {
    Llm,
    Fallback,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkOutcome {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source: ChunkSource,
    pub formulas: usize,
}

/// Result of one bulk import run. Formulas are in chunk order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub model_name: String,
    pub chunks: Vec<ChunkOutcome>,
    pub formulas: Vec<ExtractedFormula>,
}

impl ImportReport {
    pub fn count(&self, source: ChunkSource) -> usize {
        self.chunks.iter().filter(|c| c.source == source).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_from_portuguese_labels() {
        assert_eq!(PharmaceuticalForm::from_label("Cápsulas"), PharmaceuticalForm::Capsule);
        assert_eq!(PharmaceuticalForm::from_label("Creme não iônico"), PharmaceuticalForm::Cream);
        assert_eq!(PharmaceuticalForm::from_label("Loção capilar"), PharmaceuticalForm::Lotion);
        assert_eq!(PharmaceuticalForm::from_label("???"), PharmaceuticalForm::Unknown);
        assert_eq!(
            PharmaceuticalForm::from_text("Tomar após o almoço, 60 cápsulas"),
            PharmaceuticalForm::Capsule
        );
        assert!(PharmaceuticalForm::Gel.is_topical());
        assert!(!PharmaceuticalForm::Capsule.is_topical());
    }

    #[test]
    fn specialty_from_labels() {
        assert_eq!(Specialty::from_label("Dermatologia"), Specialty::Dermatology);
        assert_eq!(Specialty::from_label("Tricologia"), Specialty::Trichology);
        assert_eq!(Specialty::from_label("Medicina Esportiva"), Specialty::Sports);
        assert_eq!(Specialty::from_label(""), Specialty::Unknown);
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&PharmaceuticalForm::Sachet).unwrap(), "\"sachet\"");
        assert_eq!(serde_json::to_string(&Specialty::Unknown).unwrap(), "\"unknown\"");
    }

    #[test]
    fn default_config_uses_chunk_ceiling() {
        let config = ImportConfig::default();
        assert_eq!(config.max_chunk_chars, 1500);
        assert!(config.fallback_enabled);
    }
}
