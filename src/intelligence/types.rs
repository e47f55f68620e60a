use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// FormulationType
// ---------------------------------------------------------------------------

/// Route inferred from the formula text. Gates which validation rules apply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormulationType {
    /// Capsules, sachets, powders: dosed in mass units.
    #[default]
    Oral,
    /// Creams, gels, lotions: dosed in percentage by weight.
    Topical,
    /// Both oral and topical markers present.
    Mixed,
}

impl FormulationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oral => "oral",
            Self::Topical => "topical",
            Self::Mixed => "mixed",
        }
    }

    /// Whether percentage-dosed actives are validated against topical ceilings.
    pub fn checks_topical(&self) -> bool {
        matches!(self, Self::Topical | Self::Mixed)
    }

    /// Whether mass-dosed actives are validated against daily limits.
    pub fn checks_oral(&self) -> bool {
        matches!(self, Self::Oral | Self::Mixed)
    }
}

// ---------------------------------------------------------------------------
// SubstanceUnit
// ---------------------------------------------------------------------------

/// Native unit of a substance's daily limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SubstanceUnit {
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "mcg")]
    Microgram,
    #[serde(rename = "UI")]
    Iu,
    #[serde(rename = "g")]
    Gram,
}

impl SubstanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Milligram => "mg",
            Self::Microgram => "mcg",
            Self::Iu => "UI",
            Self::Gram => "g",
        }
    }

    /// Parse a unit as written in prescription text. `%` is not a substance unit.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "mg" => Some(Self::Milligram),
            "mcg" | "µg" | "ug" => Some(Self::Microgram),
            "ui" | "iu" => Some(Self::Iu),
            "g" => Some(Self::Gram),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reference records
// ---------------------------------------------------------------------------

/// Pharmacological limits for one substance, keyed by canonical name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubstanceProfile {
    pub max_daily_dose: f64,
    pub unit: SubstanceUnit,
    #[serde(default)]
    pub common_doses: Vec<f64>,
    #[serde(default)]
    pub recommended_dose: Option<String>,
    #[serde(default)]
    pub interactions: Vec<String>,
    #[serde(default)]
    pub clinical_indications: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
}

/// Topical concentration ceiling for one substance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicalLimit {
    pub max_percentage: f64,
    pub safe_range: (f64, f64),
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A pharmacy-defined active that extends the reference database for one engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomActive {
    pub name: String,
    pub max_daily_dose: f64,
    pub unit: SubstanceUnit,
    #[serde(default)]
    pub recommended_dose: Option<String>,
    #[serde(default)]
    pub interactions: Vec<String>,
}

impl CustomActive {
    pub fn to_profile(&self) -> SubstanceProfile {
        SubstanceProfile {
            max_daily_dose: self.max_daily_dose,
            unit: self.unit,
            common_doses: vec![],
            recommended_dose: self.recommended_dose.clone(),
            interactions: self.interactions.clone(),
            clinical_indications: vec![],
            contraindications: vec![],
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedActive
// ---------------------------------------------------------------------------

/// One active ingredient read from a bullet line. Rebuilt on every parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedActive {
    pub name: String,
    pub dose: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl ParsedActive {
    pub fn new(name: impl Into<String>, dose: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        let percentage = (unit == "%").then_some(dose);
        Self {
            name: name.into(),
            dose,
            unit,
            percentage,
        }
    }

    pub fn is_percentage(&self) -> bool {
        self.unit == "%"
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Classification of a finding. `Impossible` is reserved for physically
/// unachievable states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Impossible,
    Critical,
    Warning,
    Caution,
    Info,
    Safe,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Impossible => "impossible",
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Caution => "caution",
            Self::Info => "info",
            Self::Safe => "safe",
        }
    }

    /// Position on the escalation ladder; higher is worse.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Info => 1,
            Self::Caution => 2,
            Self::Warning => 3,
            Self::Critical => 4,
            Self::Impossible => 5,
        }
    }
}

/// Pharmacist-facing urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Low: informational, no action required.
    Baixo,
    /// Moderate: review before dispensing.
    Moderado,
    /// High: formula must be adjusted.
    Alto,
    /// Blocking: formula cannot be compounded as written.
    Bloqueante,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baixo => "baixo",
            Self::Moderado => "moderado",
            Self::Alto => "alto",
            Self::Bloqueante => "bloqueante",
        }
    }
}

/// A finding about one active, or about the whole formula.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SafetyAlert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub active: String,
    pub message: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InteractionSeverity {
    High,
}

/// A clinically significant interaction between two actives of the same formula.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteraction {
    pub drug1: String,
    pub drug2: String,
    pub description: String,
    pub severity: InteractionSeverity,
}

/// Manufacturability note. Advisory; independent of dose limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityNote {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsules_needed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_mg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_percentage: Option<f64>,
    pub message: String,
    pub recommendation: String,
}

// ---------------------------------------------------------------------------
// FormulationAnalysis
// ---------------------------------------------------------------------------

/// Aggregate result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormulationAnalysis {
    pub alerts: Vec<SafetyAlert>,
    pub interactions: Vec<DrugInteraction>,
    /// Actives with no finding, in parse order.
    pub safe_actives: Vec<String>,
    /// Subset of `safe_actives` absent from the knowledge base.
    pub unknown_actives: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_percentage: Option<f64>,
    pub formulation_type: FormulationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viability: Option<ViabilityNote>,
    /// Bullet lines that matched no parse rule.
    pub skipped_lines: usize,
}

impl FormulationAnalysis {
    /// Highest alert type present, `Safe` when there are none.
    pub fn worst(&self) -> AlertType {
        self.alerts
            .iter()
            .map(|a| a.alert_type)
            .max_by_key(|t| t.rank())
            .unwrap_or(AlertType::Safe)
    }

    pub fn has_blocking(&self) -> bool {
        self.alerts
            .iter()
            .any(|a| a.severity == AlertSeverity::Bloqueante)
    }
}

// ---------------------------------------------------------------------------
// ReferenceError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference data load failed ({0}): {1}")]
    Load(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Invalid substance profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_severity_ordering() {
        assert!(AlertSeverity::Baixo < AlertSeverity::Moderado);
        assert!(AlertSeverity::Moderado < AlertSeverity::Alto);
        assert!(AlertSeverity::Alto < AlertSeverity::Bloqueante);
    }

    #[test]
    fn alert_type_ladder() {
        assert!(AlertType::Safe.rank() < AlertType::Warning.rank());
        assert!(AlertType::Warning.rank() < AlertType::Critical.rank());
        assert!(AlertType::Critical.rank() < AlertType::Impossible.rank());
    }

    #[test]
    fn unit_labels() {
        assert_eq!(SubstanceUnit::from_label("MG"), Some(SubstanceUnit::Milligram));
        assert_eq!(SubstanceUnit::from_label("µg"), Some(SubstanceUnit::Microgram));
        assert_eq!(SubstanceUnit::from_label("UI"), Some(SubstanceUnit::Iu));
        assert_eq!(SubstanceUnit::from_label("%"), None);
    }

    #[test]
    fn parsed_active_sets_percentage_only_for_percent() {
        assert_eq!(ParsedActive::new("Minoxidil", 5.0, "%").percentage, Some(5.0));
        assert_eq!(ParsedActive::new("Zinco", 30.0, "mg").percentage, None);
    }

    #[test]
    fn alert_serializes_type_field() {
        let alert = SafetyAlert {
            alert_type: AlertType::Critical,
            severity: AlertSeverity::Alto,
            active: "Berberina".into(),
            message: "m".into(),
            recommendation: "r".into(),
        };
        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"type\":\"critical\""));
        assert!(json.contains("\"severity\":\"alto\""));
    }

    #[test]
    fn empty_analysis_is_safe() {
        let analysis = FormulationAnalysis::default();
        assert_eq!(analysis.worst(), AlertType::Safe);
        assert!(!analysis.has_blocking());
        assert_eq!(analysis.formulation_type, FormulationType::Oral);
    }
}
