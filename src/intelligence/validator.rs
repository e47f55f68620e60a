//! Dose & load validation.
//!
//! Each parsed active is checked against the knowledge base: percentage
//! doses against topical ceilings, mass doses against daily limits. The
//! summed percentage of a topical formula is checked separately.

use super::helpers::{convert_dose, recommended_floor};
use super::messages::{MessageTemplates, Template, WHOLE_FORMULA};
use super::reference::{KnowledgeBase, DEFAULT_TOPICAL_CEILING};
use super::types::{
    AlertSeverity, AlertType, FormulationType, ParsedActive, SafetyAlert, SubstanceUnit,
};

/// Multiple of the ceiling above which a dose is physically impossible.
const IMPOSSIBLE_FACTOR: f64 = 3.0;
/// Fraction of the daily limit used as the conservative threshold.
const CONSERVATIVE_FRACTION: f64 = 0.2;
/// Fraction of the recommended lower bound below which a dose is flagged.
const UNDERDOSE_FRACTION: f64 = 0.1;

/// Outcome of validating one active.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveCheck {
    /// On the known-safe allow-list.
    KnownSafe,
    /// Not in the knowledge base; safe by default.
    Unknown,
    /// Found and within limits, or not comparable (incompatible units,
    /// dose form not checked for this formulation type).
    Within,
    Alert(SafetyAlert),
}

impl ActiveCheck {
    pub fn is_safe(&self) -> bool {
        !matches!(self, ActiveCheck::Alert(_))
    }
}

fn alert(alert_type: AlertType, severity: AlertSeverity, active: &str, t: Template) -> SafetyAlert {
    SafetyAlert {
        alert_type,
        severity,
        active: active.to_string(),
        message: t.message,
        recommendation: t.recommendation,
    }
}

/// Validate one active of a formula of the given type.
pub fn validate_active(
    kb: &KnowledgeBase,
    active: &ParsedActive,
    formulation: FormulationType,
) -> ActiveCheck {
    let normalized = kb.normalize(&active.name);
    if normalized.is_empty() {
        return ActiveCheck::Unknown;
    }
    if kb.is_known_safe(&normalized) {
        return ActiveCheck::KnownSafe;
    }

    if active.is_percentage() {
        let ceiling = match kb.resolve_topical(&normalized) {
            Some(limit) => Some(limit.entry.max_percentage),
            None => kb.resolve(&normalized).map(|_| DEFAULT_TOPICAL_CEILING),
        };
        let Some(ceiling) = ceiling else {
            return ActiveCheck::Unknown;
        };
        if !formulation.checks_topical() {
            return ActiveCheck::Within;
        }
        return check_topical(active, ceiling);
    }

    let Some(resolved) = kb.resolve(&normalized) else {
        return ActiveCheck::Unknown;
    };
    if !formulation.checks_oral() {
        return ActiveCheck::Within;
    }

    let profile = resolved.entry;
    let converted = SubstanceUnit::from_label(&active.unit)
        .and_then(|from| convert_dose(active.dose, from, profile.unit));
    let Some(dose) = converted else {
        tracing::debug!(
            substance = resolved.key,
            unit = %active.unit,
            native = profile.unit.as_str(),
            "Incompatible units, dose not compared"
        );
        return ActiveCheck::Within;
    };

    check_oral(
        active,
        dose,
        profile.unit.as_str(),
        profile.max_daily_dose,
        profile.recommended_dose.as_deref(),
    )
}

fn check_topical(active: &ParsedActive, ceiling: f64) -> ActiveCheck {
    let dose = active.dose;
    if dose > ceiling * IMPOSSIBLE_FACTOR {
        ActiveCheck::Alert(alert(
            AlertType::Impossible,
            AlertSeverity::Bloqueante,
            &active.name,
            MessageTemplates::topical_impossible(&active.name, dose, ceiling),
        ))
    } else if dose > ceiling {
        ActiveCheck::Alert(alert(
            AlertType::Critical,
            AlertSeverity::Alto,
            &active.name,
            MessageTemplates::topical_critical(&active.name, dose, ceiling),
        ))
    } else {
        ActiveCheck::Within
    }
}

fn check_oral(
    active: &ParsedActive,
    dose: f64,
    unit: &str,
    max: f64,
    recommended: Option<&str>,
) -> ActiveCheck {
    let pct = dose / max * 100.0;
    let name = active.name.as_str();

    if pct > IMPOSSIBLE_FACTOR * 100.0 {
        return ActiveCheck::Alert(alert(
            AlertType::Impossible,
            AlertSeverity::Bloqueante,
            name,
            MessageTemplates::oral_impossible(name, dose, unit, pct, max, recommended),
        ));
    }
    if pct > 100.0 {
        return ActiveCheck::Alert(alert(
            AlertType::Critical,
            AlertSeverity::Alto,
            name,
            MessageTemplates::oral_critical(name, dose, unit, pct, max),
        ));
    }
    if pct >= CONSERVATIVE_FRACTION * 100.0 {
        return ActiveCheck::Alert(alert(
            AlertType::Warning,
            AlertSeverity::Moderado,
            name,
            MessageTemplates::oral_warning(name, dose, unit, pct, max),
        ));
    }

    if let Some(range) = recommended {
        if let Some(floor) = recommended_floor(range) {
            if dose < floor * UNDERDOSE_FRACTION {
                return ActiveCheck::Alert(alert(
                    AlertType::Warning,
                    AlertSeverity::Baixo,
                    name,
                    MessageTemplates::oral_insufficient(name, dose, unit, range),
                ));
            }
        }
    }

    ActiveCheck::Within
}

/// Sum of the percentage doses of a formula.
pub fn total_percentage(actives: &[ParsedActive]) -> f64 {
    actives
        .iter()
        .filter_map(|a| a.percentage)
        .sum()
}

/// Formula-level finding for the summed percentage, if any.
pub fn validate_load(total: f64) -> Option<SafetyAlert> {
    if total > 100.0 {
        Some(alert(
            AlertType::Impossible,
            AlertSeverity::Bloqueante,
            WHOLE_FORMULA,
            MessageTemplates::total_impossible(total),
        ))
    } else if total > 80.0 {
        Some(alert(
            AlertType::Critical,
            AlertSeverity::Alto,
            WHOLE_FORMULA,
            MessageTemplates::total_critical(total),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::intelligence::reference::ReferenceData;
    use crate::intelligence::types::CustomActive;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::new(Arc::new(ReferenceData::builtin()))
    }

    fn oral(name: &str, dose: f64, unit: &str) -> ActiveCheck {
        validate_active(&kb(), &ParsedActive::new(name, dose, unit), FormulationType::Oral)
    }

    fn topical(name: &str, pct: f64) -> ActiveCheck {
        validate_active(&kb(), &ParsedActive::new(name, pct, "%"), FormulationType::Topical)
    }

    fn alert_of(check: ActiveCheck) -> SafetyAlert {
        match check {
            ActiveCheck::Alert(a) => a,
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[test]
    fn arnica_above_three_times_ceiling_is_impossible() {
        let a = alert_of(topical("Arnica", 16.0));
        assert_eq!(a.alert_type, AlertType::Impossible);
        assert_eq!(a.severity, AlertSeverity::Bloqueante);
        assert!(a.recommendation.contains("5%"));
    }

    #[test]
    fn topical_between_ceiling_and_triple_is_critical() {
        let a = alert_of(topical("Minoxidil", 7.0));
        assert_eq!(a.alert_type, AlertType::Critical);
        assert_eq!(a.severity, AlertSeverity::Alto);
    }

    #[test]
    fn topical_within_ceiling_is_safe() {
        assert_eq!(topical("Minoxidil", 5.0), ActiveCheck::Within);
    }

    #[test]
    fn known_substance_without_topical_entry_uses_default_ceiling() {
        // Berberina has no topical entry: 10% ceiling applies.
        assert_eq!(topical("Berberina", 10.0), ActiveCheck::Within);
        assert_eq!(alert_of(topical("Berberina", 12.0)).alert_type, AlertType::Critical);
        assert_eq!(alert_of(topical("Berberina", 31.0)).alert_type, AlertType::Impossible);
    }

    #[test]
    fn berberina_above_max_is_critical() {
        let a = alert_of(oral("Berberina", 2000.0, "mg"));
        assert_eq!(a.alert_type, AlertType::Critical);
        assert!(a.message.contains("133.33%"));
        assert!(a.recommendation.contains("1500 mg"));
    }

    #[test]
    fn above_three_hundred_percent_is_impossible() {
        let a = alert_of(oral("Zinco", 200.0, "mg"));
        assert_eq!(a.alert_type, AlertType::Impossible);
        assert!(a.recommendation.contains("mg/dia"));
    }

    #[test]
    fn between_twenty_and_hundred_is_warning() {
        let a = alert_of(oral("Berberina", 500.0, "mg"));
        assert_eq!(a.alert_type, AlertType::Warning);
        assert_eq!(a.severity, AlertSeverity::Moderado);
        assert!(a.message.contains("300 mg"));
    }

    #[test]
    fn exactly_twenty_percent_is_warning() {
        let a = alert_of(oral("Berberina", 300.0, "mg"));
        assert_eq!(a.alert_type, AlertType::Warning);
    }

    #[test]
    fn low_dose_within_range_is_safe() {
        // 100mg < 300mg conservative, and above 10% of the 500mg floor
        assert_eq!(oral("Berberina", 100.0, "mg"), ActiveCheck::Within);
    }

    #[test]
    fn underdose_flagged_as_low_warning() {
        let a = alert_of(oral("Berberina", 10.0, "mg"));
        assert_eq!(a.alert_type, AlertType::Warning);
        assert_eq!(a.severity, AlertSeverity::Baixo);
        assert!(a.recommendation.contains("500-1500mg/dia"));
    }

    #[test]
    fn mg_dose_converted_to_mcg_limit() {
        // Vitamina B12 max 2000 mcg: 5mg = 5000 mcg → 250%
        let a = alert_of(oral("Vitamina B12", 5.0, "mg"));
        assert_eq!(a.alert_type, AlertType::Critical);
    }

    #[test]
    fn incompatible_units_not_compared() {
        assert_eq!(oral("Berberina", 5.0, "g"), ActiveCheck::Within);
        assert_eq!(oral("Vitamina D3", 50.0, "mg"), ActiveCheck::Within);
    }

    #[test]
    fn unknown_substance_is_safe() {
        assert_eq!(oral("Ativo Desconhecido", 99999.0, "mg"), ActiveCheck::Unknown);
        assert!(oral("Ativo Desconhecido", 99999.0, "mg").is_safe());
    }

    #[test]
    fn known_safe_skips_limits() {
        assert_eq!(oral("Creatina", 50000.0, "mg"), ActiveCheck::KnownSafe);
    }

    #[test]
    fn mass_dose_not_checked_in_pure_topical() {
        let check = validate_active(
            &kb(),
            &ParsedActive::new("Berberina", 5000.0, "mg"),
            FormulationType::Topical,
        );
        assert_eq!(check, ActiveCheck::Within);
    }

    #[test]
    fn mixed_checks_both_forms() {
        let k = kb();
        let mass = validate_active(&k, &ParsedActive::new("Cafeína", 600.0, "mg"), FormulationType::Mixed);
        let pct = validate_active(&k, &ParsedActive::new("Cafeína", 8.0, "%"), FormulationType::Mixed);
        assert!(!mass.is_safe());
        assert!(!pct.is_safe());
    }

    #[test]
    fn custom_active_limit_applies() {
        let k = kb().with_custom_actives(&[CustomActive {
            name: "Ativo da Casa".into(),
            max_daily_dose: 100.0,
            unit: SubstanceUnit::Milligram,
            recommended_dose: None,
            interactions: vec![],
        }]);
        let check = validate_active(&k, &ParsedActive::new("Ativo da Casa", 150.0, "mg"), FormulationType::Oral);
        assert_eq!(alert_of(check).alert_type, AlertType::Critical);
    }

    #[test]
    fn oral_severity_is_monotonic_above_underdose_region() {
        let mut last = 0;
        let mut dose = 100.0;
        while dose <= 6000.0 {
            let rank = match oral("Berberina", dose, "mg") {
                ActiveCheck::Alert(a) => a.alert_type.rank(),
                _ => AlertType::Safe.rank(),
            };
            assert!(rank >= last, "severity dropped at {dose}mg");
            last = rank;
            dose += 50.0;
        }
        assert_eq!(last, AlertType::Impossible.rank());
    }

    #[test]
    fn load_thresholds() {
        assert!(validate_load(80.0).is_none());
        let critical = validate_load(90.0).unwrap();
        assert_eq!(critical.alert_type, AlertType::Critical);
        assert_eq!(critical.active, WHOLE_FORMULA);
        assert!(critical.recommendation.contains("70-80%"));
        assert_eq!(validate_load(100.5).unwrap().alert_type, AlertType::Impossible);
    }

    #[test]
    fn total_percentage_sums_only_percent_actives() {
        let actives = vec![
            ParsedActive::new("Minoxidil", 5.0, "%"),
            ParsedActive::new("Ureia", 10.0, "%"),
            ParsedActive::new("Cafeína", 200.0, "mg"),
        ];
        assert_eq!(total_percentage(&actives), 15.0);
    }
}
