//! Manufacturability estimates. Advisory only: a viability note never
//! changes the dose findings.

use super::helpers::mg_equivalent;
use super::messages::{MessageTemplates, Template};
use super::types::{AlertSeverity, AlertType, FormulationType, ParsedActive, ViabilityNote};

/// Fill capacity of one standard capsule, in mg.
pub const CAPSULE_CAPACITY_MG: f64 = 500.0;
/// More capsules than this per dose is impractical.
pub const MAX_PRACTICAL_CAPSULES: u32 = 4;
/// More capsules than this per dose earns an advisory note.
pub const ADVISORY_CAPSULES: u32 = 2;

/// Mass of the actives in mg. UI and percentage doses carry no mass.
pub fn total_mg<'a>(actives: impl IntoIterator<Item = &'a ParsedActive>) -> f64 {
    actives
        .into_iter()
        .map(|a| mg_equivalent(a.dose, &a.unit))
        .sum()
}

pub fn capsules_needed(total_mg: f64) -> u32 {
    if total_mg <= 0.0 {
        return 0;
    }
    (total_mg / CAPSULE_CAPACITY_MG).ceil() as u32
}

fn note(
    alert_type: AlertType,
    severity: AlertSeverity,
    capsules: Option<u32>,
    total_mg: Option<f64>,
    total_percentage: Option<f64>,
    t: Template,
) -> ViabilityNote {
    ViabilityNote {
        alert_type,
        severity,
        capsules_needed: capsules,
        total_mg,
        total_percentage,
        message: t.message,
        recommendation: t.recommendation,
    }
}

/// Capsule estimate for the oral actives plus an optional candidate.
pub fn assess_capsules(actives: &[ParsedActive], candidate: Option<&ParsedActive>) -> Option<ViabilityNote> {
    let total = total_mg(actives.iter().chain(candidate));
    let capsules = capsules_needed(total);

    if capsules > MAX_PRACTICAL_CAPSULES {
        Some(note(
            AlertType::Caution,
            AlertSeverity::Moderado,
            Some(capsules),
            Some(total),
            None,
            MessageTemplates::capsules_impractical(capsules, total),
        ))
    } else if capsules > ADVISORY_CAPSULES {
        Some(note(
            AlertType::Info,
            AlertSeverity::Baixo,
            Some(capsules),
            Some(total),
            None,
            MessageTemplates::capsules_advisory(capsules, total),
        ))
    } else {
        None
    }
}

/// Percentage budget note for topical formulas.
pub fn assess_topical_load(total_percentage: f64) -> Option<ViabilityNote> {
    if total_percentage > 100.0 {
        Some(note(
            AlertType::Caution,
            AlertSeverity::Moderado,
            None,
            None,
            Some(total_percentage),
            MessageTemplates::topical_load_impractical(total_percentage),
        ))
    } else if total_percentage > 80.0 {
        Some(note(
            AlertType::Info,
            AlertSeverity::Baixo,
            None,
            None,
            Some(total_percentage),
            MessageTemplates::topical_load_advisory(total_percentage),
        ))
    } else {
        None
    }
}

/// Viability for a formula of the given type. Mixed formulas report the
/// capsule estimate first, the topical budget when capsules are fine.
pub fn assess(
    actives: &[ParsedActive],
    formulation: FormulationType,
    candidate: Option<&ParsedActive>,
) -> Option<ViabilityNote> {
    let capsules = if formulation.checks_oral() {
        assess_capsules(actives, candidate)
    } else {
        None
    };
    capsules.or_else(|| {
        if formulation.checks_topical() {
            let total: f64 = actives
                .iter()
                .chain(candidate)
                .filter_map(|a| a.percentage)
                .sum();
            assess_topical_load(total)
        } else {
            None
        }
    })
}
