use super::normalize::contains_phrase;
use super::reference::KnowledgeBase;
use super::types::{DrugInteraction, InteractionSeverity, ParsedActive};

/// An interaction description is reported only when it carries one of these.
pub const SEVERITY_KEYWORDS: &[&str] = &[
    "grave",
    "severa",
    "contraindicado",
    "hepatotoxicidade",
    "cardiotoxicidade",
    "nefrotoxicidade",
];

fn is_severe(description: &str) -> bool {
    let lower = description.to_lowercase();
    SEVERITY_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn names_overlap(a: &str, b: &str) -> bool {
    contains_phrase(a, b) || contains_phrase(b, a)
}

/// Find severe interactions between actives of the same formula.
///
/// Pairs are reported from the side of each substance whose profile lists
/// the other, so (A, B) and (B, A) may both appear.
pub fn detect_interactions(kb: &KnowledgeBase, actives: &[ParsedActive]) -> Vec<DrugInteraction> {
    let normalized: Vec<String> = actives.iter().map(|a| kb.normalize(&a.name)).collect();
    let mut found = Vec::new();

    for (i, active) in actives.iter().enumerate() {
        let Some(resolved) = kb.resolve(&normalized[i]) else {
            continue;
        };
        if resolved.entry.interactions.is_empty() {
            continue;
        }

        for (j, other) in actives.iter().enumerate() {
            if i == j || normalized[j].is_empty() {
                continue;
            }
            let other_name = &normalized[j];

            let description = resolved
                .entry
                .interactions
                .iter()
                .filter(|listed| names_overlap(other_name, listed))
                .find_map(|listed| {
                    kb.interaction_description(resolved.key, listed)
                        .or_else(|| kb.interaction_description(resolved.key, other_name))
                });

            match description {
                Some(text) if is_severe(text) => {
                    tracing::debug!(
                        drug1 = resolved.key,
                        drug2 = %other_name,
                        "Severe interaction detected"
                    );
                    found.push(DrugInteraction {
                        drug1: active.name.clone(),
                        drug2: other.name.clone(),
                        description: text.to_string(),
                        severity: InteractionSeverity::High,
                    });
                }
                Some(_) => {
                    tracing::debug!(
                        drug1 = resolved.key,
                        drug2 = %other_name,
                        "Interaction below severity threshold"
                    );
                }
                None => {}
            }
        }
    }

    found
}
