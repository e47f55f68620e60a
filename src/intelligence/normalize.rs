//! Trade-name and synonym normalization.
//!
//! Turns an active name as written ("Berberina HCl", "KSM-66®",
//! "Cúrcuma Longvida") into the canonical key used by the reference data.
//! Total: a name that matches nothing comes back cleaned but unmapped.

use super::reference::NameMapping;

/// Lower-case, replace punctuation with spaces, collapse whitespace.
/// Accented letters count as alphanumeric and are kept.
pub fn clean_name(raw: &str) -> String {
    let replaced: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    collapse_whitespace(&replaced)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word containment: `needle` appears in `haystack` bounded by
/// spaces or string ends. Both sides are expected to be cleaned.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let padded_hay = format!(" {haystack} ");
    let padded_needle = format!(" {needle} ");
    padded_hay.contains(&padded_needle)
}

/// Replace every whole-word occurrence of `needle` with a space.
fn strip_phrase(haystack: &str, needle: &str) -> String {
    let padded = format!(" {haystack} ");
    let stripped = padded.replace(&format!(" {needle} "), "  ");
    collapse_whitespace(&stripped)
}

/// Normalize a raw active name to its lookup key.
///
/// 1. clean (case, punctuation, whitespace)
/// 2. strip decorative tokens (mappings with an empty target)
/// 3. substitute the most specific (longest) matching trade name
pub fn normalize_name(raw: &str, mappings: &[NameMapping]) -> String {
    let mut name = clean_name(raw);
    if name.is_empty() {
        return name;
    }

    let mut ordered: Vec<&NameMapping> = mappings.iter().collect();
    ordered.sort_by(|a, b| b.pattern.chars().count().cmp(&a.pattern.chars().count()));

    for mapping in ordered.iter().filter(|m| m.target.is_empty()) {
        let pattern = clean_name(&mapping.pattern);
        // Keep the name when stripping would erase it ("Extrato" alone).
        if contains_phrase(&name, &pattern) && name != pattern {
            name = strip_phrase(&name, &pattern);
        }
    }

    for mapping in ordered.iter().filter(|m| !m.target.is_empty()) {
        if contains_phrase(&name, &clean_name(&mapping.pattern)) {
            return mapping.target.clone();
        }
    }

    name
}
