use std::sync::LazyLock;

use regex::Regex;

use super::types::SubstanceUnit;

/// Brazilian thousand separators: "1.000", "10.000,5". A leading zero
/// ("0.300") is a dotted decimal, never a thousands group.
static RE_THOUSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]\d{0,2}(?:\.\d{3})+(?:,\d+)?$").unwrap());
static RE_FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)").unwrap());

/// Parse a number as written in prescriptions. Handles decimal commas and
/// dotted thousand groups ("1.000mg" is one thousand).
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let normalized = if RE_THOUSANDS.is_match(trimmed) {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.replace(',', ".")
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lower bound of a free-text therapeutic range ("500-1500mg/dia" → 500).
pub fn recommended_floor(recommended: &str) -> Option<f64> {
    RE_FIRST_NUMBER
        .captures(recommended)
        .and_then(|caps| parse_number(caps.get(1)?.as_str()))
}

/// Convert a dose into the substance's native unit. Only mg↔mcg is
/// supported; identical units pass through.
pub fn convert_dose(dose: f64, from: SubstanceUnit, to: SubstanceUnit) -> Option<f64> {
    use SubstanceUnit::*;
    match (from, to) {
        (a, b) if a == b => Some(dose),
        (Milligram, Microgram) => Some(dose * 1000.0),
        (Microgram, Milligram) => Some(dose / 1000.0),
        _ => None,
    }
}

/// Mass in milligrams for capsule-fill estimates. UI and % carry no mass.
pub fn mg_equivalent(dose: f64, unit: &str) -> f64 {
    match SubstanceUnit::from_label(unit) {
        Some(SubstanceUnit::Milligram) => dose,
        Some(SubstanceUnit::Microgram) => dose / 1000.0,
        Some(SubstanceUnit::Gram) => dose * 1000.0,
        Some(SubstanceUnit::Iu) | None => 0.0,
    }
}

/// Display a number without a trailing ".0" and with at most two decimals.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// Candidate keys for a normalized name, in lookup priority order:
/// as-is, no whitespace, first word, ácido/acido swap, without
/// "vitamina "/"mineral " prefix.
pub fn lookup_variants(normalized: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |v: String| {
        if !v.is_empty() && !variants.contains(&v) {
            variants.push(v);
        }
    };

    push(normalized.to_string());
    push(normalized.replace(' ', ""));
    if let Some(first) = normalized.split_whitespace().next() {
        push(first.to_string());
    }
    if let Some(rest) = normalized.strip_prefix("ácido ") {
        push(format!("acido {rest}"));
    }
    if let Some(rest) = normalized.strip_prefix("acido ") {
        push(format!("ácido {rest}"));
    }
    for prefix in ["vitamina ", "mineral "] {
        if let Some(rest) = normalized.strip_prefix(prefix) {
            push(rest.to_string());
        }
    }
    variants
}
