use super::types::FormulationType;

const TOPICAL_MARKERS: &[&str] = &["pomada", "creme", "gel", "loção", "%", "qsp", "base"];
const ORAL_MARKERS: &[&str] = &["cápsula", "mg", "sachê", "pó"];

/// Classify a formula text as oral, topical or mixed from marker tokens.
/// Text with no marker at all defaults to oral.
pub fn detect_formulation_type(text: &str) -> FormulationType {
    let lower = text.to_lowercase();
    let topical = TOPICAL_MARKERS.iter().any(|m| has_marker(&lower, m));
    let oral = ORAL_MARKERS.iter().any(|m| has_marker(&lower, m));

    match (oral, topical) {
        (true, true) => FormulationType::Mixed,
        (false, true) => FormulationType::Topical,
        _ => FormulationType::Oral,
    }
}

/// Marker at the start of a word: "500mg" and "pó" match, "após" does not.
fn has_marker(lower: &str, marker: &str) -> bool {
    lower.match_indices(marker).any(|(i, _)| {
        lower[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphabetic())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oral_from_mass_units() {
        assert_eq!(detect_formulation_type("• Berberina 500mg"), FormulationType::Oral);
        assert_eq!(
            detect_formulation_type("Manipular 60 CÁPSULAS"),
            FormulationType::Oral
        );
    }

    #[test]
    fn topical_from_percentage() {
        assert_eq!(detect_formulation_type("• Minoxidil 5%"), FormulationType::Topical);
        assert_eq!(
            detect_formulation_type("Creme base qsp 30g"),
            FormulationType::Topical
        );
    }

    #[test]
    fn mixed_when_both() {
        assert_eq!(
            detect_formulation_type("• Cafeína 200mg\n• Cafeína 5% gel"),
            FormulationType::Mixed
        );
    }

    #[test]
    fn markers_inside_words_ignored() {
        assert_eq!(
            detect_formulation_type("Creme\n• Ureia 10%\nAplicar após o banho"),
            FormulationType::Topical
        );
        assert_eq!(
            detect_formulation_type("• Creatina em pó 3000mg"),
            FormulationType::Oral
        );
    }

    #[test]
    fn default_oral_when_no_markers() {
        assert_eq!(detect_formulation_type(""), FormulationType::Oral);
        assert_eq!(detect_formulation_type("• Zinco 30"), FormulationType::Oral);
    }
}
