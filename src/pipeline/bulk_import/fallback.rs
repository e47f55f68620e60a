//! Regex extractor used when the LLM is unavailable or its output cannot
//! be repaired. Reads "name dose unit" lines section by section.

use std::sync::LazyLock;

use regex::Regex;

use super::chunker::split_by_boundaries;
use super::types::{ExtractedActive, ExtractedFormula, PharmaceuticalForm, Specialty};
use crate::intelligence::helpers::parse_number;

static RE_DOSE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<name>.+?)(?:\s*[:=–-]\s*|\s+|\.{2,}\s*)(?P<dose>\d+(?:[.,]\d+)*)\s*(?P<unit>bilh(?:ões|oes|ão|ao)|blh|mcg|µg|ug|mg|ui|iu|g|%)(?:\s|$|[^\p{L}])",
    )
    .unwrap()
});
static RE_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[•*\-–]|\d+[.)])\s*").unwrap());
static RE_INDICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*indica[çc][ãa]o\s*:?\s*(?P<text>.*)$").unwrap());

/// Dose in mg for a captured unit. UI and % keep their raw number.
fn to_mg(dose: f64, unit: &str) -> f64 {
    match unit.to_lowercase().as_str() {
        "g" => dose * 1000.0,
        "mcg" | "µg" | "ug" => dose / 1000.0,
        u if u.starts_with("bilh") || u == "blh" => dose * 1000.0,
        _ => dose,
    }
}

/// One active from a dose line, or `None` when the line carries no dose.
pub fn parse_dose_line(line: &str) -> Option<ExtractedActive> {
    let body = RE_LIST_MARKER.replace(line, "");
    let caps = RE_DOSE_LINE.captures(body.trim())?;

    let name = caps
        .name("name")?
        .as_str()
        .trim()
        .trim_end_matches(|c: char| c == ':' || c == '-' || c == '.' || c == ',')
        .trim();
    if !name.chars().any(|c| c.is_alphabetic()) {
        return None;
    }

    let dose_raw = caps.name("dose")?.as_str();
    let unit = caps.name("unit")?.as_str();
    let dose = parse_number(dose_raw)?;

    Some(ExtractedActive {
        name: name.to_string(),
        concentration_mg: Some(to_mg(dose, unit)),
        concentration_text: format!("{dose_raw}{unit}"),
        role: None,
    })
}

/// Extract formulas from a chunk with regexes only. Sections without any
/// dose line are dropped; a heading-only section names the formula that
/// follows it and an indication-only section is attached to it.
pub fn extract_formulas(chunk: &str) -> Vec<ExtractedFormula> {
    let mut formulas = Vec::new();
    let mut pending_title: Option<String> = None;
    let mut pending_indication: Option<String> = None;

    for (i, section) in split_by_boundaries(chunk).into_iter().enumerate() {
        let mut actives = Vec::new();
        let mut indication = None;
        let mut first_plain_line = None;

        for line in section.content.lines() {
            if let Some(caps) = RE_INDICATION.captures(line) {
                let text = caps["text"].trim().to_string();
                if !text.is_empty() {
                    indication = Some(text);
                }
            } else if let Some(active) = parse_dose_line(line) {
                actives.push(active);
            } else if first_plain_line.is_none() && !line.trim().is_empty() {
                first_plain_line = Some(line.trim().to_string());
            }
        }

        // "Indicação: ..." opens a section but is metadata, not a name.
        let own_title = section.title.filter(|t| !RE_INDICATION.is_match(t));

        if actives.is_empty() {
            if indication.is_some() {
                pending_indication = indication;
            }
            if own_title.is_some() {
                pending_title = own_title;
            }
            continue;
        }

        let carried_title = pending_title.take();
        let name = own_title
            .or(carried_title)
            .or(first_plain_line)
            .unwrap_or_else(|| format!("Fórmula {}", i + 1));

        formulas.push(ExtractedFormula {
            name,
            category: String::new(),
            pharmaceutical_form: PharmaceuticalForm::from_text(&section.content),
            specialty: Specialty::Unknown,
            clinical_indication: indication.or_else(|| pending_indication.take()),
            actives,
        });
    }

    formulas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversions_to_mg() {
        let g = parse_dose_line("• Creatina 3g").unwrap();
        assert_eq!(g.concentration_mg, Some(3000.0));
        let mcg = parse_dose_line("- Cromo 200mcg").unwrap();
        assert_eq!(mcg.concentration_mg, Some(0.2));
        let mg = parse_dose_line("Berberina: 500 mg").unwrap();
        assert_eq!(mg.concentration_mg, Some(500.0));
        assert_eq!(mg.name, "Berberina");
    }

    #[test]
    fn billions_multiplied() {
        let a = parse_dose_line("• Lactobacillus acidophilus 10 bilhões").unwrap();
        assert_eq!(a.concentration_mg, Some(10000.0));
        assert_eq!(a.concentration_text, "10bilhões");
        let b = parse_dose_line("• Bifidobacterium 5 blh").unwrap();
        assert_eq!(b.concentration_mg, Some(5000.0));
    }

    #[test]
    fn ui_and_percent_keep_raw_number() {
        assert_eq!(parse_dose_line("• Vitamina D3 2.000 UI").unwrap().concentration_mg, Some(2000.0));
        assert_eq!(parse_dose_line("• Minoxidil 5%").unwrap().concentration_mg, Some(5.0));
    }

    #[test]
    fn dotted_leader_lines() {
        let a = parse_dose_line("Magnésio dimalato ........ 300mg").unwrap();
        assert_eq!(a.name, "Magnésio dimalato");
        assert_eq!(a.concentration_mg, Some(300.0));
    }

    #[test]
    fn lines_without_dose_ignored() {
        assert!(parse_dose_line("Tomar 2 cápsulas ao dia").is_none());
        assert!(parse_dose_line("Excipiente qsp").is_none());
        assert!(parse_dose_line("• 500mg").is_none());
    }

    #[test]
    fn extracts_formulas_per_section() {
        let chunk = "Indicação: resistência insulínica\n\
                     Fórmula Glicêmica\n\
                     • Berberina 500mg\n\
                     • Cromo 200mcg\n\
                     Manipular 60 cápsulas\n\
                     Fórmula Sono\n\
                     • Melatonina 3mg";
        let formulas = extract_formulas(chunk);
        assert_eq!(formulas.len(), 2);
        assert_eq!(formulas[0].name, "Fórmula Glicêmica");
        assert_eq!(formulas[0].actives.len(), 2);
        assert_eq!(formulas[0].pharmaceutical_form, PharmaceuticalForm::Capsule);
        assert_eq!(
            formulas[0].clinical_indication.as_deref(),
            Some("resistência insulínica")
        );
        assert_eq!(formulas[1].name, "Fórmula Sono");
        assert_eq!(formulas[1].clinical_indication, None);
    }

    #[test]
    fn title_then_indication_then_actives() {
        let chunk = "Fórmula Acne\n\
                     Indicação: acne leve\n\
                     • Niacinamida 4%\n\
                     • Zinco 30mg\n\
                     Fórmula Queda\n\
                     Indicação: eflúvio\n\
                     • Biotina 5mg";
        let formulas = extract_formulas(chunk);
        assert_eq!(formulas.len(), 2);
        assert_eq!(formulas[0].name, "Fórmula Acne");
        assert_eq!(formulas[0].clinical_indication.as_deref(), Some("acne leve"));
        assert_eq!(formulas[0].actives.len(), 2);
        assert_eq!(formulas[1].name, "Fórmula Queda");
        assert_eq!(formulas[1].clinical_indication.as_deref(), Some("eflúvio"));
    }

    #[test]
    fn untitled_chunk_uses_first_plain_line() {
        let formulas = extract_formulas("Cápsulas para energia\n• Cafeína 200mg");
        assert_eq!(formulas[0].name, "Cápsulas para energia");
    }

    #[test]
    fn no_doses_no_formulas() {
        assert!(extract_formulas("Texto sem nenhuma dose.").is_empty());
        assert!(extract_formulas("").is_empty());
    }
}
