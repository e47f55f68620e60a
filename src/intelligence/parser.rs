//! Active-ingredient parser.
//!
//! Reads `•` bullet lines and applies an ordered rule list; the first rule
//! that matches a line wins. Lines that match no rule are counted, not
//! reported as errors.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::helpers::parse_number;
use super::types::{FormulationType, ParsedActive};

pub const BULLET: char = '•';

/// Which family of pattern produced an active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// "Minoxidil 5%"
    Percentage,
    /// "Berberina 500mg", "Vitamina D3 2000UI"
    Unit,
    /// "Zinco 30": unit inferred from the formulation type
    BareNumber,
}

struct ParseRule {
    kind: RuleKind,
    pattern: Regex,
}

const NAME: &str = r"(?P<name>.+?)";
const SEP: &str = r"(?:\s*[:=–-]\s*|\s+)";
const NUMBER: &str = r"(?P<dose>\d+(?:[.,]\d+)*)";

static RULES: LazyLock<Vec<ParseRule>> = LazyLock::new(|| {
    vec![
        ParseRule {
            kind: RuleKind::Percentage,
            pattern: Regex::new(&format!(r"(?i)^{NAME}{SEP}{NUMBER}\s*%")).unwrap(),
        },
        ParseRule {
            kind: RuleKind::Unit,
            pattern: Regex::new(&format!(
                r"(?i)^{NAME}{SEP}{NUMBER}\s*(?P<unit>mcg|µg|ug|mg|ui|iu|g)\b"
            ))
            .unwrap(),
        },
        ParseRule {
            kind: RuleKind::BareNumber,
            pattern: Regex::new(&format!(r"(?i)^{NAME}{SEP}{NUMBER}\s*$")).unwrap(),
        },
    ]
});

/// Result of parsing one text block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub actives: Vec<ParsedActive>,
    /// Bullet lines that matched no rule.
    pub skipped_lines: usize,
}

/// Canonical spelling of a unit captured by the unit rule.
pub fn canonical_unit(raw: &str) -> &'static str {
    match raw.to_lowercase().as_str() {
        "mcg" | "µg" | "ug" => "mcg",
        "ui" | "iu" => "UI",
        "g" => "g",
        _ => "mg",
    }
}

fn clean_active_name(raw: &str) -> Option<String> {
    let name = raw
        .trim()
        .trim_end_matches(|c: char| c == ':' || c == '-' || c == ',' || c == '–')
        .trim();
    if name.chars().any(|c| c.is_alphabetic()) {
        Some(name.to_string())
    } else {
        None
    }
}

impl ParseRule {
    fn apply(&self, body: &str, formulation: FormulationType) -> Option<ParsedActive> {
        let caps = self.pattern.captures(body)?;
        let name = clean_active_name(caps.name("name")?.as_str())?;
        let dose = parse_number(caps.name("dose")?.as_str())?;

        let unit = match self.kind {
            RuleKind::Percentage => "%",
            RuleKind::Unit => canonical_unit(caps.name("unit")?.as_str()),
            RuleKind::BareNumber => {
                if formulation == FormulationType::Topical {
                    "%"
                } else {
                    "mg"
                }
            }
        };

        Some(ParsedActive::new(name, dose, unit))
    }
}

/// Content of a bullet line, without the marker. `None` for other lines.
pub fn bullet_body(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(BULLET)
        .map(|rest| rest.trim())
        .filter(|rest| !rest.is_empty())
}

/// Match one line body against the rule list, first match wins.
pub fn parse_line(body: &str, formulation: FormulationType) -> Option<(RuleKind, ParsedActive)> {
    RULES
        .iter()
        .find_map(|rule| rule.apply(body, formulation).map(|a| (rule.kind, a)))
}

/// Extract actives from every bullet line. Names are de-duplicated
/// case-insensitively, keeping the first occurrence.
pub fn parse_actives(text: &str, formulation: FormulationType) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for body in text.lines().filter_map(bullet_body) {
        match parse_line(body, formulation) {
            Some((_, active)) => {
                if seen.insert(active.name.to_lowercase()) {
                    outcome.actives.push(active);
                }
            }
            None => outcome.skipped_lines += 1,
        }
    }

    if outcome.skipped_lines > 0 {
        tracing::debug!(
            parsed = outcome.actives.len(),
            skipped = outcome.skipped_lines,
            "Bullet lines without a recognizable dose"
        );
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oral(text: &str) -> ParseOutcome {
        parse_actives(text, FormulationType::Oral)
    }

    #[test]
    fn parses_unit_form() {
        let out = oral("• Berberina 500mg\n• Vitamina B12 1000mcg\n• Vitamina D3 2000 UI");
        assert_eq!(out.actives.len(), 3);
        assert_eq!(out.actives[0], ParsedActive::new("Berberina", 500.0, "mg"));
        assert_eq!(out.actives[1], ParsedActive::new("Vitamina B12", 1000.0, "mcg"));
        assert_eq!(out.actives[2], ParsedActive::new("Vitamina D3", 2000.0, "UI"));
    }

    #[test]
    fn parses_percentage_form() {
        let out = parse_actives("• Minoxidil 5%\n• Tretinoína 0,05%", FormulationType::Topical);
        assert_eq!(out.actives[0].percentage, Some(5.0));
        assert_eq!(out.actives[1].dose, 0.05);
        assert_eq!(out.actives[1].unit, "%");
    }

    #[test]
    fn names_with_digits() {
        let out = oral("• 5-HTP 100mg\n• Coenzima Q10 200mg\n• Ômega 3 1000mg");
        let names: Vec<&str> = out.actives.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["5-HTP", "Coenzima Q10", "Ômega 3"]);
        assert_eq!(out.actives[2].dose, 1000.0);
    }

    #[test]
    fn bare_number_unit_follows_formulation() {
        let oral_out = oral("• Zinco 30");
        assert_eq!(oral_out.actives[0].unit, "mg");

        let topical_out = parse_actives("• Ureia 10", FormulationType::Topical);
        assert_eq!(topical_out.actives[0].unit, "%");
        assert_eq!(topical_out.actives[0].percentage, Some(10.0));
    }

    #[test]
    fn percentage_rule_wins_over_bare() {
        let (kind, active) = parse_line("Minoxidil: 5%", FormulationType::Oral).unwrap();
        assert_eq!(kind, RuleKind::Percentage);
        assert_eq!(active.name, "Minoxidil");
    }

    #[test]
    fn thousand_separator_dose() {
        let out = oral("• Vitamina C 1.000mg");
        assert_eq!(out.actives[0].dose, 1000.0);
    }

    #[test]
    fn trailing_posology_ignored() {
        let out = oral("• Magnésio 300mg (tomar à noite)");
        assert_eq!(out.actives[0], ParsedActive::new("Magnésio", 300.0, "mg"));
    }

    #[test]
    fn duplicate_names_kept_once() {
        let out = oral("• Zinco 30mg\n• zinco 15mg");
        assert_eq!(out.actives.len(), 1);
        assert_eq!(out.actives[0].dose, 30.0);
    }

    #[test]
    fn non_bullet_lines_ignored_unmatched_bullets_counted() {
        let out = oral("Fórmula 1\nBerberina 500mg\n• Tomar 1 cápsula ao dia\n• Zinco 30mg");
        assert_eq!(out.actives.len(), 1);
        assert_eq!(out.skipped_lines, 1);
    }

    #[test]
    fn empty_text() {
        assert_eq!(oral(""), ParseOutcome::default());
    }
}
