use serde::Deserialize;
use serde_json::Value;

use super::error::ImportError;
use super::json_repair::parse_lenient_json;
use super::types::{ExtractedActive, ExtractedFormula, PharmaceuticalForm, Specialty};
use crate::intelligence::helpers::parse_number;

#[derive(Deserialize)]
struct RawFormula {
    name: Option<String>,
    category: Option<String>,
    pharmaceutical_form: Option<String>,
    specialty: Option<String>,
    clinical_indication: Option<String>,
    actives: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawActive {
    name: Option<String>,
    concentration_mg: Option<Value>,
    concentration_text: Option<String>,
    role: Option<String>,
}

/// Parse an extractor response into formulas. Items that do not
/// deserialize, formulas without a name and formulas without actives are
/// skipped. Fails only when the response is not JSON even after repair.
pub fn parse_formulas_response(response: &str) -> Result<Vec<ExtractedFormula>, ImportError> {
    let value = parse_lenient_json(response)?;

    let items: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("formulas") {
            Some(Value::Array(items)) => items,
            Some(_) => vec![],
            None => vec![Value::Object(map)],
        },
        _ => vec![],
    };

    let total = items.len();
    let formulas: Vec<ExtractedFormula> = parse_array_lenient::<RawFormula>(&items)
        .into_iter()
        .filter_map(into_formula)
        .collect();

    if formulas.len() < total {
        tracing::debug!(
            total,
            kept = formulas.len(),
            "Dropped invalid formula items"
        );
    }

    Ok(formulas)
}

/// Skip items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "null")
}

fn into_formula(raw: RawFormula) -> Option<ExtractedFormula> {
    let name = non_empty(raw.name)?;
    let actives: Vec<ExtractedActive> =
        parse_array_lenient::<RawActive>(raw.actives.as_deref().unwrap_or_default())
            .into_iter()
            .filter_map(into_active)
            .collect();
    if actives.is_empty() {
        return None;
    }

    Some(ExtractedFormula {
        name,
        category: non_empty(raw.category).unwrap_or_default(),
        pharmaceutical_form: raw
            .pharmaceutical_form
            .as_deref()
            .map(PharmaceuticalForm::from_label)
            .unwrap_or_default(),
        specialty: raw
            .specialty
            .as_deref()
            .map(Specialty::from_label)
            .unwrap_or_default(),
        clinical_indication: non_empty(raw.clinical_indication),
        actives,
    })
}

fn into_active(raw: RawActive) -> Option<ExtractedActive> {
    let name = non_empty(raw.name)?;
    let concentration_mg = match raw.concentration_mg {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_number(&s),
        _ => None,
    };
    let concentration_text = non_empty(raw.concentration_text)
        .or_else(|| concentration_mg.map(|mg| format!("{mg}mg")))
        .unwrap_or_default();

    Some(ExtractedActive {
        name,
        concentration_mg,
        concentration_text,
        role: non_empty(raw.role),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wrapped_formulas() {
        let response = r#"```json
{"formulas": [{
  "name": "Fórmula Glicêmica",
  "category": "metabolismo",
  "pharmaceutical_form": "cápsula",
  "specialty": "endocrinologia",
  "clinical_indication": "resistência insulínica",
  "actives": [
    {"name": "Berberina", "concentration_mg": 500, "concentration_text": "500mg", "role": "principal"},
    {"name": "Cromo", "concentration_mg": "0,2", "concentration_text": "200mcg", "role": null}
  ]
}]}
```"#;
        let formulas = parse_formulas_response(response).unwrap();
        assert_eq!(formulas.len(), 1);
        let f = &formulas[0];
        assert_eq!(f.pharmaceutical_form, PharmaceuticalForm::Capsule);
        assert_eq!(f.specialty, Specialty::Endocrinology);
        assert_eq!(f.actives[0].concentration_mg, Some(500.0));
        assert_eq!(f.actives[1].concentration_mg, Some(0.2));
        assert_eq!(f.actives[1].role, None);
    }

    #[test]
    fn bare_array_and_single_object_accepted() {
        let arr = r#"[{"name": "A", "actives": [{"name": "Zinco", "concentration_mg": 30}]}]"#;
        assert_eq!(parse_formulas_response(arr).unwrap().len(), 1);
        let single = r#"{"name": "A", "actives": [{"name": "Zinco", "concentration_mg": 30}]}"#;
        assert_eq!(parse_formulas_response(single).unwrap().len(), 1);
    }

    #[test]
    fn formulas_without_name_or_actives_skipped() {
        let response = r#"{"formulas": [
            {"name": "", "actives": [{"name": "Zinco"}]},
            {"name": "Vazia", "actives": []},
            {"name": "Sem nomes", "actives": [{"concentration_mg": 5}]},
            "texto solto",
            {"name": "Válida", "actives": [{"name": "Zinco", "concentration_text": "30mg"}]}
        ]}"#;
        let formulas = parse_formulas_response(response).unwrap();
        assert_eq!(formulas.len(), 1);
        assert_eq!(formulas[0].name, "Válida");
        assert_eq!(formulas[0].actives[0].concentration_mg, None);
        assert_eq!(formulas[0].pharmaceutical_form, PharmaceuticalForm::Unknown);
    }

    #[test]
    fn empty_formulas_is_ok_and_empty() {
        assert!(parse_formulas_response("{\"formulas\": []}").unwrap().is_empty());
    }

    #[test]
    fn repaired_response_parses() {
        let response = "{formulas: [{'name': 'F', 'actives': [{'name': 'Zinco', 'concentration_mg': 30,},],},],}";
        assert_eq!(parse_formulas_response(response).unwrap().len(), 1);
    }

    #[test]
    fn non_json_is_error() {
        assert!(parse_formulas_response("Desculpe, não consegui.").is_err());
    }
}
