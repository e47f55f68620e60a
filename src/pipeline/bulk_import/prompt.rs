pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are a compounding-pharmacy data extractor. Your ONLY role is to convert
prescription text into structured formulas. You extract what is written.

RULES:
1. Extract ONLY formulas explicitly present in the text.
2. NEVER invent actives, doses or indications.
3. Keep active names exactly as written (Portuguese).
4. Convert every mass dose to mg in "concentration_mg"; keep the original in "concentration_text".
5. If a field is missing, output null.
6. Output MUST be a single valid JSON object. No commentary.
"#;

/// Build the extraction prompt for one chunk of a prescription document.
pub fn build_extraction_prompt(chunk: &str) -> String {
    format!(
        r#"<document>
{chunk}
</document>

Extract EVERY compounded formula in the document above into this JSON structure:

{{
  "formulas": [
    {{
      "name": "formula name or heading",
      "category": "e.g., emagrecimento, queda capilar, sono",
      "pharmaceutical_form": "cápsula | sachê | pó | comprimido | solução | creme | gel | loção | pomada | sérum | shampoo",
      "specialty": "dermatologia | tricologia | endocrinologia | nutrologia | ortomolecular | esportiva | ginecologia | psiquiatria | geriatria",
      "clinical_indication": "indication or null",
      "actives": [
        {{
          "name": "active name",
          "concentration_mg": 500,
          "concentration_text": "500mg",
          "role": "principal | adjuvante | veículo or null"
        }}
      ]
    }}
  ]
}}

Rules:
- 1 g = 1000 mg; 1 mcg = 0.001 mg.
- Percentages and UI keep their number in concentration_mg.
- A formula without actives must be omitted."#
    )
}
