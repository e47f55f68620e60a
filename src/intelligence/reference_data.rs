//! Builtin reference dataset.
//!
//! Curated for the compounding pharmacy context: limits are conservative
//! supplemental/oral ceilings, not toxicological maxima.

use std::collections::BTreeMap;

use super::reference::NameMapping;
use super::types::{SubstanceProfile, SubstanceUnit, TopicalLimit};

pub const BUILTIN_VERSION: &str = "2026.10-builtin";

fn profile(
    max_daily_dose: f64,
    unit: SubstanceUnit,
    recommended: &str,
    interactions: &[&str],
    indications: &[&str],
) -> SubstanceProfile {
    SubstanceProfile {
        max_daily_dose,
        unit,
        common_doses: vec![],
        recommended_dose: Some(recommended.to_string()),
        interactions: interactions.iter().map(|s| s.to_string()).collect(),
        clinical_indications: indications.iter().map(|s| s.to_string()).collect(),
        contraindications: vec![],
    }
}

pub(super) fn substances() -> BTreeMap<String, SubstanceProfile> {
    use SubstanceUnit::*;

    let mut map = BTreeMap::new();
    let mut add = |name: &str, p: SubstanceProfile| {
        map.insert(name.to_string(), p);
    };

    let mut berberina = profile(
        1500.0,
        Milligram,
        "500-1500mg/dia",
        &["metformina", "ciclosporina"],
        &["resistência insulínica", "dislipidemia"],
    );
    berberina.common_doses = vec![500.0, 1000.0, 1500.0];
    berberina.contraindications = vec!["gestação".into(), "lactação".into()];
    add("berberina", berberina);

    add(
        "metformina",
        profile(2550.0, Milligram, "500-2000mg/dia", &[], &["diabetes tipo 2"]),
    );
    add(
        "melatonina",
        profile(10.0, Milligram, "0.21-5mg/dia", &["fluvoxamina"], &["insônia"]),
    );
    add(
        "vitamina d3",
        profile(
            10000.0,
            Iu,
            "1000-4000 UI/dia",
            &[],
            &["deficiência de vitamina D", "osteoporose"],
        ),
    );
    add(
        "vitamina b12",
        profile(2000.0, Microgram, "2.4-1000mcg/dia", &[], &["anemia megaloblástica"]),
    );
    add(
        "ácido fólico",
        profile(1000.0, Microgram, "400-800mcg/dia", &[], &["gestação", "anemia"]),
    );
    add(
        "vitamina c",
        profile(2000.0, Milligram, "500-1000mg/dia", &[], &["imunidade", "antioxidante"]),
    );
    add(
        "vitamina b6",
        profile(100.0, Milligram, "10-50mg/dia", &[], &["neuropatia", "tensão pré-menstrual"]),
    );
    add(
        "vitamina e",
        profile(1000.0, Iu, "100-400 UI/dia", &["varfarina"], &["antioxidante"]),
    );
    add(
        "vitamina a",
        profile(10000.0, Iu, "2000-5000 UI/dia", &["isotretinoína"], &["saúde ocular"]),
    );
    add(
        "zinco",
        profile(40.0, Milligram, "15-30mg/dia", &[], &["imunidade", "acne"]),
    );
    add(
        "selênio",
        profile(400.0, Microgram, "50-200mcg/dia", &[], &["tireoide", "antioxidante"]),
    );
    add(
        "cromo",
        profile(500.0, Microgram, "100-200mcg/dia", &[], &["controle glicêmico"]),
    );
    add(
        "ferro",
        profile(45.0, Milligram, "14-30mg/dia", &[], &["anemia ferropriva"]),
    );
    add(
        "iodo",
        profile(1100.0, Microgram, "150mcg/dia", &[], &["tireoide"]),
    );
    add(
        "magnésio",
        profile(700.0, Milligram, "200-400mg/dia", &[], &["câimbras", "ansiedade"]),
    );
    add(
        "cafeína",
        profile(
            400.0,
            Milligram,
            "100-200mg/dia",
            &["sinefrina", "ioimbina", "efedrina"],
            &["desempenho físico"],
        ),
    );
    add(
        "sinefrina",
        profile(50.0, Milligram, "10-30mg/dia", &["cafeína", "ioimbina"], &["termogênese"]),
    );
    add(
        "ioimbina",
        profile(15.0, Milligram, "5-10mg/dia", &["cafeína", "clonidina"], &["emagrecimento"]),
    );
    add(
        "5 htp",
        profile(
            300.0,
            Milligram,
            "50-200mg/dia",
            &["fluoxetina", "sertralina", "escitalopram", "tramadol"],
            &["humor", "compulsão alimentar"],
        ),
    );
    add(
        "ashwagandha",
        profile(1000.0, Milligram, "300-600mg/dia", &["levotiroxina"], &["estresse", "ansiedade"]),
    );
    add(
        "rhodiola rosea",
        profile(680.0, Milligram, "200-400mg/dia", &[], &["fadiga", "estresse"]),
    );
    add(
        "ginkgo biloba",
        profile(
            240.0,
            Milligram,
            "120-240mg/dia",
            &["varfarina", "ácido acetilsalicílico", "clopidogrel"],
            &["memória", "circulação periférica"],
        ),
    );
    add(
        "curcumina",
        profile(2000.0, Milligram, "500-1000mg/dia", &["varfarina"], &["inflamação"]),
    );
    add(
        "resveratrol",
        profile(1000.0, Milligram, "150-500mg/dia", &[], &["antioxidante"]),
    );
    add(
        "quercetina",
        profile(1000.0, Milligram, "500mg/dia", &[], &["alergia", "antioxidante"]),
    );
    add(
        "n acetilcisteína",
        profile(1800.0, Milligram, "600-1200mg/dia", &["nitroglicerina"], &["antioxidante"]),
    );
    add("dhea", profile(50.0, Milligram, "10-25mg/dia", &[], &["climatério"]));
    add(
        "tribulus terrestris",
        profile(1500.0, Milligram, "250-750mg/dia", &[], &["libido"]),
    );
    add(
        "minoxidil",
        profile(5.0, Milligram, "0.25-2.5mg/dia", &["guanetidina"], &["alopecia"]),
    );
    add(
        "finasterida",
        profile(5.0, Milligram, "1mg/dia", &[], &["alopecia androgenética"]),
    );
    add(
        "espironolactona",
        profile(
            200.0,
            Milligram,
            "25-100mg/dia",
            &["cloreto de potássio", "losartana"],
            &["acne", "hirsutismo"],
        ),
    );
    add(
        "tadalafila",
        profile(
            20.0,
            Milligram,
            "5mg/dia",
            &["nitratos", "isossorbida", "nitroglicerina"],
            &["disfunção erétil"],
        ),
    );
    add(
        "niacina",
        profile(
            1000.0,
            Milligram,
            "14-500mg/dia",
            &["sinvastatina", "atorvastatina", "rosuvastatina"],
            &["dislipidemia"],
        ),
    );
    add(
        "kava kava",
        profile(250.0, Milligram, "70-210mg/dia", &["álcool", "paracetamol"], &["ansiedade"]),
    );
    add(
        "hypericum perforatum",
        profile(
            900.0,
            Milligram,
            "300-900mg/dia",
            &["fluoxetina", "sertralina", "anticoncepcional", "varfarina", "ciclosporina"],
            &["depressão leve"],
        ),
    );
    add(
        "picnogenol",
        profile(200.0, Milligram, "50-150mg/dia", &[], &["insuficiência venosa", "melasma"]),
    );
    add(
        "laranja moro",
        profile(500.0, Milligram, "400mg/dia", &[], &["gordura abdominal"]),
    );

    map
}

pub(super) fn interactions() -> BTreeMap<String, BTreeMap<String, String>> {
    let entries: &[(&str, &str, &str)] = &[
        (
            "berberina",
            "metformina",
            "Efeito hipoglicemiante aditivo: risco de hipoglicemia grave. Monitorar glicemia.",
        ),
        (
            "berberina",
            "ciclosporina",
            "Berberina inibe CYP3A4 e eleva os níveis de ciclosporina, com risco de nefrotoxicidade.",
        ),
        (
            "melatonina",
            "fluvoxamina",
            "Fluvoxamina eleva em até 17 vezes os níveis de melatonina; sedação severa.",
        ),
        (
            "vitamina e",
            "varfarina",
            "Acima de 400 UI potencializa a anticoagulação; risco de sangramento grave.",
        ),
        (
            "vitamina a",
            "isotretinoína",
            "Risco de hipervitaminose A: uso concomitante contraindicado.",
        ),
        (
            "cafeína",
            "ioimbina",
            "Associação eleva pressão arterial e frequência cardíaca; cardiotoxicidade em predispostos.",
        ),
        (
            "cafeína",
            "efedrina",
            "Associação proibida: eventos cardiovasculares graves.",
        ),
        (
            "sinefrina",
            "cafeína",
            "Estímulo adrenérgico somado: taquicardia e risco de cardiotoxicidade.",
        ),
        (
            "sinefrina",
            "ioimbina",
            "Estimulação simpática severa com risco de crise hipertensiva.",
        ),
        (
            "ioimbina",
            "clonidina",
            "Antagonismo farmacológico; reduz o efeito anti-hipertensivo.",
        ),
        ("5 htp", "fluoxetina", "Risco de síndrome serotoninérgica grave."),
        ("5 htp", "sertralina", "Risco de síndrome serotoninérgica grave."),
        ("5 htp", "escitalopram", "Risco de síndrome serotoninérgica grave."),
        ("5 htp", "tramadol", "Risco de síndrome serotoninérgica grave."),
        (
            "ashwagandha",
            "levotiroxina",
            "Pode elevar T4 livre; monitorar função tireoidiana.",
        ),
        (
            "ginkgo biloba",
            "varfarina",
            "Antiagregação plaquetária somada: risco de sangramento grave.",
        ),
        (
            "ginkgo biloba",
            "ácido acetilsalicílico",
            "Antiagregação plaquetária somada: risco de sangramento grave.",
        ),
        (
            "ginkgo biloba",
            "clopidogrel",
            "Antiagregação plaquetária somada: risco de sangramento grave.",
        ),
        (
            "curcumina",
            "varfarina",
            "Pode potencializar o anticoagulante; acompanhar INR.",
        ),
        (
            "n acetilcisteína",
            "nitroglicerina",
            "Potencializa a vasodilatação; hipotensão severa.",
        ),
        (
            "minoxidil",
            "guanetidina",
            "Hipotensão ortostática severa; uso concomitante contraindicado.",
        ),
        (
            "espironolactona",
            "cloreto de potássio",
            "Risco de hipercalemia grave.",
        ),
        ("espironolactona", "losartana", "Risco de hipercalemia grave."),
        ("tadalafila", "nitratos", "Hipotensão grave; uso contraindicado."),
        ("tadalafila", "isossorbida", "Hipotensão grave; uso contraindicado."),
        ("tadalafila", "nitroglicerina", "Hipotensão grave; uso contraindicado."),
        (
            "niacina",
            "sinvastatina",
            "Risco aumentado de miopatia e hepatotoxicidade.",
        ),
        (
            "niacina",
            "atorvastatina",
            "Risco aumentado de miopatia e hepatotoxicidade.",
        ),
        (
            "niacina",
            "rosuvastatina",
            "Risco aumentado de miopatia e hepatotoxicidade.",
        ),
        ("kava kava", "álcool", "Hepatotoxicidade aditiva."),
        ("kava kava", "paracetamol", "Hepatotoxicidade aditiva."),
        (
            "hypericum perforatum",
            "fluoxetina",
            "Risco de síndrome serotoninérgica grave.",
        ),
        (
            "hypericum perforatum",
            "sertralina",
            "Risco de síndrome serotoninérgica grave.",
        ),
        (
            "hypericum perforatum",
            "anticoncepcional",
            "Indução enzimática reduz a eficácia contraceptiva.",
        ),
        (
            "hypericum perforatum",
            "varfarina",
            "Indução enzimática reduz o efeito anticoagulante.",
        ),
        (
            "hypericum perforatum",
            "ciclosporina",
            "Indução de CYP3A4 reduz níveis de ciclosporina; risco grave de rejeição.",
        ),
    ];

    let mut map: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for (a, b, description) in entries {
        map.entry(a.to_string())
            .or_default()
            .insert(b.to_string(), description.to_string());
    }
    map
}

pub(super) fn topical_limits() -> BTreeMap<String, TopicalLimit> {
    let entries: &[(&str, f64, (f64, f64), &str)] = &[
        ("minoxidil", 5.0, (2.0, 5.0), "Acima de 5% aumenta dermatite de contato e absorção sistêmica."),
        ("hidroquinona", 4.0, (2.0, 4.0), "Uso contínuo acima de 4% associado a ocronose."),
        ("tretinoína", 0.1, (0.025, 0.1), "Fotossensibilizante; uso noturno."),
        ("ácido glicólico", 10.0, (5.0, 10.0), "Concentrações maiores são de uso profissional (peeling)."),
        ("ácido salicílico", 2.0, (0.5, 2.0), "Risco de salicilismo em grandes áreas."),
        ("ácido kójico", 2.0, (1.0, 2.0), "Potencial sensibilizante."),
        ("ácido azelaico", 20.0, (15.0, 20.0), ""),
        ("ácido mandélico", 10.0, (5.0, 10.0), ""),
        ("arnica", 5.0, (1.0, 5.0), "Não aplicar em pele lesionada."),
        ("cafeína", 5.0, (1.0, 5.0), ""),
        ("niacinamida", 10.0, (2.0, 5.0), "Acima de 5% pode causar rubor."),
        ("alfa arbutin", 2.0, (1.0, 2.0), ""),
        ("ureia", 40.0, (3.0, 20.0), "Acima de 20% é queratolítica; restringir a áreas de hiperqueratose."),
        ("ácido hialurônico", 2.0, (0.1, 2.0), ""),
        ("cetoconazol", 2.0, (1.0, 2.0), ""),
        ("clobetasol", 0.05, (0.05, 0.05), "Corticoide de alta potência; uso por curto período."),
        ("mentol", 3.0, (0.1, 3.0), "Irritante acima de 3%."),
        ("cânfora", 3.0, (0.1, 3.0), "Tóxico se ingerido; evitar em crianças."),
        ("peróxido de benzoíla", 10.0, (2.5, 5.0), "Descolore tecidos."),
    ];

    entries
        .iter()
        .map(|(name, max, range, warning)| {
            let warnings = if warning.is_empty() {
                vec![]
            } else {
                vec![warning.to_string()]
            };
            (
                name.to_string(),
                TopicalLimit {
                    max_percentage: *max,
                    safe_range: *range,
                    warnings,
                },
            )
        })
        .collect()
}

/// Commercial/trade names and decorative tokens. Empty targets are stripped.
pub(super) fn name_map() -> Vec<NameMapping> {
    let entries: &[(&str, &str)] = &[
        // Decorative tokens
        ("liposomal", ""),
        ("lipossomal", ""),
        ("extrato", ""),
        ("seco", ""),
        ("padronizado", ""),
        ("quelato", ""),
        ("quelado", ""),
        ("micronizado", ""),
        ("anidra", ""),
        ("hcl", ""),
        ("cloridrato de", ""),
        ("bisglicinato de", ""),
        // Trade names and synonyms
        ("glucophage", "metformina"),
        ("berberine", "berberina"),
        ("melatonin", "melatonina"),
        ("caffeine", "cafeína"),
        ("cafeina", "cafeína"),
        ("ksm 66", "ashwagandha"),
        ("sensoril", "ashwagandha"),
        ("withania somnifera", "ashwagandha"),
        ("rhodiolife", "rhodiola rosea"),
        ("rhodiola", "rhodiola rosea"),
        ("meriva", "curcumina"),
        ("longvida", "curcumina"),
        ("bcm 95", "curcumina"),
        ("cúrcuma", "curcumina"),
        ("curcuma longa", "curcumina"),
        ("curcuma", "curcumina"),
        ("colecalciferol", "vitamina d3"),
        ("vitamina d", "vitamina d3"),
        ("metilcobalamina", "vitamina b12"),
        ("cianocobalamina", "vitamina b12"),
        ("hidroxocobalamina", "vitamina b12"),
        ("piridoxina", "vitamina b6"),
        ("piridoxal 5 fosfato", "vitamina b6"),
        ("p5p", "vitamina b6"),
        ("ácido ascórbico", "vitamina c"),
        ("acido ascorbico", "vitamina c"),
        ("tocoferol", "vitamina e"),
        ("palmitato de retinol", "vitamina a"),
        ("retinol", "vitamina a"),
        ("folato", "ácido fólico"),
        ("acido folico", "ácido fólico"),
        ("picolinato de cromo", "cromo"),
        ("selenometionina", "selênio"),
        ("selenio", "selênio"),
        ("magnesio", "magnésio"),
        ("griffonia simplicifolia", "5 htp"),
        ("griffonia", "5 htp"),
        ("5 hidroxitriptofano", "5 htp"),
        ("n acetilcisteína", "n acetilcisteína"),
        ("n acetilcisteina", "n acetilcisteína"),
        ("acetilcisteína", "n acetilcisteína"),
        ("nac", "n acetilcisteína"),
        ("citrus aurantium", "sinefrina"),
        ("yohimbina", "ioimbina"),
        ("yohimbe", "ioimbina"),
        ("ginkgo", "ginkgo biloba"),
        ("hipérico", "hypericum perforatum"),
        ("hiperico", "hypericum perforatum"),
        ("erva de são joão", "hypericum perforatum"),
        ("erva de sao joao", "hypericum perforatum"),
        ("pycnogenol", "picnogenol"),
        ("pinus pinaster", "picnogenol"),
        ("morosil", "laranja moro"),
        ("tribulus", "tribulus terrestris"),
        ("piper methysticum", "kava kava"),
        ("kava", "kava kava"),
        ("ácido nicotínico", "niacina"),
        ("acido nicotinico", "niacina"),
        ("nicotinamida", "niacinamida"),
        ("ácido retinoico", "tretinoína"),
        ("ácido retinóico", "tretinoína"),
        ("acido retinoico", "tretinoína"),
        ("tretinoina", "tretinoína"),
        ("arnica montana", "arnica"),
        ("diidroepiandrosterona", "dhea"),
        ("tadalafil", "tadalafila"),
        ("ubiquinol", "coenzima q10"),
        ("coq10", "coenzima q10"),
    ];

    entries
        .iter()
        .map(|(pattern, target)| NameMapping {
            pattern: pattern.to_string(),
            target: target.to_string(),
        })
        .collect()
}

/// Nutraceuticals and cofactors with no established ceiling in this context.
pub(super) fn known_safe() -> Vec<String> {
    [
        "coenzima q10",
        "l carnitina",
        "l glutamina",
        "l teanina",
        "glicina",
        "taurina",
        "inositol",
        "colágeno",
        "colageno",
        "creatina",
        "psyllium",
        "probióticos",
        "lactobacillus",
        "bifidobacterium",
        "ômega 3",
        "omega 3",
        "fosfatidilserina",
        "betaína",
        "espirulina",
        "clorela",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
