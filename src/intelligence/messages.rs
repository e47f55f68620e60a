use super::helpers::format_number;

/// Label used as `active` for findings about the whole formula.
pub const WHOLE_FORMULA: &str = "Fórmula completa";

/// A rendered message with its recommendation. Both are always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub message: String,
    pub recommendation: String,
}

/// Pharmacist-facing wording for every finding the engine produces.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Topical dose more than three times the ceiling.
    pub fn topical_impossible(active: &str, dose: f64, ceiling: f64) -> Template {
        Template {
            message: format!(
                "{active} a {}% excede em mais de 3 vezes a concentração máxima tópica segura ({}%).",
                format_number(dose),
                format_number(ceiling),
            ),
            recommendation: format!(
                "Concentração inviável. Reduzir {active} para no máximo {}%.",
                format_number(ceiling),
            ),
        }
    }

    /// Topical dose above the ceiling.
    pub fn topical_critical(active: &str, dose: f64, ceiling: f64) -> Template {
        Template {
            message: format!(
                "{active} a {}% está acima da concentração máxima tópica recomendada ({}%).",
                format_number(dose),
                format_number(ceiling),
            ),
            recommendation: format!(
                "Ajustar {active} para até {}% ou justificar a concentração com o prescritor.",
                format_number(ceiling),
            ),
        }
    }

    /// Oral dose more than 300% of the daily limit.
    pub fn oral_impossible(
        active: &str,
        dose: f64,
        unit: &str,
        percentage: f64,
        max: f64,
        recommended: Option<&str>,
    ) -> Template {
        let recommendation = match recommended {
            Some(range) => format!(
                "Dose contraindicada. Não manipular; a faixa terapêutica usual é {range} \
                 (máximo {} {unit}/dia).",
                format_number(max),
            ),
            None => format!(
                "Dose contraindicada. Não manipular acima de {} {unit}/dia.",
                format_number(max),
            ),
        };
        Template {
            message: format!(
                "{active} {} {unit} corresponde a {}% da dose diária máxima ({} {unit}).",
                format_number(dose),
                format_number(percentage),
                format_number(max),
            ),
            recommendation,
        }
    }

    /// Oral dose above the daily limit.
    pub fn oral_critical(active: &str, dose: f64, unit: &str, percentage: f64, max: f64) -> Template {
        Template {
            message: format!(
                "{active} {} {unit} excede a dose diária máxima ({} {unit}): {}% do limite.",
                format_number(dose),
                format_number(max),
                format_number(percentage),
            ),
            recommendation: format!(
                "Limitar {active} a {} {unit}/dia ou confirmar a prescrição com o médico.",
                format_number(max),
            ),
        }
    }

    /// Oral dose between 20% and 100% of the daily limit.
    pub fn oral_warning(active: &str, dose: f64, unit: &str, percentage: f64, max: f64) -> Template {
        let conservative = max * 0.2;
        Template {
            message: format!(
                "{active} {} {unit} representa {}% da dose máxima e se aproxima do limite \
                 conservador de {} {unit}.",
                format_number(dose),
                format_number(percentage),
                format_number(conservative),
            ),
            recommendation: format!(
                "Verificar a indicação clínica; doses acima de {} {unit} exigem acompanhamento.",
                format_number(conservative),
            ),
        }
    }

    /// Oral dose below 10% of the lower recommended bound.
    pub fn oral_insufficient(active: &str, dose: f64, unit: &str, recommended: &str) -> Template {
        Template {
            message: format!(
                "{active} {} {unit} pode ser insuficiente para efeito terapêutico.",
                format_number(dose),
            ),
            recommendation: format!("Faixa usual: {recommended}. Confirmar a dose com o prescritor."),
        }
    }

    /// Summed percentage above 100%.
    pub fn total_impossible(total: f64) -> Template {
        Template {
            message: format!(
                "A soma das concentrações dos ativos é {}%, fisicamente impossível (acima de 100%).",
                format_number(total),
            ),
            recommendation: "Reformular: reduzir concentrações ou dividir em mais de uma formulação."
                .to_string(),
        }
    }

    /// Summed percentage between 80% and 100%.
    pub fn total_critical(total: f64) -> Template {
        Template {
            message: format!(
                "A soma das concentrações dos ativos é {}%, deixando pouco espaço para a base.",
                format_number(total),
            ),
            recommendation: "Manter a carga de ativos em até 70-80% para garantir a base/veículo."
                .to_string(),
        }
    }

    /// Capsule count above the practical limit.
    pub fn capsules_impractical(capsules: u32, total_mg: f64) -> Template {
        Template {
            message: format!(
                "A massa total ({} mg) exige cerca de {capsules} cápsulas por dose.",
                format_number(total_mg),
            ),
            recommendation: "Inviável em cápsulas: considerar sachê, pó para diluição ou \
                             dividir em duas fórmulas."
                .to_string(),
        }
    }

    /// Capsule count above two.
    pub fn capsules_advisory(capsules: u32, total_mg: f64) -> Template {
        Template {
            message: format!(
                "A massa total ({} mg) exige {capsules} cápsulas por dose.",
                format_number(total_mg),
            ),
            recommendation: "Confirmar adesão do paciente ao número de cápsulas.".to_string(),
        }
    }

    /// Topical load above 100%.
    pub fn topical_load_impractical(total: f64) -> Template {
        Template {
            message: format!(
                "Carga de ativos de {}% não deixa espaço para veículo.",
                format_number(total),
            ),
            recommendation: "Nova formulação necessária: dividir ativos entre produtos.".to_string(),
        }
    }

    /// Topical load between 80% and 100%.
    pub fn topical_load_advisory(total: f64) -> Template {
        Template {
            message: format!("Carga de ativos de {}% próxima do limite físico.", format_number(total)),
            recommendation: "Avaliar estabilidade e sensorial da base com alta carga de ativos."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topical_impossible_cites_ceiling() {
        let t = MessageTemplates::topical_impossible("Arnica", 16.0, 5.0);
        assert!(t.message.contains("16%"));
        assert!(t.recommendation.contains("5%"));
    }

    #[test]
    fn oral_critical_caps_at_max() {
        let t = MessageTemplates::oral_critical("Berberina", 2000.0, "mg", 133.33, 1500.0);
        assert!(t.recommendation.contains("1500 mg"));
    }

    #[test]
    fn oral_impossible_with_and_without_range() {
        let with = MessageTemplates::oral_impossible("Zinco", 200.0, "mg", 500.0, 40.0, Some("15-30mg/dia"));
        assert!(with.recommendation.contains("15-30mg/dia"));
        let without = MessageTemplates::oral_impossible("Zinco", 200.0, "mg", 500.0, 40.0, None);
        assert!(without.recommendation.contains("40 mg"));
    }

    #[test]
    fn warning_mentions_conservative_limit() {
        let t = MessageTemplates::oral_warning("Zinco", 30.0, "mg", 75.0, 40.0);
        assert!(t.message.contains("8 mg"));
    }

    #[test]
    fn every_template_has_recommendation() {
        let all = [
            MessageTemplates::total_impossible(120.0),
            MessageTemplates::total_critical(90.0),
            MessageTemplates::capsules_impractical(6, 2600.0),
            MessageTemplates::capsules_advisory(3, 1200.0),
            MessageTemplates::topical_load_impractical(110.0),
            MessageTemplates::topical_load_advisory(85.0),
            MessageTemplates::oral_insufficient("Berberina", 10.0, "mg", "500-1500mg/dia"),
        ];
        assert!(all.iter().all(|t| !t.recommendation.is_empty() && !t.message.is_empty()));
    }
}
