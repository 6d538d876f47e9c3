//! Template sets for the offline advisor
//!
//! One [`Messages`] table per language. Placeholders use `{name}` and are
//! filled with [`fill`]; unknown placeholders are left untouched.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Language;

/// Every string the offline advisor can emit for one language
#[derive(Debug)]
pub struct Messages {
    pub no_data: &'static str,
    /// `{balance}`
    pub quick_healthy: &'static str,
    /// `{expense}`, `{ratio_clause}`
    pub quick_warning: &'static str,
    /// `{ratio}`
    pub quick_ratio_clause: &'static str,
    /// `{category}`, filled in bold
    pub quick_tip: &'static str,
    pub deep_title: &'static str,
    /// `{expense}`, `{reserve}` (bold)
    pub deep_reserve: &'static str,
    /// `{ideal}`, `{expense}`
    pub deep_ratio: &'static str,
    pub market_title: &'static str,
    /// `{categories}`
    pub market_context: &'static str,
    /// Rendered as a list
    pub market_tips: &'static [&'static str],
}

const PT: Messages = Messages {
    no_data: "Adicione algumas transações para que eu possa analisar o perfil do casal.",
    quick_healthy: "✅ <b>Saúde Financeira:</b> O saldo está positivo em {balance}. Bom trabalho!",
    quick_warning: "⚠️ <b>Atenção:</b> Vocês gastaram {expense}{ratio_clause}.",
    quick_ratio_clause: ", o que representa {ratio}% da renda",
    quick_tip: "💡 <b>Dica:</b> A categoria {category} é o maior ralo de dinheiro hoje. Que tal um desafio de redução de 10% nela?",
    deep_title: "<b>Plano Estratégico (Regra 50/30/20)</b>",
    deep_reserve: "• <b>Reserva de Emergência:</b> Com base nos gastos de {expense}, vocês precisam de {reserve} guardados para 6 meses de segurança.",
    deep_ratio: "• <b>Análise de Proporção:</b> Seus gastos fixos devem idealmente ser {ideal}. Atualmente estão em {expense}.",
    market_title: "<b>Guia de Sobrevivência Econômica</b>",
    market_context: "Categorias analisadas: {categories}",
    market_tips: &[
        "A inflação corrói o dinheiro parado. Considere investimentos atrelados ao IPCA.",
        "Diversificar é a regra de ouro: nunca coloque todos os ovos na mesma cesta.",
        "Juros compostos trabalham para quem poupa e contra quem deve.",
    ],
};

const EN: Messages = Messages {
    no_data: "Add a few transactions so I can analyze the couple's profile.",
    quick_healthy: "✅ <b>Financial Health:</b> Your balance is positive at {balance}. Great job!",
    quick_warning: "⚠️ <b>Heads up:</b> You spent {expense}{ratio_clause}.",
    quick_ratio_clause: ", which is {ratio}% of your income",
    quick_tip: "💡 <b>Tip:</b> {category} is your biggest money drain right now. How about a 10% reduction challenge there?",
    deep_title: "<b>Strategic Plan (50/30/20 Rule)</b>",
    deep_reserve: "• <b>Emergency Fund:</b> Based on expenses of {expense}, you need {reserve} set aside for 6 months of safety.",
    deep_ratio: "• <b>Proportion Check:</b> Your fixed expenses should ideally be {ideal}. They are currently {expense}.",
    market_title: "<b>Economic Survival Guide</b>",
    market_context: "Categories analyzed: {categories}",
    market_tips: &[
        "Inflation erodes idle money. Consider inflation-indexed investments.",
        "Diversification is the golden rule: never put all your eggs in one basket.",
        "Compound interest works for savers and against debtors.",
    ],
};

const ES: Messages = Messages {
    no_data: "Agrega algunas transacciones para que pueda analizar el perfil de la pareja.",
    quick_healthy: "✅ <b>Salud Financiera:</b> El saldo es positivo en {balance}. ¡Buen trabajo!",
    quick_warning: "⚠️ <b>Atención:</b> Gastaron {expense}{ratio_clause}.",
    quick_ratio_clause: ", lo que representa el {ratio}% de los ingresos",
    quick_tip: "💡 <b>Consejo:</b> La categoría {category} es hoy la mayor fuga de dinero. ¿Qué tal un desafío de reducción del 10% en ella?",
    deep_title: "<b>Plan Estratégico (Regla 50/30/20)</b>",
    deep_reserve: "• <b>Fondo de Emergencia:</b> Con gastos de {expense}, necesitan {reserve} ahorrados para 6 meses de seguridad.",
    deep_ratio: "• <b>Análisis de Proporción:</b> Sus gastos fijos deberían ser idealmente {ideal}. Actualmente están en {expense}.",
    market_title: "<b>Guía de Supervivencia Económica</b>",
    market_context: "Categorías analizadas: {categories}",
    market_tips: &[
        "La inflación erosiona el dinero parado. Consideren inversiones indexadas a la inflación.",
        "Diversificar es la regla de oro: nunca pongan todos los huevos en la misma canasta.",
        "El interés compuesto trabaja a favor de quien ahorra y en contra de quien debe.",
    ],
};

impl Messages {
    pub fn for_language(language: Language) -> &'static Messages {
        match language {
            Language::Pt => &PT,
            Language::En => &EN,
            Language::Es => &ES,
        }
    }
}

/// Replace `{name}` placeholders with values
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

/// Currency figure with two decimals, e.g. `R$ 9000.00`
pub fn money(amount: Decimal, language: Language) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{} {:.2}", language.currency_symbol(), rounded)
}

/// Percentage with one decimal, e.g. `120.0`
pub fn percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fill() {
        assert_eq!(fill("a {x} b {y}", &[("x", "1"), ("y", "2")]), "a 1 b 2");
        assert_eq!(fill("keep {z}", &[("x", "1")]), "keep {z}");
    }

    #[test]
    fn test_money_and_percent() {
        assert_eq!(money(dec!(9000), Language::Pt), "R$ 9000.00");
        assert_eq!(money(dec!(12.345), Language::En), "$ 12.35");
        assert_eq!(percent(dec!(120)), "120.0");
        assert_eq!(percent(dec!(33.333333)), "33.3");
    }

    #[test]
    fn test_every_language_has_complete_templates() {
        for language in [Language::Pt, Language::En, Language::Es] {
            let m = Messages::for_language(language);
            assert!(m.quick_healthy.contains("{balance}"));
            assert!(m.quick_warning.contains("{expense}"));
            assert!(m.quick_warning.contains("{ratio_clause}"));
            assert!(m.quick_ratio_clause.contains("{ratio}"));
            assert!(m.quick_tip.contains("{category}"));
            assert!(m.deep_reserve.contains("{reserve}"));
            assert!(m.deep_ratio.contains("{ideal}"));
            assert!(m.market_context.contains("{categories}"));
            assert!(!m.no_data.is_empty());
            assert_eq!(m.market_tips.len(), 3);
        }
    }
}
