//! # Prompt Builder
//!
//! Turns an [`AdvisorSnapshot`] into the Portuguese CFO prompt.

use applemar_core::report::AdvisorSnapshot;

/// The four areas the advice must cover, in order.
pub const ADVICE_TOPICS: [&str; 4] = [
    "Reduzir custos operacionais.",
    "Otimizar o fluxo de caixa.",
    "Melhorar a margem de lucro.",
    "Expansão do negócio em Luanda.",
];

/// Builds the prompt sent to the model.
pub fn build_prompt(snapshot: &AdvisorSnapshot) -> String {
    let mut prompt = format!(
        "Analise o status financeiro global da empresa {} em Angola:\n\
         - Receita Total (Entradas): {}\n\
         - Despesas Totais (Custos): {}\n\
         - Margem de Lucro: {}\n\
         - Total de Produtos em Stock: {}\n\
         - Stock Crítico (<{}): {} produtos.\n\n\
         Aja como um CFO (Diretor Financeiro) de alto nível. \
         Dê {} conselhos estratégicos detalhados em Português de Angola para:\n",
        snapshot.company,
        snapshot.income(),
        snapshot.expense(),
        snapshot.margin(),
        snapshot.product_count,
        snapshot.critical_threshold,
        snapshot.critical_stock_count,
        ADVICE_TOPICS.len(),
    );

    for (i, topic) in ADVICE_TOPICS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, topic));
    }

    prompt.push_str("Use uma linguagem profissional, executiva e motivadora.");
    prompt
}
