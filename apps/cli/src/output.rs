//! # Output
//!
//! Prints command results either as JSON (`--json`) or as plain text for
//! the terminal. Commands never print; they hand their view to [`Output`].

use serde::Serialize;
use std::fmt::Write;

use crate::commands::customer::CustomerList;
use crate::commands::dashboard::DashboardView;
use crate::commands::data::ResetSummary;
use crate::commands::expense::ExpenseList;
use crate::commands::insight::InsightView;
use crate::commands::product::{InventoryView, ProductDto};
use crate::commands::report::ReportView;
use crate::commands::sale::{Receipt, SalesHistory};
use crate::error::ApiError;
use crate::state::ConfigState;
use applemar_core::report::{format_timestamp, FinancialSummary};
use applemar_core::{Customer, Transaction, TransactionKind};

/// Text form of a command result.
pub trait Render {
    fn render(&self, config: &ConfigState) -> String;
}

/// Where results go.
#[derive(Debug, Clone, Copy)]
pub struct Output<'a> {
    json: bool,
    config: &'a ConfigState,
}

impl<'a> Output<'a> {
    pub fn new(json: bool, config: &'a ConfigState) -> Self {
        Output { json, config }
    }

    /// Prints `value`.
    pub fn show<T: Serialize + Render>(&self, value: &T) -> Result<(), ApiError> {
        let text = if self.json {
            serde_json::to_string_pretty(value)
                .map_err(|e| ApiError::internal(format!("Failed to encode output: {}", e)))?
        } else {
            value.render(self.config)
        };
        println!("{}", text.trim_end());
        Ok(())
    }

    /// Prints a one-line confirmation (text mode only) followed by `value`.
    pub fn done<T: Serialize + Render>(&self, message: &str, value: &T) -> Result<(), ApiError> {
        if !self.json {
            println!("{}", message);
        }
        self.show(value)
    }

    /// Prints preformatted text, or wraps it in a JSON object.
    pub fn text(&self, field: &str, text: &str) -> Result<(), ApiError> {
        if self.json {
            let mut object = serde_json::Map::new();
            object.insert(field.to_string(), serde_json::Value::String(text.to_string()));
            let encoded = serde_json::to_string_pretty(&object)
                .map_err(|e| ApiError::internal(format!("Failed to encode output: {}", e)))?;
            println!("{}", encoded);
            return Ok(());
        }
        print!("{}", text);
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn money(config: &ConfigState, cents: i64) -> String {
    config.format_currency(cents)
}

fn signed(config: &ConfigState, txn: &Transaction) -> String {
    match txn.kind {
        TransactionKind::Income => format!("+{}", money(config, txn.amount_cents)),
        TransactionKind::Expense => format!("-{}", money(config, txn.amount_cents)),
    }
}

fn kpi_lines(out: &mut String, config: &ConfigState, summary: &FinancialSummary) {
    for (label, value) in summary.kpis() {
        let _ = writeln!(out, "  {:<22}{:>22}", label, money(config, value.cents()));
    }
}

fn ledger_line(out: &mut String, config: &ConfigState, txn: &Transaction) {
    let _ = writeln!(
        out,
        "  {:<26}{:<18}{:<12}{:>20}  {}",
        txn.id,
        format_timestamp(txn.timestamp),
        txn.payment_method.to_string(),
        signed(config, txn),
        txn.description
    );
}

fn bar(pct: u32) -> String {
    let filled = (pct.min(100) / 5) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

// =============================================================================
// Products & Customers
// =============================================================================

impl Render for ProductDto {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  {} ({})", self.name, self.id);
        let _ = writeln!(out, "  Categoria:  {}", self.category);
        let _ = writeln!(out, "  Preço:      {}", money(config, self.price_cents));
        let _ = writeln!(out, "  Custo:      {}", money(config, self.cost_price_cents));
        let _ = writeln!(out, "  Margem:     {}", money(config, self.margin_cents));
        let _ = write!(out, "  Stock:      {}", self.stock);
        if self.negative_stock {
            let _ = write!(out, "  ⚠ stock negativo");
        } else if self.low_stock {
            let _ = write!(out, "  ⚠ stock crítico");
        }
        out
    }
}

impl Render for InventoryView {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let snap = &self.snapshot;
        let _ = writeln!(out, "Stock & Logística");
        let _ = writeln!(
            out,
            "  {} produtos · {} em stock crítico · {} unidades",
            snap.product_count, snap.critical_stock_count, snap.total_units
        );
        let _ = writeln!(
            out,
            "  Valor a custo {} · a retalho {} · margem potencial {}",
            money(config, snap.stock_value_cost_cents),
            money(config, snap.stock_value_retail_cents),
            money(config, snap.potential_margin_cents)
        );
        let _ = writeln!(out);

        if self.products.is_empty() {
            let _ = writeln!(out, "  Nenhum produto encontrado.");
            return out;
        }

        let _ = writeln!(
            out,
            "  {:<26}{:<30}{:<14}{:>18}{:>8}",
            "ID", "Produto", "Categoria", "Preço", "Stock"
        );
        for p in &self.products {
            let flag = if p.low_stock { " !" } else { "" };
            let _ = writeln!(
                out,
                "  {:<26}{:<30}{:<14}{:>18}{:>8}{}",
                p.id,
                p.name,
                p.category,
                money(config, p.price_cents),
                p.stock,
                flag
            );
        }
        out
    }
}

impl Render for Customer {
    fn render(&self, _config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  {} ({})", self.name, self.id);
        if !self.nif.is_empty() {
            let _ = writeln!(out, "  NIF:      {}", self.nif);
        }
        if !self.email.is_empty() {
            let _ = writeln!(out, "  Email:    {}", self.email);
        }
        if !self.phone.is_empty() {
            let _ = writeln!(out, "  Telefone: {}", self.phone);
        }
        out
    }
}

impl Render for CustomerList {
    fn render(&self, _config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "CRM Clientes · {} de {}",
            self.customers.len(),
            self.total
        );
        if self.customers.is_empty() {
            let _ = writeln!(out, "  Nenhum cliente encontrado.");
            return out;
        }
        for c in &self.customers {
            let _ = writeln!(
                out,
                "  {:<26}{:<34}{:<14}{}",
                c.id, c.name, c.nif, c.email
            );
        }
        out
    }
}

// =============================================================================
// Ledger
// =============================================================================

impl Render for Transaction {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  {} · {}", self.id, self.description);
        let _ = writeln!(out, "  Categoria: {}", self.category);
        let _ = writeln!(out, "  Data:      {}", format_timestamp(self.timestamp));
        let _ = writeln!(out, "  Pagamento: {}", self.payment_method);
        let _ = write!(out, "  Montante:  {}", signed(config, self));
        out
    }
}

impl Render for ExpenseList {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Gestão de Custos · total {}",
            money(config, self.total_cents)
        );
        if self.expenses.is_empty() {
            let _ = writeln!(out, "  Nenhuma despesa registada.");
        }
        for txn in &self.expenses {
            ledger_line(&mut out, config, txn);
        }
        out
    }
}

impl Render for Receipt {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Recibo {}", self.sale.id);
        let _ = writeln!(out, "  {}", format_timestamp(self.sale.timestamp));
        if let Some(name) = &self.customer_name {
            let _ = writeln!(out, "  Cliente: {}", name);
        }
        for item in self.sale.sale_items() {
            let _ = writeln!(
                out,
                "  {:>4} × {:<30}{:>20}",
                item.quantity,
                item.name,
                money(config, item.line_total().cents())
            );
        }
        let _ = writeln!(out, "  {:<37}{:>20}", "Subtotal", money(config, self.totals.subtotal_cents));
        let _ = writeln!(out, "  {:<37}{:>20}", "IVA", money(config, self.totals.tax_cents));
        let _ = writeln!(out, "  {:<37}{:>20}", "Total", money(config, self.totals.total_cents));
        let _ = writeln!(out, "  Pagamento: {}", self.sale.payment_method);
        for p in &self.low_stock {
            let _ = writeln!(out, "  ⚠ {} com stock crítico ({})", p.name, p.stock);
        }
        out
    }
}

impl Render for SalesHistory {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let s = &self.summary;
        let _ = writeln!(
            out,
            "Histórico de Vendas · {} vendas · total {} · IVA {} · ticket médio {}",
            s.sale_count,
            money(config, s.total_cents),
            money(config, s.iva_cents),
            money(config, s.average_ticket_cents)
        );
        if self.sales.is_empty() {
            let _ = writeln!(out, "  Nenhuma venda registada.");
        }
        for sale in &self.sales {
            ledger_line(&mut out, config, sale);
        }
        out
    }
}

impl Render for ReportView {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Relatórios · filtro: {}", self.filter.kind.label());
        kpi_lines(&mut out, config, &self.summary);
        let _ = writeln!(out);
        if self.transactions.is_empty() {
            let _ = writeln!(out, "  Nenhum lançamento encontrado.");
        }
        for txn in &self.transactions {
            ledger_line(&mut out, config, txn);
        }
        let _ = writeln!(out, "  {} lançamento(s)", self.transactions.len());
        out
    }
}

// =============================================================================
// Dashboard, Advisory, Reset
// =============================================================================

impl Render for DashboardView {
    fn render(&self, config: &ConfigState) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Painel Financeiro · {}", self.period.label());
        kpi_lines(&mut out, config, &self.summary);
        let _ = writeln!(
            out,
            "  Entradas {}% · Saídas {}%",
            self.summary.income_share_pct, self.summary.expense_share_pct
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Meta de vendas {}  {} {}%",
            money(config, self.sales_target_cents),
            bar(self.goal_progress),
            self.goal_progress
        );

        if !self.monthly.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Fluxo mensal");
            for m in &self.monthly {
                let _ = writeln!(
                    out,
                    "  {}  {:>20}  {:>20}",
                    m.month,
                    format!("+{}", money(config, m.income_cents)),
                    format!("-{}", money(config, m.expense_cents))
                );
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Stock crítico ({} de {} produtos)",
            self.inventory.critical_stock_count, self.inventory.product_count
        );
        for p in &self.critical {
            let _ = writeln!(out, "  {:<30}{:>6}", p.name, p.stock);
        }

        if !self.recent.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Últimos lançamentos");
            for txn in &self.recent {
                ledger_line(&mut out, config, txn);
            }
        }
        out
    }
}

impl Render for InsightView {
    fn render(&self, _config: &ConfigState) -> String {
        let s = &self.snapshot;
        let mut out = String::new();
        let _ = writeln!(out, "Applemar AI · Consultoria Financeira");
        let _ = writeln!(
            out,
            "  Receita {} · Despesas {} · Margem {}",
            s.income(),
            s.expense(),
            s.margin()
        );
        let _ = writeln!(
            out,
            "  {} produtos · {} em stock crítico",
            s.product_count, s.critical_stock_count
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.advice.trim());
        out
    }
}

impl Render for ResetSummary {
    fn render(&self, _config: &ConfigState) -> String {
        format!("Dados apagados ({} coleções).", self.removed_keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use applemar_core::{Money, PaymentMethod};
    use chrono::Utc;

    #[test]
    fn test_transaction_card_signs_amount() {
        let config = ConfigState::default();
        let expense = Transaction::expense(
            "Renda",
            "Renda da loja",
            Money::from_kwanza(350_000),
            PaymentMethod::Transfer,
            Utc::now(),
        );

        let text = expense.render(&config);
        assert!(text.contains("Renda da loja"));
        assert!(text.contains("-350 000,00 Kz"));
    }

    #[test]
    fn test_goal_bar() {
        assert_eq!(bar(0), "░".repeat(20));
        assert_eq!(bar(50), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(bar(100), "█".repeat(20));
    }

    #[test]
    fn test_reset_summary_text() {
        let text = ResetSummary { removed_keys: 3 }.render(&ConfigState::default());
        assert_eq!(text, "Dados apagados (3 coleções).");
    }
}
