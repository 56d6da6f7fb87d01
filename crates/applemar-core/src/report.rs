//! # Reports
//!
//! Aggregates behind the dashboard, the report centre and the advisory prompt.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Report Pipeline                                │
//! │                                                                         │
//! │  transactions ──► Period::select ──► FinancialSummary ──► dashboard    │
//! │       │                                    │                            │
//! │       │                                    └──► goal_progress           │
//! │       │                                                                 │
//! │       ├──► TransactionFilter ──► render_statement ──► stdout (print)   │
//! │       ├──► monthly_breakdown ──► chart rows                            │
//! │       └──► SalesSummary ──► sales history                              │
//! │                                                                         │
//! │  products ──► InventorySnapshot ──┐                                    │
//! │                                   ├──► AdvisorSnapshot ──► AI prompt   │
//! │  FinancialSummary ────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function over slices; nothing is cached.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Customer, Product, Transaction, TransactionKind};

/// KPI labels used on the dashboard and on printed statements.
pub const LABEL_GROSS_FLOW: &str = "Fluxo Bruto";
pub const LABEL_TOTAL_COSTS: &str = "Custos Totais";
pub const LABEL_BALANCE: &str = "Saldo de Exercício";
pub const LABEL_IVA: &str = "IVA Retido";

/// Luanda wall-clock offset (WAT, UTC+1, no daylight saving).
const WAT_OFFSET_SECS: i32 = 3600;

// =============================================================================
// Financial Summary
// =============================================================================

/// Income/expense totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinancialSummary {
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    /// Income minus expense.
    pub balance_cents: i64,
    /// Sum of every entry's IVA, income or not.
    pub iva_total_cents: i64,
    /// Income as a rounded percentage of income + expense.
    pub income_share_pct: i64,
    /// Expense as a rounded percentage of income + expense.
    pub expense_share_pct: i64,
    #[ts(type = "number")]
    pub transaction_count: usize,
}

impl FinancialSummary {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut income = Money::zero();
        let mut expense = Money::zero();
        let mut iva = Money::zero();
        let mut count = 0;

        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => income += txn.amount(),
                TransactionKind::Expense => expense += txn.amount(),
            }
            iva += txn.tax_amount();
            count += 1;
        }

        let volume = income + expense;

        FinancialSummary {
            total_income_cents: income.cents(),
            total_expense_cents: expense.cents(),
            balance_cents: (income - expense).cents(),
            iva_total_cents: iva.cents(),
            income_share_pct: share_pct(income, volume),
            expense_share_pct: share_pct(expense, volume),
            transaction_count: count,
        }
    }

    #[inline]
    pub fn total_income(&self) -> Money {
        Money::from_cents(self.total_income_cents)
    }

    #[inline]
    pub fn total_expense(&self) -> Money {
        Money::from_cents(self.total_expense_cents)
    }

    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    #[inline]
    pub fn iva_total(&self) -> Money {
        Money::from_cents(self.iva_total_cents)
    }

    /// The four KPI rows in display order.
    pub fn kpis(&self) -> [(&'static str, Money); 4] {
        [
            (LABEL_GROSS_FLOW, self.total_income()),
            (LABEL_TOTAL_COSTS, self.total_expense()),
            (LABEL_BALANCE, self.balance()),
            (LABEL_IVA, self.iva_total()),
        ]
    }
}

/// Rounded share of `part` in `whole`; 0 when the part itself is zero.
fn share_pct(part: Money, whole: Money) -> i64 {
    if !part.is_positive() {
        return 0;
    }
    part.ratio_to(whole)
        .map(|r| (r * 100.0).round() as i64)
        .unwrap_or(0)
}

/// Progress towards the sales target, as a whole percentage.
///
/// ## Rules
/// - `min(100, round(income / target × 100))`
/// - A target of zero or below yields 0
/// - Never below 0
///
/// ## Example
/// ```rust
/// use applemar_core::money::Money;
/// use applemar_core::report::goal_progress;
///
/// let target = Money::from_kwanza(1_000_000);
/// assert_eq!(goal_progress(Money::from_kwanza(250_000), target), 25);
/// assert_eq!(goal_progress(Money::from_kwanza(3_000_000), target), 100);
/// assert_eq!(goal_progress(Money::from_kwanza(10), Money::zero()), 0);
/// ```
pub fn goal_progress(income: Money, target: Money) -> u32 {
    if !target.is_positive() {
        return 0;
    }
    income
        .ratio_to(target)
        .map(|r| (r * 100.0).round().clamp(0.0, 100.0) as u32)
        .unwrap_or(0)
}

// =============================================================================
// Period
// =============================================================================

/// Time window a dashboard view is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Period {
    /// Every transaction ever recorded.
    #[default]
    All,
    /// Same calendar day as `now`.
    Today,
    /// Same calendar month as `now`.
    Month,
    /// Same calendar year as `now`.
    Year,
}

impl Period {
    /// Calendar comparisons happen on Luanda local time.
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let ts = to_local(timestamp);
        let now = to_local(now);
        match self {
            Period::All => true,
            Period::Today => ts.date_naive() == now.date_naive(),
            Period::Month => ts.year() == now.year() && ts.month() == now.month(),
            Period::Year => ts.year() == now.year(),
        }
    }

    /// Transactions that fall in this period, order preserved.
    pub fn select<'a>(
        &self,
        transactions: &'a [Transaction],
        now: DateTime<Utc>,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|t| self.contains(t.timestamp, now))
            .collect()
    }

    /// Portuguese label shown in the dashboard header.
    pub fn label(&self) -> &'static str {
        match self {
            Period::All => "GLOBAL",
            Period::Today => "HOJE",
            Period::Month => "MENSAL",
            Period::Year => "ANUAL",
        }
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "tudo" | "global" => Ok(Period::All),
            "today" | "hoje" | "day" => Ok(Period::Today),
            "month" | "mensal" | "mes" | "mês" => Ok(Period::Month),
            "year" | "anual" | "ano" => Ok(Period::Year),
            _ => Err(ValidationError::NotAllowed {
                field: "period".to_string(),
                allowed: vec![
                    "ALL".to_string(),
                    "TODAY".to_string(),
                    "MONTH".to_string(),
                    "YEAR".to_string(),
                ],
            }),
        }
    }
}

fn to_local(ts: DateTime<Utc>) -> DateTime<FixedOffset> {
    match FixedOffset::east_opt(WAT_OFFSET_SECS) {
        Some(offset) => ts.with_timezone(&offset),
        None => ts.fixed_offset(),
    }
}

/// Formats a timestamp as Luanda local `dd/mm/aaaa HH:MM`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    to_local(ts).format("%d/%m/%Y %H:%M").to_string()
}

// =============================================================================
// Transaction Filter
// =============================================================================

/// Type selector of the report centre (Tudo / Entradas / Saídas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    pub fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == TransactionKind::Income,
            KindFilter::Expense => kind == TransactionKind::Expense,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            KindFilter::All => "Tudo",
            KindFilter::Income => "Entradas",
            KindFilter::Expense => "Saídas",
        }
    }
}

impl FromStr for KindFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "tudo" => Ok(KindFilter::All),
            "income" | "entradas" | "entrada" => Ok(KindFilter::Income),
            "expense" | "saidas" | "saídas" | "saida" | "saída" => Ok(KindFilter::Expense),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec![
                    "ALL".to_string(),
                    "INCOME".to_string(),
                    "EXPENSE".to_string(),
                ],
            }),
        }
    }
}

/// Search box plus type selector of the report centre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionFilter {
    /// Case-insensitive substring of description, id or category.
    pub search: String,
    pub kind: KindFilter,
}

impl TransactionFilter {
    pub fn new(search: impl Into<String>, kind: KindFilter) -> Self {
        TransactionFilter {
            search: search.into(),
            kind,
        }
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if !self.kind.matches(txn.kind) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        txn.description.to_lowercase().contains(&needle)
            || txn.id.to_lowercase().contains(&needle)
            || txn.category.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}

// =============================================================================
// Monthly Breakdown
// =============================================================================

/// Income and expense for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyTotals {
    /// `YYYY-MM`.
    pub month: String,
    pub income_cents: i64,
    pub expense_cents: i64,
}

/// Per-month income/expense on the Luanda calendar, oldest first.
///
/// Months without transactions are omitted.
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<(i32, u32), (Money, Money)> = BTreeMap::new();

    for txn in transactions {
        let local = to_local(txn.timestamp);
        let key = (local.year(), local.month());
        let entry = months.entry(key).or_default();
        match txn.kind {
            TransactionKind::Income => entry.0 += txn.amount(),
            TransactionKind::Expense => entry.1 += txn.amount(),
        }
    }

    months
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyTotals {
            month: format!("{:04}-{:02}", year, month),
            income_cents: income.cents(),
            expense_cents: expense.cents(),
        })
        .collect()
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Totals over the sales history (transactions that carry line items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesSummary {
    #[ts(type = "number")]
    pub sale_count: usize,
    pub total_cents: i64,
    pub iva_cents: i64,
    /// Mean sale amount; zero when there are no sales.
    pub average_ticket_cents: i64,
}

impl SalesSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let sales: Vec<&Transaction> = transactions.iter().filter(|t| t.is_sale()).collect();
        let total: Money = sales.iter().map(|t| t.amount()).sum();
        let iva: Money = sales.iter().map(|t| t.tax_amount()).sum();
        let average = if sales.is_empty() {
            0
        } else {
            total.cents() / sales.len() as i64
        };

        SalesSummary {
            sale_count: sales.len(),
            total_cents: total.cents(),
            iva_cents: iva.cents(),
            average_ticket_cents: average,
        }
    }
}

// =============================================================================
// Inventory Snapshot
// =============================================================================

/// Stock figures for the inventory view and the advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventorySnapshot {
    #[ts(type = "number")]
    pub product_count: usize,
    /// Products with stock below the threshold.
    #[ts(type = "number")]
    pub critical_stock_count: usize,
    pub total_units: i64,
    /// Σ cost × stock. Negative stock is valued at zero.
    pub stock_value_cost_cents: i64,
    /// Σ price × stock. Negative stock is valued at zero.
    pub stock_value_retail_cents: i64,
    /// Retail value minus cost value.
    pub potential_margin_cents: i64,
}

impl InventorySnapshot {
    pub fn from_products(products: &[Product], threshold: i64) -> Self {
        let mut snapshot = InventorySnapshot {
            product_count: products.len(),
            ..Default::default()
        };

        for product in products {
            if product.is_low_stock(threshold) {
                snapshot.critical_stock_count += 1;
            }
            let units = product.stock.max(0);
            snapshot.total_units += units;
            snapshot.stock_value_cost_cents += product.cost_price().multiply_quantity(units).cents();
            snapshot.stock_value_retail_cents += product.price().multiply_quantity(units).cents();
        }

        snapshot.potential_margin_cents =
            snapshot.stock_value_retail_cents - snapshot.stock_value_cost_cents;
        snapshot
    }
}

/// Products below the threshold, lowest stock first.
pub fn critical_products(products: &[Product], threshold: i64) -> Vec<&Product> {
    let mut critical: Vec<&Product> = products
        .iter()
        .filter(|p| p.is_low_stock(threshold))
        .collect();
    critical.sort_by_key(|p| p.stock);
    critical
}

// =============================================================================
// Advisor Snapshot
// =============================================================================

/// Everything the advisory prompt is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdvisorSnapshot {
    pub company: String,
    pub income_cents: i64,
    pub expense_cents: i64,
    /// Income minus expense.
    pub margin_cents: i64,
    #[ts(type = "number")]
    pub product_count: usize,
    #[ts(type = "number")]
    pub critical_stock_count: usize,
    pub critical_threshold: i64,
}

impl AdvisorSnapshot {
    pub fn build(
        company: impl Into<String>,
        transactions: &[Transaction],
        products: &[Product],
        threshold: i64,
    ) -> Self {
        let summary = FinancialSummary::from_transactions(transactions);
        let inventory = InventorySnapshot::from_products(products, threshold);

        AdvisorSnapshot {
            company: company.into(),
            income_cents: summary.total_income_cents,
            expense_cents: summary.total_expense_cents,
            margin_cents: summary.balance_cents,
            product_count: inventory.product_count,
            critical_stock_count: inventory.critical_stock_count,
            critical_threshold: threshold,
        }
    }

    #[inline]
    pub fn income(&self) -> Money {
        Money::from_cents(self.income_cents)
    }

    #[inline]
    pub fn expense(&self) -> Money {
        Money::from_cents(self.expense_cents)
    }

    #[inline]
    pub fn margin(&self) -> Money {
        Money::from_cents(self.margin_cents)
    }
}

// =============================================================================
// Search
// =============================================================================

/// Inventory search: name or category contains the query.
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// CRM search: name contains the query (case-insensitive) or NIF contains it.
pub fn search_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let query = query.trim();
    let needle = query.to_lowercase();
    customers
        .iter()
        .filter(|c| {
            needle.is_empty() || c.name.to_lowercase().contains(&needle) || c.nif.contains(query)
        })
        .collect()
}

// =============================================================================
// Printable Statement
// =============================================================================

/// Header context of a printed statement.
#[derive(Debug, Clone)]
pub struct StatementHeader<'a> {
    pub company: &'a str,
    pub generated_at: DateTime<Utc>,
    pub filter: &'a TransactionFilter,
}

const RULE_WIDTH: usize = 78;

/// Renders the report centre as a plain-text statement ready for printing.
///
/// KPIs cover every transaction; the rows below them honour the filter.
///
/// ## Layout
/// ```text
/// APPLEMAR COMPANY LDA
/// Relatório Financeiro · Gerado em 17/10/2026 14:30
/// Filtro: Tudo
/// ──────────────────────────────────────────────
/// Fluxo Bruto                         2 850,00 Kz
/// ...
/// ──────────────────────────────────────────────
/// V-3F9A1C07B2  17/10/2026 14:29  Crédito  CASH   +2 850,00 Kz
///     Venda de 3 itens · Venda de Produtos
/// ```
pub fn render_statement(header: &StatementHeader<'_>, transactions: &[Transaction]) -> String {
    let summary = FinancialSummary::from_transactions(transactions);
    let rows = header.filter.apply(transactions);
    let rule = "─".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", header.company.to_uppercase());
    let _ = writeln!(
        out,
        "Relatório Financeiro · Gerado em {}",
        format_timestamp(header.generated_at)
    );
    let _ = write!(out, "Filtro: {}", header.filter.kind.label());
    if !header.filter.search.trim().is_empty() {
        let _ = write!(out, " · \"{}\"", header.filter.search.trim());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);

    for (label, value) in summary.kpis() {
        let _ = writeln!(out, "{:<24}{:>24}", label, value.to_string());
    }

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{:<14}{:<18}{:<9}{:<12}{:>20}",
        "Referência", "Data & Hora", "Tipo", "Pagamento", "Montante"
    );
    let _ = writeln!(out, "{}", rule);

    for txn in &rows {
        let _ = writeln!(out, "{}", StatementRow(txn));
    }

    if rows.is_empty() {
        let _ = writeln!(out, "Nenhum lançamento encontrado.");
    }

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{} lançamento(s)", rows.len());
    out
}

struct StatementRow<'a>(&'a Transaction);

impl fmt::Display for StatementRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let txn = self.0;
        let (kind, sign) = match txn.kind {
            TransactionKind::Income => ("Crédito", '+'),
            TransactionKind::Expense => ("Débito", '-'),
        };
        let amount = format!("{}{}", sign, txn.amount());

        writeln!(
            f,
            "{:<14}{:<18}{:<9}{:<12}{:>20}",
            txn.id,
            format_timestamp(txn.timestamp),
            kind,
            txn.payment_method.to_string(),
            amount
        )?;
        write!(f, "    {} · {}", txn.description, txn.category)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, SaleItem, TransactionStatus};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn income(id: &str, kz: i64, tax_kz: i64, ts: DateTime<Utc>) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind: TransactionKind::Income,
            category: "Venda de Produtos".to_string(),
            description: "Venda de 3 itens".to_string(),
            amount_cents: Money::from_kwanza(kz).cents(),
            timestamp: ts,
            payment_method: PaymentMethod::Cash,
            is_taxable: Some(true),
            tax_amount_cents: Some(Money::from_kwanza(tax_kz).cents()),
            status: TransactionStatus::Paid,
            items: Some(vec![SaleItem {
                product_id: "P-1".to_string(),
                name: "Água Pura".to_string(),
                price_cents: Money::from_kwanza(kz).cents(),
                quantity: 1,
            }]),
            customer_id: None,
        }
    }

    fn expense(id: &str, kz: i64, ts: DateTime<Utc>) -> Transaction {
        let mut txn = Transaction::expense(
            "Operacional",
            "Renda do armazém",
            Money::from_kwanza(kz),
            PaymentMethod::Transfer,
            ts,
        );
        txn.id = id.to_string();
        txn
    }

    fn product(name: &str, category: &str, stock: i64) -> Product {
        Product::new(
            name,
            Money::from_kwanza(300),
            Money::from_kwanza(200),
            stock,
            category,
        )
    }

    #[test]
    fn test_financial_summary() {
        let txns = vec![
            income("V-1", 3_000, 420, at(2026, 10, 1)),
            expense("E-1", 1_000, at(2026, 10, 2)),
        ];
        let summary = FinancialSummary::from_transactions(&txns);

        assert_eq!(summary.total_income(), Money::from_kwanza(3_000));
        assert_eq!(summary.total_expense(), Money::from_kwanza(1_000));
        assert_eq!(summary.balance(), Money::from_kwanza(2_000));
        assert_eq!(summary.iva_total(), Money::from_kwanza(420));
        assert_eq!(summary.income_share_pct, 75);
        assert_eq!(summary.expense_share_pct, 25);
        assert_eq!(summary.transaction_count, 2);
    }

    #[test]
    fn test_financial_summary_empty() {
        let summary = FinancialSummary::from_transactions(std::iter::empty());
        assert_eq!(summary, FinancialSummary::default());
        assert_eq!(summary.kpis()[0], (LABEL_GROSS_FLOW, Money::zero()));
    }

    #[test]
    fn test_shares_with_only_expenses() {
        let txns = vec![expense("E-1", 500, at(2026, 1, 1))];
        let summary = FinancialSummary::from_transactions(&txns);
        assert_eq!(summary.income_share_pct, 0);
        assert_eq!(summary.expense_share_pct, 100);
        assert_eq!(summary.balance(), Money::from_kwanza(-500));
    }

    #[test]
    fn test_goal_progress() {
        let target = Money::from_kwanza(1_000_000);
        assert_eq!(goal_progress(Money::zero(), target), 0);
        assert_eq!(goal_progress(Money::from_kwanza(2_850), target), 0);
        assert_eq!(goal_progress(Money::from_kwanza(6_000), target), 1);
        assert_eq!(goal_progress(Money::from_kwanza(999_999), target), 100);
        assert_eq!(goal_progress(Money::from_kwanza(1_500_000), target), 100);
        assert_eq!(goal_progress(Money::from_kwanza(100), Money::from_kwanza(-1)), 0);
    }

    #[test]
    fn test_transaction_filter() {
        let txns = vec![
            income("V-ABC", 3_000, 420, at(2026, 10, 1)),
            expense("E-XYZ", 1_000, at(2026, 10, 2)),
        ];

        let all = TransactionFilter::default();
        assert_eq!(all.apply(&txns).len(), 2);

        let by_desc = TransactionFilter::new("ARMAZÉM", KindFilter::All);
        assert_eq!(by_desc.apply(&txns)[0].id, "E-XYZ");

        let by_id = TransactionFilter::new("v-abc", KindFilter::All);
        assert_eq!(by_id.apply(&txns).len(), 1);

        let by_category = TransactionFilter::new("operacional", KindFilter::Income);
        assert!(by_category.apply(&txns).is_empty());

        let incomes = TransactionFilter::new("", KindFilter::Income);
        assert_eq!(incomes.apply(&txns)[0].id, "V-ABC");
    }

    #[test]
    fn test_period_select() {
        let now = at(2026, 10, 17);
        let txns = vec![
            income("V-1", 100, 14, at(2026, 10, 17)),
            income("V-2", 100, 14, at(2026, 10, 3)),
            income("V-3", 100, 14, at(2026, 2, 3)),
            income("V-4", 100, 14, at(2025, 10, 17)),
        ];

        assert_eq!(Period::All.select(&txns, now).len(), 4);
        assert_eq!(Period::Today.select(&txns, now).len(), 1);
        assert_eq!(Period::Month.select(&txns, now).len(), 2);
        assert_eq!(Period::Year.select(&txns, now).len(), 3);
    }

    #[test]
    fn test_period_uses_luanda_day() {
        // 23:30 UTC is already the next day in Luanda.
        let late = Utc.with_ymd_and_hms(2026, 10, 16, 23, 30, 0).unwrap();
        let now = at(2026, 10, 17);
        assert!(Period::Today.contains(late, now));
        assert_eq!(format_timestamp(late), "17/10/2026 00:30");
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("entradas".parse::<KindFilter>().unwrap(), KindFilter::Income);
        assert_eq!("EXPENSE".parse::<KindFilter>().unwrap(), KindFilter::Expense);
        assert_eq!("mensal".parse::<Period>().unwrap(), Period::Month);
        assert!("semana".parse::<Period>().is_err());
    }

    #[test]
    fn test_monthly_breakdown() {
        let txns = vec![
            income("V-1", 3_000, 0, at(2026, 10, 1)),
            expense("E-1", 1_000, at(2026, 9, 30)),
            income("V-2", 500, 0, at(2026, 10, 20)),
        ];
        let months = monthly_breakdown(&txns);

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2026-09");
        assert_eq!(months[0].income_cents, 0);
        assert_eq!(months[0].expense_cents, Money::from_kwanza(1_000).cents());
        assert_eq!(months[1].month, "2026-10");
        assert_eq!(months[1].income_cents, Money::from_kwanza(3_500).cents());
    }

    #[test]
    fn test_monthly_breakdown_uses_luanda_month() {
        let late_january_utc = Utc.with_ymd_and_hms(2026, 1, 31, 23, 30, 0).unwrap();
        let txns = vec![expense("E-1", 100, late_january_utc)];

        let months = monthly_breakdown(&txns);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].month, "2026-02");

        let now = Utc.with_ymd_and_hms(2026, 2, 15, 12, 0, 0).unwrap();
        assert!(Period::Month.contains(late_january_utc, now));
    }

    #[test]
    fn test_sales_summary_ignores_plain_entries() {
        let txns = vec![
            income("V-1", 2_850, 350, at(2026, 10, 1)),
            income("V-2", 1_150, 150, at(2026, 10, 1)),
            expense("E-1", 1_000, at(2026, 10, 2)),
        ];
        let sales = SalesSummary::from_transactions(&txns);

        assert_eq!(sales.sale_count, 2);
        assert_eq!(sales.total_cents, Money::from_kwanza(4_000).cents());
        assert_eq!(sales.iva_cents, Money::from_kwanza(500).cents());
        assert_eq!(sales.average_ticket_cents, Money::from_kwanza(2_000).cents());

        assert_eq!(SalesSummary::from_transactions(&[]).average_ticket_cents, 0);
    }

    #[test]
    fn test_inventory_snapshot() {
        let products = vec![
            product("Água Pura", "Bebidas", 10),
            product("Sumo Compal", "Bebidas", 2),
            product("Arroz 5kg", "Mercearia", -3),
        ];
        let snapshot = InventorySnapshot::from_products(&products, 5);

        assert_eq!(snapshot.product_count, 3);
        assert_eq!(snapshot.critical_stock_count, 2);
        assert_eq!(snapshot.total_units, 12);
        assert_eq!(snapshot.stock_value_cost_cents, Money::from_kwanza(2_400).cents());
        assert_eq!(snapshot.stock_value_retail_cents, Money::from_kwanza(3_600).cents());
        assert_eq!(snapshot.potential_margin_cents, Money::from_kwanza(1_200).cents());

        let critical = critical_products(&products, 5);
        assert_eq!(critical[0].name, "Arroz 5kg");
        assert_eq!(critical[1].name, "Sumo Compal");
    }

    #[test]
    fn test_advisor_snapshot() {
        let txns = vec![
            income("V-1", 3_000, 420, at(2026, 10, 1)),
            expense("E-1", 1_000, at(2026, 10, 2)),
        ];
        let products = vec![product("Água Pura", "Bebidas", 1)];
        let snapshot = AdvisorSnapshot::build("Applemar Company Lda", &txns, &products, 5);

        assert_eq!(snapshot.margin(), Money::from_kwanza(2_000));
        assert_eq!(snapshot.product_count, 1);
        assert_eq!(snapshot.critical_stock_count, 1);
    }

    #[test]
    fn test_search_products_and_customers() {
        let products = vec![
            product("Água Pura", "Bebidas", 10),
            product("Arroz 5kg", "Mercearia", 8),
        ];
        assert_eq!(search_products(&products, "água").len(), 1);
        assert_eq!(search_products(&products, "MERCEARIA")[0].name, "Arroz 5kg");
        assert_eq!(search_products(&products, "").len(), 2);

        let customers = vec![
            Customer::new("Sonangol EP", "5000000000", "", ""),
            Customer::new("Maria João", "004567890LA042", "", ""),
        ];
        assert_eq!(search_customers(&customers, "sonangol").len(), 1);
        assert_eq!(search_customers(&customers, "LA042")[0].name, "Maria João");
        assert!(search_customers(&customers, "Unitel").is_empty());
    }

    #[test]
    fn test_render_statement() {
        let txns = vec![
            income("V-ABC", 2_850, 350, at(2026, 10, 1)),
            expense("E-XYZ", 1_000, at(2026, 10, 2)),
        ];
        let filter = TransactionFilter::new("", KindFilter::Expense);
        let header = StatementHeader {
            company: "Applemar Company Lda",
            generated_at: at(2026, 10, 17),
            filter: &filter,
        };
        let text = render_statement(&header, &txns);

        assert!(text.starts_with("APPLEMAR COMPANY LDA\n"));
        assert!(text.contains("Gerado em 17/10/2026 13:00"));
        assert!(text.contains("Filtro: Saídas"));
        // KPIs still cover both entries.
        assert!(text.contains("2 850,00 Kz"));
        assert!(text.contains(LABEL_IVA));
        assert!(text.contains("-1 000,00 Kz"));
        assert!(!text.contains("V-ABC"));
        assert!(text.contains("1 lançamento(s)"));
    }
}
