//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (e.g. `dashboard --target`)
//! 2. Environment variables (`APPLEMAR_*`)
//! 3. Defaults (this file)
//!
//! Invalid environment values are logged and ignored rather than aborting
//! the command.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use applemar_core::validation::validate_sales_target;
use applemar_core::{Money, COMPANY_NAME, DEFAULT_SALES_TARGET_KZ, LOW_STOCK_THRESHOLD};

/// Application configuration.
///
/// IVA is not configurable: every sale is taxed at the fixed 14% rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Company name (statement header, advisory prompt)
    pub company_name: String,

    /// Sales goal shown on the dashboard, in cêntimos
    pub sales_target_cents: i64,

    /// Products with stock below this are critical
    pub low_stock_threshold: i64,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Company: "Applemar Company Lda"
    /// - Sales target: 1 000 000 Kz
    /// - Critical stock: below 5 units
    fn default() -> Self {
        ConfigState {
            company_name: COMPANY_NAME.to_string(),
            sales_target_cents: Money::from_kwanza(DEFAULT_SALES_TARGET_KZ).cents(),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `APPLEMAR_COMPANY_NAME`: Override company name
    /// - `APPLEMAR_SALES_TARGET`: Override sales target in Kz (e.g., "2 500 000")
    /// - `APPLEMAR_LOW_STOCK`: Override critical stock threshold
    pub fn from_env() -> Self {
        ConfigState::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ConfigState::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(company_name) = var("APPLEMAR_COMPANY_NAME") {
            config.company_name = company_name;
        }

        if let Some(raw) = var("APPLEMAR_SALES_TARGET") {
            match Money::parse(&raw).and_then(|m| validate_sales_target(m).map(|_| m)) {
                Ok(target) => config.sales_target_cents = target.cents(),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid APPLEMAR_SALES_TARGET"),
            }
        }

        if let Some(raw) = var("APPLEMAR_LOW_STOCK") {
            match raw.parse::<i64>() {
                Ok(level) if level >= 0 => config.low_stock_threshold = level,
                _ => warn!(value = %raw, "Ignoring invalid APPLEMAR_LOW_STOCK"),
            }
        }

        config
    }

    pub fn sales_target(&self) -> Money {
        Money::from_cents(self.sales_target_cents)
    }

    /// Formats a cêntimo amount the way Angolan receipts show it.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(285_000), "2 850,00 Kz");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        Money::from_cents(cents).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.company_name, "Applemar Company Lda");
        assert_eq!(config.sales_target(), Money::from_kwanza(1_000_000));
        assert_eq!(config.low_stock_threshold, 5);
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("APPLEMAR_COMPANY_NAME", "Applemar Benguela"),
            ("APPLEMAR_SALES_TARGET", "2 500 000"),
            ("APPLEMAR_LOW_STOCK", "10"),
        ]));

        assert_eq!(config.company_name, "Applemar Benguela");
        assert_eq!(config.sales_target(), Money::from_kwanza(2_500_000));
        assert_eq!(config.low_stock_threshold, 10);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ConfigState::from_lookup(lookup(&[
            ("APPLEMAR_SALES_TARGET", "0"),
            ("APPLEMAR_LOW_STOCK", "-1"),
            ("APPLEMAR_COMPANY_NAME", "   "),
        ]));

        assert_eq!(config.company_name, "Applemar Company Lda");
        assert_eq!(config.sales_target(), Money::from_kwanza(1_000_000));
        assert_eq!(config.low_stock_threshold, 5);
    }

    #[test]
    fn test_iva_rate_cannot_be_overridden() {
        let config = ConfigState::from_lookup(lookup(&[("APPLEMAR_TAX_RATE", "7")]));

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("taxRateBps").is_none());
        assert_eq!(json["companyName"], "Applemar Company Lda");
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(285_000), "2 850,00 Kz");
        assert_eq!(config.format_currency(0), "0,00 Kz");
        assert_eq!(config.format_currency(-35_000), "-350,00 Kz");
    }
}
