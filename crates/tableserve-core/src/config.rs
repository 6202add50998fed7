//! Ordering configuration.
//!
//! Every section has defaults, so an empty file (or none at all) yields the
//! standard restaurant setup: 8% tax, a 2.99 delivery fee, twelve tables and
//! the five TheMealDB categories.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::PricingPolicy;
use crate::error::OrderingError;
use crate::menu::{price_unit_range, MenuCategory};
use crate::money::{Currency, Money};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableServeConfig {
    /// Tax and fee settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Menu source and enrichment settings.
    #[serde(default)]
    pub menu: MenuConfig,

    /// Menu fetch retry settings.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Floor plan.
    #[serde(default)]
    pub tables: TablesConfig,

    /// Recommendation settings.
    #[serde(default)]
    pub recommendations: RecommendationsConfig,

    /// Key-value store keys.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TableServeConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), OrderingError> {
        if self.pricing.tax_rate < Decimal::ZERO {
            return Err(OrderingError::Validation(format!(
                "tax_rate must not be negative (got {})",
                self.pricing.tax_rate
            )));
        }
        if self.pricing.delivery_fee < Decimal::ZERO {
            return Err(OrderingError::Validation(format!(
                "delivery_fee must not be negative (got {})",
                self.pricing.delivery_fee
            )));
        }
        price_unit_range(
            self.menu.min_price,
            self.menu.max_price,
            self.pricing.currency,
        )?;
        if self.tables.count == 0 {
            return Err(OrderingError::Validation(
                "tables.count must be at least 1".to_string(),
            ));
        }
        if !(1..=self.tables.count).contains(&self.tables.home_table) {
            return Err(OrderingError::Validation(format!(
                "home_table {} is outside 1..={}",
                self.tables.home_table, self.tables.count
            )));
        }
        Ok(())
    }

    /// Pricing policy derived from the `pricing` section.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy::from(&self.pricing)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Tax and fee configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Tax rate applied to the subtotal.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,

    /// Flat fee added to any non-empty order.
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: Decimal,

    /// Currency of all menu prices.
    #[serde(default)]
    pub currency: Currency,
}

fn default_tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

fn default_delivery_fee() -> Decimal {
    Decimal::new(299, 2)
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            delivery_fee: default_delivery_fee(),
            currency: Currency::USD,
        }
    }
}

impl From<&PricingConfig> for PricingPolicy {
    fn from(config: &PricingConfig) -> Self {
        PricingPolicy {
            tax_rate: config.tax_rate,
            delivery_fee: Money::new(config.delivery_fee, config.currency),
        }
    }
}

/// Menu source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Base URL of the recipe API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Categories to fetch, in display order.
    #[serde(default = "default_categories")]
    pub categories: Vec<MenuCategory>,

    /// Items kept per category.
    #[serde(default = "default_items_per_category")]
    pub items_per_category: usize,

    /// Lowest generated price (inclusive).
    #[serde(default = "default_min_price")]
    pub min_price: Decimal,

    /// Highest generated price (exclusive).
    #[serde(default = "default_max_price")]
    pub max_price: Decimal,
}

fn default_api_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_categories() -> Vec<MenuCategory> {
    MenuCategory::ALL.to_vec()
}

fn default_items_per_category() -> usize {
    6
}

fn default_min_price() -> Decimal {
    Decimal::from(5)
}

fn default_max_price() -> Decimal {
    Decimal::from(25)
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            categories: default_categories(),
            items_per_category: default_items_per_category(),
            min_price: default_min_price(),
            max_price: default_max_price(),
        }
    }
}

/// Retry configuration for menu fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Backoff ceiling.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Floor plan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Number of tables, numbered from 1.
    #[serde(default = "default_table_count")]
    pub count: u32,

    /// The table distances are measured from.
    #[serde(default = "default_home_table")]
    pub home_table: u32,
}

fn default_table_count() -> u32 {
    12
}

fn default_home_table() -> u32 {
    5
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            count: default_table_count(),
            home_table: default_home_table(),
        }
    }
}

/// Recommendation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    /// Maximum suggestions shown.
    #[serde(default = "default_recommendation_limit")]
    pub limit: usize,
}

fn default_recommendation_limit() -> usize {
    3
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            limit: default_recommendation_limit(),
        }
    }
}

/// Key-value store keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_cart_key")]
    pub cart_key: String,

    #[serde(default = "default_history_key")]
    pub history_key: String,

    /// Prefix for per-order kitchen request keys (`<prefix>:<order id>`).
    #[serde(default = "default_requests_key_prefix")]
    pub requests_key_prefix: String,
}

fn default_cart_key() -> String {
    "cartItems".to_string()
}

fn default_history_key() -> String {
    "orderHistory".to_string()
}

fn default_requests_key_prefix() -> String {
    "kitchenRequests".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cart_key: default_cart_key(),
            history_key: default_history_key(),
            requests_key_prefix: default_requests_key_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableServeConfig::default();
        assert_eq!(config.pricing.tax_rate, Decimal::new(8, 2));
        assert_eq!(config.pricing.delivery_fee, Decimal::new(299, 2));
        assert_eq!(config.menu.categories.len(), 5);
        assert_eq!(config.menu.items_per_category, 6);
        assert_eq!(config.tables.count, 12);
        assert_eq!(config.tables.home_table, 5);
        assert_eq!(config.recommendations.limit, 3);
        assert_eq!(config.storage.cart_key, "cartItems");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TableServeConfig = toml::from_str(
            r#"
            [pricing]
            tax_rate = "0.1"

            [tables]
            count = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_rate, Decimal::new(1, 1));
        assert_eq!(config.pricing.delivery_fee, Decimal::new(299, 2));
        assert_eq!(config.tables.count, 20);
        assert_eq!(config.tables.home_table, 5);
        assert_eq!(config.menu, MenuConfig::default());
    }

    #[test]
    fn test_categories_from_json() {
        let config: TableServeConfig =
            serde_json::from_str(r#"{"menu": {"categories": ["Dessert", "Beef"]}}"#).unwrap();
        assert_eq!(
            config.menu.categories,
            vec![MenuCategory::Dessert, MenuCategory::Beef]
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TableServeConfig::default();
        config.pricing.tax_rate = Decimal::new(-1, 2);
        assert!(config.validate().is_err());

        let mut config = TableServeConfig::default();
        config.menu.min_price = Decimal::from(30);
        assert!(config.validate().is_err());

        // Rounds to a zero price.
        let mut config = TableServeConfig::default();
        config.menu.min_price = Decimal::new(1, 3);
        config.menu.max_price = Decimal::new(4, 3);
        assert!(config.validate().is_err());

        // Sub-yen bounds.
        let mut config = TableServeConfig::default();
        config.pricing.currency = Currency::JPY;
        config.menu.min_price = Decimal::new(1, 1);
        config.menu.max_price = Decimal::new(9, 1);
        assert!(config.validate().is_err());

        let mut config = TableServeConfig::default();
        config.tables.count = 0;
        assert!(config.validate().is_err());

        let mut config = TableServeConfig::default();
        config.tables.home_table = 13;
        assert!(matches!(
            config.validate(),
            Err(OrderingError::Validation(_))
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TableServeConfig::default();
        config.recommendations.limit = 5;

        for name in ["tableserve.toml", "tableserve.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            let loaded = TableServeConfig::load(&path).unwrap();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_load_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[tables]\ncount = 0\n").unwrap();

        let err = TableServeConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_pricing_policy_from_config() {
        let policy = TableServeConfig::default().pricing_policy();
        assert_eq!(policy.tax_rate, Decimal::new(8, 2));
        assert_eq!(policy.delivery_fee, Money::from_cents(299, Currency::USD));
    }
}
