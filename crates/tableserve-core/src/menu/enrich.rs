//! Menu enrichment.
//!
//! The recipe API only supplies an id, a name and a thumbnail. Price,
//! description, rating and prep time are generated once, when the menu loads.

use std::ops::Range;

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::MenuConfig;
use crate::error::OrderingError;
use crate::menu::{MealSummary, MenuCategory, MenuItem};
use crate::money::{Currency, Money};

/// Turns [`MealSummary`] records into [`MenuItem`]s.
///
/// Randomness comes from the injected generator, so a seeded generator
/// produces a reproducible menu.
#[derive(Debug)]
pub struct MenuEnricher<R> {
    /// Price range in the currency's minor units; never empty.
    price_units: Range<i64>,
    currency: Currency,
    rng: R,
}

impl<R: Rng> MenuEnricher<R> {
    /// Prices are drawn from `[min_price, max_price)` in whole minor units.
    ///
    /// Fails unless the range holds at least one positive amount the
    /// currency can represent.
    pub fn new(
        min_price: Decimal,
        max_price: Decimal,
        currency: Currency,
        rng: R,
    ) -> Result<Self, OrderingError> {
        Ok(Self {
            price_units: price_unit_range(min_price, max_price, currency)?,
            currency,
            rng,
        })
    }

    /// Build from the `menu` config section.
    pub fn from_config(
        config: &MenuConfig,
        currency: Currency,
        rng: R,
    ) -> Result<Self, OrderingError> {
        Self::new(config.min_price, config.max_price, currency, rng)
    }

    /// Enrich a single record.
    pub fn enrich(&mut self, summary: MealSummary, category: MenuCategory) -> MenuItem {
        let units = self.rng.gen_range(self.price_units.clone());

        MenuItem {
            id: summary.id,
            name: summary.name,
            thumbnail_url: summary.thumbnail_url,
            price: Money::from_cents(units, self.currency),
            category,
            description: format!(
                "Delicious {} prepared with fresh ingredients and advanced culinary techniques.",
                category.as_str().to_lowercase()
            ),
            rating: Decimal::new(self.rng.gen_range(40..50), 1),
            prep_time_minutes: self.rng.gen_range(10..30),
        }
    }

    /// Enrich a category's records in order.
    pub fn enrich_all(
        &mut self,
        summaries: impl IntoIterator<Item = MealSummary>,
        category: MenuCategory,
    ) -> Vec<MenuItem> {
        summaries
            .into_iter()
            .map(|summary| self.enrich(summary, category))
            .collect()
    }
}

/// Minor-unit amounts `u` with `min <= u < max` once scaled back, e.g.
/// `[5, 25)` USD is `500..2500`. Bounds round up to the next minor unit.
pub(crate) fn price_unit_range(
    min_price: Decimal,
    max_price: Decimal,
    currency: Currency,
) -> Result<Range<i64>, OrderingError> {
    let invalid = || {
        OrderingError::Validation(format!(
            "menu price range {min_price}..{max_price} holds no {} amount of at least {}",
            currency.code(),
            currency.minor_unit()
        ))
    };
    let to_units = |amount: Decimal| {
        amount
            .checked_mul(Decimal::from(10i64.pow(currency.decimal_places())))
            .and_then(|scaled| scaled.ceil().to_i64())
    };

    let min = to_units(min_price).ok_or_else(invalid)?;
    let max = to_units(max_price).ok_or_else(invalid)?;
    if min < 1 || min >= max {
        return Err(invalid());
    }
    Ok(min..max)
}
