//! Cart pricing calculations.
//!
//! All arithmetic is exact; [`PriceBreakdown::rounded`] is for display only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;
use crate::error::OrderingError;
use crate::money::{Currency, Money};

/// Tax rate and delivery fee applied to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Applied to the subtotal, e.g. `0.08`.
    pub tax_rate: Decimal,
    /// Charged whenever the subtotal is positive.
    pub delivery_fee: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            delivery_fee: Money::from_cents(299, Currency::USD),
        }
    }
}

impl PricingPolicy {
    /// Currency every figure is expressed in.
    pub fn currency(&self) -> Currency {
        self.delivery_fee.currency
    }

    /// `Σ unit_price × quantity`.
    pub fn subtotal(&self, items: &[CartLineItem]) -> Result<Money, OrderingError> {
        items.iter().try_fold(Money::zero(self.currency()), |acc, item| {
            acc.checked_add(&item.line_total()?)
        })
    }

    /// `subtotal × tax_rate`, unrounded.
    pub fn tax(&self, subtotal: &Money) -> Result<Money, OrderingError> {
        subtotal
            .try_multiply_rate(self.tax_rate)
            .ok_or(OrderingError::Overflow)
    }

    /// The flat fee when there is something to deliver, zero otherwise.
    pub fn delivery_fee(&self, subtotal: &Money) -> Money {
        if subtotal.is_positive() {
            self.delivery_fee
        } else {
            Money::zero(self.currency())
        }
    }

    /// Price a set of line items.
    pub fn breakdown(&self, items: &[CartLineItem]) -> Result<PriceBreakdown, OrderingError> {
        let subtotal = self.subtotal(items)?;
        let tax = self.tax(&subtotal)?;
        let delivery_fee = self.delivery_fee(&subtotal);
        let total = subtotal.checked_add(&tax)?.checked_add(&delivery_fee)?;

        Ok(PriceBreakdown {
            subtotal,
            tax,
            delivery_fee,
            total,
        })
    }
}

/// Complete pricing breakdown for a cart or order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub delivery_fee: Money,
    /// `subtotal + tax + delivery_fee`.
    pub total: Money,
}

impl PriceBreakdown {
    /// All-zero breakdown.
    pub fn zero(currency: Currency) -> Self {
        Self {
            subtotal: Money::zero(currency),
            tax: Money::zero(currency),
            delivery_fee: Money::zero(currency),
            total: Money::zero(currency),
        }
    }

    /// Each figure rounded to the currency's minor unit.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: self.subtotal.rounded(),
            tax: self.tax.rounded(),
            delivery_fee: self.delivery_fee.rounded(),
            total: self.total.rounded(),
        }
    }

    /// Check if nothing is charged.
    pub fn is_zero(&self) -> bool {
        self.total.is_zero()
    }
}
