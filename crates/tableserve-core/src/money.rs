//! Money type for representing monetary values.
//!
//! Amounts are fixed-point decimals so that `12.99 + 8.99` is exactly `21.98`.
//! Rounding happens only when a value is prepared for display.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OrderingError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// The smallest representable amount: 0.01, or 1 for JPY.
    pub fn minor_unit(&self) -> Decimal {
        Decimal::new(1, self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Exact amount in major units (e.g., dollars).
    pub amount: Decimal,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a Money value from minor units.
    ///
    /// ```
    /// use tableserve_core::money::{Money, Currency};
    /// let price = Money::from_cents(1299, Currency::USD);
    /// assert_eq!(price.display(), "$12.99");
    /// ```
    pub fn from_cents(cents: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(cents, currency.decimal_places()), currency)
    }

    /// Parse a decimal string such as `"12.99"`.
    pub fn parse(amount: &str, currency: Currency) -> Result<Self, OrderingError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| OrderingError::InvalidPrice(amount.to_string()))?;
        Ok(Self::new(amount, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Round to the currency's minor unit, half away from zero.
    pub fn rounded(&self) -> Self {
        Self::new(
            self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            self.currency,
        )
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.rounded().amount)
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: u32) -> Option<Money> {
        Some(Money::new(
            self.amount.checked_mul(Decimal::from(factor))?,
            self.currency,
        ))
    }

    /// Multiply by a rate (e.g., a tax rate of `0.08`), unrounded.
    pub fn try_multiply_rate(&self, rate: Decimal) -> Option<Money> {
        Some(Money::new(self.amount.checked_mul(rate)?, self.currency))
    }

    /// Add, mapping a mismatch or overflow to an [`OrderingError`].
    pub(crate) fn checked_add(&self, other: &Money) -> Result<Money, OrderingError> {
        if self.currency != other.currency {
            return Err(OrderingError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(OrderingError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
