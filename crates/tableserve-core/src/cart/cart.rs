//! Cart and line item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::OrderingError;
use crate::ids::MenuItemId;
use crate::menu::MenuCategory;
use crate::money::{Currency, Money};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// The fields of a menu item (or recommendation) a cart line copies at insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub id: MenuItemId,
    pub name: String,
    pub thumbnail_url: String,
    pub price: Money,
    /// Menu category, when the item came from the menu.
    pub category: Option<MenuCategory>,
}

/// A line in the cart.
///
/// Name, thumbnail, price and category are copied when the line is created
/// and never re-read from the menu. Also reads carts stored with the recipe API's field
/// names (`idMeal`, `strMeal`, `strMealThumb`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(alias = "idMeal")]
    pub id: MenuItemId,
    #[serde(alias = "strMeal")]
    pub name: String,
    #[serde(alias = "strMealThumb", default)]
    pub thumbnail_url: String,
    /// Unit price at insertion time.
    pub price: Decimal,
    #[serde(default)]
    pub currency: Currency,
    pub quantity: u32,
    #[serde(
        default,
        deserialize_with = "known_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<MenuCategory>,
}

// Stored lines may name categories this build does not know.
fn known_category<'de, D>(deserializer: D) -> Result<Option<MenuCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

impl CartLineItem {
    /// Create a line from a descriptor.
    pub fn new(descriptor: ItemDescriptor, quantity: u32) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            thumbnail_url: descriptor.thumbnail_url,
            price: descriptor.price.amount,
            currency: descriptor.price.currency,
            quantity,
            category: descriptor.category,
        }
    }

    /// Unit price as money.
    pub fn unit_price(&self) -> Money {
        Money::new(self.price, self.currency)
    }

    /// `unit_price × quantity`, exact.
    pub fn line_total(&self) -> Result<Money, OrderingError> {
        self.unit_price()
            .try_multiply(self.quantity)
            .ok_or(OrderingError::Overflow)
    }
}

/// The active cart: one line per distinct item, in insertion order.
///
/// Only [`CartStore`](crate::cart::CartStore) mutates a cart; everyone else
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
    currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Build a cart from stored lines, dropping zero-quantity lines and
    /// folding duplicate ids together.
    pub(crate) fn from_lines(lines: Vec<CartLineItem>, currency: Currency) -> Self {
        let mut cart = Self::new(currency);
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            cart.accumulate(line);
        }
        cart
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of distinct items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by item id.
    pub fn get(&self, id: &MenuItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Whether the item is in the cart.
    pub fn contains(&self, id: &MenuItemId) -> bool {
        self.get(id).is_some()
    }

    /// Quantity of an item, 0 when absent.
    pub fn quantity_of(&self, id: &MenuItemId) -> u32 {
        self.get(id).map_or(0, |i| i.quantity)
    }

    pub(crate) fn get_mut(&mut self, id: &MenuItemId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|i| &i.id == id)
    }

    pub(crate) fn push(&mut self, line: CartLineItem) {
        self.items.push(line);
    }

    pub(crate) fn remove(&mut self, id: &MenuItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() < len_before
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Add a line's quantity to an existing line (capped at
    /// `MAX_QUANTITY_PER_ITEM`) or append it.
    pub(crate) fn accumulate(&mut self, line: CartLineItem) {
        let cap = MAX_QUANTITY_PER_ITEM as u32;
        if let Some(existing) = self.get_mut(&line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity).min(cap);
        } else {
            let quantity = line.quantity.min(cap);
            self.items.push(CartLineItem { quantity, ..line });
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::USD)
    }
}

/// Reject prices that are not strictly positive or not in the cart's currency.
pub(crate) fn validate_price(price: &Money, currency: Currency) -> Result<(), OrderingError> {
    if price.currency != currency {
        return Err(OrderingError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: price.currency.code().to_string(),
        });
    }
    if !price.is_positive() {
        return Err(OrderingError::InvalidPrice(price.amount.to_string()));
    }
    Ok(())
}
