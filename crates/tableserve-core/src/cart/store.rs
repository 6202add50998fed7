//! Write-through cart persistence.

use tableserve_cache::Cache;

use crate::cart::cart::validate_price;
use crate::cart::{Cart, CartLineItem, ItemDescriptor, MAX_QUANTITY_PER_ITEM};
use crate::error::OrderingError;
use crate::ids::MenuItemId;
use crate::menu::MenuItem;
use crate::money::Currency;

/// Schema version of the stored line array.
pub const CART_SCHEMA_VERSION: u32 = 1;

/// What a cart mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// A new line was inserted with this quantity.
    Inserted { quantity: u32 },
    /// An existing line's quantity changed.
    Updated { previous: u32, quantity: u32 },
    /// The line was removed.
    Removed,
    /// Nothing changed.
    Unchanged,
}

/// Owner of the active cart.
///
/// Every mutation builds the next cart, writes it to the cache and only then
/// replaces the in-memory cart, so a failed write leaves both at the previous
/// state.
#[derive(Debug)]
pub struct CartStore {
    cache: Cache,
    key: String,
    cart: Cart,
    open_requested: bool,
}

impl CartStore {
    /// Load the cart stored under `key` in USD.
    pub fn open(cache: Cache, key: impl Into<String>) -> Self {
        Self::open_with_currency(cache, key, Currency::USD)
    }

    /// Load the cart stored under `key`.
    ///
    /// A missing value gives an empty cart. So does an unreadable one, or one
    /// in another currency, after a warning; opening never fails.
    pub fn open_with_currency(cache: Cache, key: impl Into<String>, currency: Currency) -> Self {
        let key = key.into();
        let cart = match cache.get_record::<Vec<CartLineItem>>(&key, CART_SCHEMA_VERSION) {
            Ok(Some(lines)) if lines.iter().all(|l| l.currency == currency) => {
                let cart = Cart::from_lines(lines, currency);
                tracing::debug!(key = %key, lines = cart.unique_item_count(), "restored cart");
                cart
            }
            Ok(Some(_)) => {
                tracing::warn!(key = %key, currency = %currency, "stored cart uses another currency, starting empty");
                Cart::new(currency)
            }
            Ok(None) => Cart::new(currency),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "stored cart is unreadable, starting empty");
                Cart::new(currency)
            }
        };

        Self {
            cache,
            key,
            cart,
            open_requested: false,
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    /// Storage key of this cart.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one of a menu item.
    ///
    /// An item already in the cart gains one; otherwise a line is inserted with
    /// quantity 1 and the item's current name, thumbnail and price.
    pub fn add_item(&mut self, item: &MenuItem) -> Result<QuantityChange, OrderingError> {
        self.add_descriptor(item.descriptor())
    }

    /// Add one of an arbitrary descriptor (e.g. a recommendation).
    pub fn add_descriptor(
        &mut self,
        descriptor: ItemDescriptor,
    ) -> Result<QuantityChange, OrderingError> {
        let mut next = self.cart.clone();
        let change = match next.get_mut(&descriptor.id) {
            Some(line) => {
                let quantity = i64::from(line.quantity) + 1;
                check_limit(quantity)?;
                let previous = line.quantity;
                line.quantity += 1;
                QuantityChange::Updated {
                    previous,
                    quantity: line.quantity,
                }
            }
            None => {
                validate_price(&descriptor.price, next.currency())?;
                next.push(CartLineItem::new(descriptor, 1));
                QuantityChange::Inserted { quantity: 1 }
            }
        };

        self.commit(next)?;
        self.open_requested = true;
        tracing::debug!(change = ?change, items = self.cart.item_count(), "added item to cart");
        Ok(change)
    }

    /// Set an item's quantity.
    ///
    /// `quantity <= 0` removes the line. An absent id is inserted from
    /// `replacement` when one is given and ignored otherwise.
    pub fn update_quantity(
        &mut self,
        id: &MenuItemId,
        quantity: i64,
        replacement: Option<ItemDescriptor>,
    ) -> Result<QuantityChange, OrderingError> {
        if quantity <= 0 {
            return Ok(if self.remove_item(id)? {
                QuantityChange::Removed
            } else {
                QuantityChange::Unchanged
            });
        }
        check_limit(quantity)?;
        let quantity = quantity as u32;

        let mut next = self.cart.clone();
        let change = match (next.get_mut(id), replacement) {
            (Some(line), _) if line.quantity == quantity => return Ok(QuantityChange::Unchanged),
            (Some(line), _) => {
                let previous = line.quantity;
                line.quantity = quantity;
                QuantityChange::Updated { previous, quantity }
            }
            (None, Some(descriptor)) => {
                if &descriptor.id != id {
                    return Err(OrderingError::Validation(format!(
                        "replacement {} does not match item {}",
                        descriptor.id, id
                    )));
                }
                validate_price(&descriptor.price, next.currency())?;
                next.push(CartLineItem::new(descriptor, quantity));
                QuantityChange::Inserted { quantity }
            }
            (None, None) => {
                tracing::debug!(item = %id, "quantity update for item not in cart ignored");
                return Ok(QuantityChange::Unchanged);
            }
        };

        self.commit(next)?;
        tracing::debug!(item = %id, change = ?change, "updated cart quantity");
        Ok(change)
    }

    /// Remove an item. Returns whether it was present.
    pub fn remove_item(&mut self, id: &MenuItemId) -> Result<bool, OrderingError> {
        if !self.cart.contains(id) {
            return Ok(false);
        }
        let mut next = self.cart.clone();
        next.remove(id);
        self.commit(next)?;
        tracing::debug!(item = %id, "removed item from cart");
        Ok(true)
    }

    /// Empty the cart and persist the empty state.
    pub fn clear(&mut self) -> Result<(), OrderingError> {
        let mut next = self.cart.clone();
        next.clear();
        self.commit(next)?;
        tracing::debug!(key = %self.key, "cleared cart");
        Ok(())
    }

    /// Fold lines into the cart, accumulating quantities for ids already
    /// present (capped at `MAX_QUANTITY_PER_ITEM`) and appending the rest.
    pub fn merge(&mut self, lines: Vec<CartLineItem>) -> Result<(), OrderingError> {
        let mut next = self.cart.clone();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            if !next.contains(&line.id) {
                validate_price(&line.unit_price(), next.currency())?;
            }
            next.accumulate(line);
        }
        self.commit(next)?;
        tracing::debug!(items = self.cart.item_count(), "merged lines into cart");
        Ok(())
    }

    /// Read and reset the "cart panel should open" signal raised by `add_item`.
    pub fn take_open_signal(&mut self) -> bool {
        std::mem::take(&mut self.open_requested)
    }

    fn commit(&mut self, next: Cart) -> Result<(), OrderingError> {
        if let Err(e) = self
            .cache
            .set_record(&self.key, CART_SCHEMA_VERSION, &next.items())
        {
            tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
            return Err(e.into());
        }
        self.cart = next;
        Ok(())
    }
}

fn check_limit(quantity: i64) -> Result<(), OrderingError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(OrderingError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}
