//! Cart module.
//!
//! Contains the cart and line item types, the pricing policy, and the
//! write-through [`CartStore`] that owns the active cart.

mod cart;
mod pricing;
mod store;

pub use cart::{Cart, CartLineItem, ItemDescriptor, MAX_QUANTITY_PER_ITEM};
pub use pricing::{PriceBreakdown, PricingPolicy};
pub use store::{CartStore, QuantityChange, CART_SCHEMA_VERSION};
