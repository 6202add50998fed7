//! Menu module.
//!
//! Contains the menu types and the one-time enrichment of raw recipe records
//! into priced menu items.

mod enrich;
mod item;

pub use enrich::MenuEnricher;
pub(crate) use enrich::price_unit_range;
pub use item::{MealSummary, Menu, MenuCategory, MenuItem, MenuSection};
