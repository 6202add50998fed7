//! Restaurant table-ordering core for TableServe.
//!
//! This crate holds the ordering state and rules, independent of any UI:
//!
//! - **Menu**: categories, enriched menu items
//! - **Cart**: write-through cart store, pricing policy, recommendations
//! - **Checkout**: review/summary/confirmation state machine, order history,
//!   follow-up kitchen requests
//! - **Tables**: floor plan and table selection
//! - **Session**: one explicitly constructed context wiring it all to a
//!   [`tableserve_cache::Cache`]
//!
//! # Example
//!
//! ```rust
//! use tableserve_cache::Cache;
//! use tableserve_core::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let mut session = OrderingSession::open(TableServeConfig::default(), Cache::in_memory())?;
//!
//! let pie = MenuItem {
//!     id: MenuItemId::new("52874"),
//!     name: "Beef and Mustard Pie".to_string(),
//!     thumbnail_url: String::new(),
//!     price: Money::from_cents(1299, Currency::USD),
//!     category: MenuCategory::Beef,
//!     description: String::new(),
//!     rating: Decimal::new(46, 1),
//!     prep_time_minutes: 17,
//! };
//! session.add_item(&pie)?;
//!
//! session.begin_checkout()?;
//! let order = session.confirm()?;
//! println!("Order #{}: {}", order.short_code(), order.totals.rounded().total);
//! # Ok::<(), tableserve_core::OrderingError>(())
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod nutrition;
pub mod recommend;
pub mod session;
pub mod table;

pub mod cart;
pub mod checkout;
pub mod menu;

pub use config::TableServeConfig;
pub use error::OrderingError;
pub use ids::*;
pub use money::{Currency, Money};
pub use session::OrderingSession;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::TableServeConfig;
    pub use crate::error::OrderingError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::session::OrderingSession;

    // Menu
    pub use crate::menu::{MealSummary, Menu, MenuCategory, MenuEnricher, MenuItem};

    // Cart
    pub use crate::cart::{
        Cart, CartLineItem, CartStore, ItemDescriptor, PriceBreakdown, PricingPolicy,
        QuantityChange, MAX_QUANTITY_PER_ITEM,
    };
    pub use crate::recommend::{recommend, CandidateKind, RecommendationCandidate};

    // Checkout
    pub use crate::checkout::{
        CheckoutController, CheckoutSnapshot, CheckoutState, ExtrasCatalog, KitchenRequest,
        KitchenRequestDraft, KitchenRequestKind, KitchenRequestLog, Order, OrderHistory,
        OrderIdSource, OrderStatus, RandomOrderIds,
    };

    // Tables and insights
    pub use crate::nutrition::NutritionSummary;
    pub use crate::table::{TableAssignment, TableFloor, TableSelection, Zone};
}
