//! Ordering session: the context a front end talks to.
//!
//! A session owns every stateful component over one shared [`Cache`]. There is
//! no global state; construct one session per store and pass it around.

use chrono::{DateTime, Utc};
use tableserve_cache::Cache;

use crate::cart::{CartStore, ItemDescriptor, PriceBreakdown, QuantityChange};
use crate::checkout::{
    CheckoutController, CheckoutSnapshot, CheckoutState, ExtrasCatalog, KitchenRequest,
    KitchenRequestDraft, KitchenRequestKind, KitchenRequestLog, Order, OrderHistory,
    OrderIdSource, OrderStatus, RandomOrderIds,
};
use crate::config::TableServeConfig;
use crate::error::OrderingError;
use crate::ids::{MenuItemId, OrderId};
use crate::menu::{Menu, MenuItem};
use crate::nutrition::NutritionSummary;
use crate::recommend::{default_candidates, recommend, RecommendationCandidate};
use crate::table::{TableFloor, TableSelection};

/// Everything one guest's ordering flow needs.
pub struct OrderingSession {
    config: TableServeConfig,
    menu: Menu,
    candidates: Vec<RecommendationCandidate>,
    extras: ExtrasCatalog,
    tables: TableSelection,
    cart: CartStore,
    checkout: CheckoutController,
    history: OrderHistory,
    requests: KitchenRequestLog,
    ids: Box<dyn OrderIdSource>,
}

impl std::fmt::Debug for OrderingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderingSession")
            .field("state", &self.checkout.state())
            .field("cart_items", &self.cart.cart().item_count())
            .field("orders", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl OrderingSession {
    /// Open a session over `cache` with random order ids.
    pub fn open(config: TableServeConfig, cache: Cache) -> Result<Self, OrderingError> {
        Self::with_id_source(config, cache, Box::new(RandomOrderIds))
    }

    /// Open a session with a custom id source.
    pub fn with_id_source(
        config: TableServeConfig,
        cache: Cache,
        ids: Box<dyn OrderIdSource>,
    ) -> Result<Self, OrderingError> {
        config.validate()?;
        let currency = config.pricing.currency;
        let storage = &config.storage;

        let session = Self {
            menu: Menu::new(),
            candidates: default_candidates(currency),
            extras: ExtrasCatalog::standard(currency),
            tables: TableSelection::new(TableFloor::from_config(&config.tables)?),
            cart: CartStore::open_with_currency(cache.clone(), storage.cart_key.clone(), currency),
            checkout: CheckoutController::new(config.pricing_policy()),
            history: OrderHistory::open(cache.clone(), storage.history_key.clone()),
            requests: KitchenRequestLog::new(cache, storage.requests_key_prefix.clone()),
            ids,
            config,
        };
        tracing::debug!(?session, "ordering session opened");
        Ok(session)
    }

    pub fn config(&self) -> &TableServeConfig {
        &self.config
    }

    // -- menu --

    /// Install a freshly loaded menu.
    pub fn set_menu(&mut self, menu: Menu) {
        self.menu = menu;
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Replace the recommendation pool.
    pub fn set_candidates(&mut self, candidates: Vec<RecommendationCandidate>) {
        self.candidates = candidates;
    }

    // -- tables --

    pub fn tables(&self) -> &TableSelection {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut TableSelection {
        &mut self.tables
    }

    // -- cart --

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn add_item(&mut self, item: &MenuItem) -> Result<QuantityChange, OrderingError> {
        self.checkout.ensure_cart_editable()?;
        let change = self.cart.add_item(item);
        self.checkout.observe_cart(self.cart.cart());
        change
    }

    /// Add one of a menu item by id.
    pub fn add_menu_item(&mut self, id: &MenuItemId) -> Result<QuantityChange, OrderingError> {
        let item = self
            .menu
            .find(id)
            .cloned()
            .ok_or_else(|| OrderingError::Validation(format!("item {id} is not on the menu")))?;
        self.add_item(&item)
    }

    pub fn update_quantity(
        &mut self,
        id: &MenuItemId,
        quantity: i64,
        replacement: Option<ItemDescriptor>,
    ) -> Result<QuantityChange, OrderingError> {
        self.checkout.ensure_cart_editable()?;
        let change = self.cart.update_quantity(id, quantity, replacement);
        self.checkout.observe_cart(self.cart.cart());
        change
    }

    /// Add a suggestion to the cart.
    pub fn add_recommendation(
        &mut self,
        candidate: &RecommendationCandidate,
    ) -> Result<QuantityChange, OrderingError> {
        let quantity = i64::from(self.cart.cart().quantity_of(&candidate.id)) + 1;
        self.update_quantity(&candidate.id, quantity, Some(candidate.descriptor()))
    }

    pub fn remove_item(&mut self, id: &MenuItemId) -> Result<bool, OrderingError> {
        self.checkout.ensure_cart_editable()?;
        self.cart.remove_item(id)
    }

    pub fn clear_cart(&mut self) -> Result<(), OrderingError> {
        self.checkout.ensure_cart_editable()?;
        self.cart.clear()
    }

    /// See [`CartStore::take_open_signal`].
    pub fn take_open_signal(&mut self) -> bool {
        self.cart.take_open_signal()
    }

    /// Suggestions for the current cart.
    pub fn recommendations(&self) -> Vec<RecommendationCandidate> {
        recommend(
            self.cart.items(),
            &self.candidates,
            self.config.recommendations.limit,
        )
    }

    /// Live prices for the current cart.
    pub fn breakdown(&self) -> Result<PriceBreakdown, OrderingError> {
        self.checkout.policy().breakdown(self.cart.items())
    }

    // -- checkout --

    pub fn checkout_state(&self) -> CheckoutState {
        self.checkout.state()
    }

    pub fn begin_checkout(&mut self) -> Result<&CheckoutSnapshot, OrderingError> {
        self.checkout.begin_checkout(self.cart.cart())
    }

    pub fn back(&mut self) -> Result<(), OrderingError> {
        self.checkout.back()
    }

    /// Confirm the order for the selected table(s).
    pub fn confirm(&mut self) -> Result<Order, OrderingError> {
        let table = self.tables.assignment();
        self.checkout.confirm(
            &mut self.cart,
            &mut self.history,
            self.ids.as_mut(),
            table,
        )
    }

    pub fn last_order_id(&self) -> Option<&OrderId> {
        self.checkout.last_order_id()
    }

    // -- order details --

    pub fn history(&self) -> &OrderHistory {
        &self.history
    }

    pub fn order_details(&self, id: &OrderId) -> Result<&Order, OrderingError> {
        self.history.find_by_id(id)
    }

    /// Estimated progress of a recorded order at `now`.
    pub fn order_status(
        &self,
        id: &OrderId,
        now: DateTime<Utc>,
    ) -> Result<OrderStatus, OrderingError> {
        Ok(self.history.find_by_id(id)?.status_at(now))
    }

    /// Nutrition estimate for a recorded order.
    pub fn nutrition_for(&self, id: &OrderId) -> Result<NutritionSummary, OrderingError> {
        let order = self.history.find_by_id(id)?;
        Ok(NutritionSummary::estimate(&order.items, |item| {
            self.menu.find(item).map(|m| m.category)
        }))
    }

    pub fn extras(&self) -> &ExtrasCatalog {
        &self.extras
    }

    /// Start a follow-up request for an order.
    pub fn new_request(&self, order_id: OrderId, kind: KitchenRequestKind) -> KitchenRequestDraft {
        KitchenRequestDraft::new(order_id, kind, self.config.pricing.currency)
    }

    pub fn submit_request(
        &mut self,
        draft: KitchenRequestDraft,
    ) -> Result<KitchenRequest, OrderingError> {
        self.requests.submit(&self.history, draft)
    }

    pub fn requests_for(&self, id: &OrderId) -> Result<Vec<KitchenRequest>, OrderingError> {
        self.requests.for_order(id)
    }
}
