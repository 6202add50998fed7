//! Checkout state machine.
//!
//! ```text
//! Reviewing --begin_checkout--> Summarizing --confirm--> Confirming --> Confirmed
//!     ^                             |                                      |
//!     +------------back-------------+                                      |
//!     +----------------observe_cart (cart non-empty again)----------------+
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLineItem, CartStore, PriceBreakdown, PricingPolicy};
use crate::checkout::{Order, OrderHistory};
use crate::error::OrderingError;
use crate::ids::OrderId;
use crate::table::TableAssignment;

/// Id draws before confirmation gives up.
pub const MAX_ORDER_ID_ATTEMPTS: u32 = 8;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Browsing and editing the cart.
    #[default]
    Reviewing,
    /// Looking at the frozen order summary.
    Summarizing,
    /// Order being recorded and the cart cleared.
    Confirming,
    /// Order recorded.
    Confirmed,
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Reviewing => "reviewing",
            CheckoutState::Summarizing => "summarizing",
            CheckoutState::Confirming => "confirming",
            CheckoutState::Confirmed => "confirmed",
        }
    }
}

/// Cart contents and prices frozen when checkout begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSnapshot {
    pub items: Vec<CartLineItem>,
    pub breakdown: PriceBreakdown,
    pub taken_at: DateTime<Utc>,
}

/// Source of fresh order ids.
pub trait OrderIdSource {
    fn next_id(&mut self) -> OrderId;
}

/// Random UUID v4 order ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderIds;

impl OrderIdSource for RandomOrderIds {
    fn next_id(&mut self) -> OrderId {
        OrderId::generate()
    }
}

/// Drives an order from cart review to confirmation.
#[derive(Debug, Clone)]
pub struct CheckoutController {
    policy: PricingPolicy,
    state: CheckoutState,
    snapshot: Option<CheckoutSnapshot>,
    /// Recorded order whose cart clear has not yet succeeded.
    pending: Option<Order>,
    last_order: Option<OrderId>,
}

impl CheckoutController {
    pub fn new(policy: PricingPolicy) -> Self {
        Self {
            policy,
            state: CheckoutState::Reviewing,
            snapshot: None,
            pending: None,
            last_order: None,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// The frozen summary while summarizing or confirming.
    pub fn snapshot(&self) -> Option<&CheckoutSnapshot> {
        self.snapshot.as_ref()
    }

    /// Id of the most recently confirmed order.
    pub fn last_order_id(&self) -> Option<&OrderId> {
        self.last_order.as_ref()
    }

    /// The recorded order while stuck in `Confirming`.
    pub fn pending_order(&self) -> Option<&Order> {
        self.pending.as_ref()
    }

    /// `Reviewing -> Summarizing`, freezing the cart's items and prices.
    pub fn begin_checkout(&mut self, cart: &Cart) -> Result<&CheckoutSnapshot, OrderingError> {
        self.expect_state(CheckoutState::Reviewing, CheckoutState::Summarizing)?;
        if cart.is_empty() {
            return Err(OrderingError::EmptyCart);
        }

        let breakdown = self.policy.breakdown(cart.items())?;
        self.transition(CheckoutState::Summarizing);
        Ok(self.snapshot.insert(CheckoutSnapshot {
            items: cart.items().to_vec(),
            breakdown,
            taken_at: Utc::now(),
        }))
    }

    /// `Summarizing -> Reviewing`, discarding the snapshot.
    pub fn back(&mut self) -> Result<(), OrderingError> {
        self.expect_state(CheckoutState::Summarizing, CheckoutState::Reviewing)?;
        self.snapshot = None;
        self.transition(CheckoutState::Reviewing);
        Ok(())
    }

    /// Record the frozen snapshot as an order, then clear the live cart.
    ///
    /// From `Summarizing`, a fresh id is drawn (redrawn on collision) and the
    /// order appended. If the append fails the controller returns to
    /// `Summarizing` with the cart untouched. If the cart clear fails the
    /// controller stays in `Confirming`; calling `confirm` again only retries
    /// the clear.
    pub fn confirm(
        &mut self,
        cart: &mut CartStore,
        history: &mut OrderHistory,
        ids: &mut dyn OrderIdSource,
        table: Option<TableAssignment>,
    ) -> Result<Order, OrderingError> {
        match self.state {
            CheckoutState::Summarizing => {
                let Some(snapshot) = self.snapshot.clone() else {
                    return Err(self.invalid(CheckoutState::Confirming));
                };
                self.transition(CheckoutState::Confirming);

                match record_order(&snapshot, history, ids, table) {
                    Ok(order) => self.pending = Some(order),
                    Err(e) => {
                        tracing::warn!(error = %e, "order could not be recorded");
                        self.transition(CheckoutState::Summarizing);
                        return Err(e);
                    }
                }
                self.finish(cart)
            }
            CheckoutState::Confirming => self.finish(cart),
            _ => Err(self.invalid(CheckoutState::Confirming)),
        }
    }

    /// Cart edits are refused while an order is recorded but its cart clear
    /// is still pending; the retried clear must only remove that order's lines.
    pub fn ensure_cart_editable(&self) -> Result<(), OrderingError> {
        if self.state == CheckoutState::Confirming {
            return Err(self.invalid(CheckoutState::Reviewing));
        }
        Ok(())
    }

    /// Follow cart changes: a non-empty cart after confirmation starts a new review.
    pub fn observe_cart(&mut self, cart: &Cart) {
        if self.state == CheckoutState::Confirmed && !cart.is_empty() {
            self.transition(CheckoutState::Reviewing);
        }
    }

    fn finish(&mut self, cart: &mut CartStore) -> Result<Order, OrderingError> {
        let Some(order) = self.pending.take() else {
            return Err(self.invalid(CheckoutState::Confirmed));
        };
        if let Err(e) = cart.clear() {
            tracing::warn!(order = %order.id, error = %e, "order recorded but cart not cleared");
            self.pending = Some(order);
            return Err(e);
        }

        self.snapshot = None;
        self.last_order = Some(order.id.clone());
        self.transition(CheckoutState::Confirmed);
        tracing::info!(order = %order.id, total = %order.totals.total.rounded(), "order confirmed");
        Ok(order)
    }

    fn expect_state(&self, from: CheckoutState, to: CheckoutState) -> Result<(), OrderingError> {
        if self.state != from {
            return Err(self.invalid(to));
        }
        Ok(())
    }

    fn invalid(&self, to: CheckoutState) -> OrderingError {
        OrderingError::InvalidCheckoutTransition {
            from: self.state.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }

    fn transition(&mut self, to: CheckoutState) {
        tracing::info!(from = self.state.as_str(), to = to.as_str(), "checkout transition");
        self.state = to;
    }
}

impl Default for CheckoutController {
    fn default() -> Self {
        Self::new(PricingPolicy::default())
    }
}

fn record_order(
    snapshot: &CheckoutSnapshot,
    history: &mut OrderHistory,
    ids: &mut dyn OrderIdSource,
    table: Option<TableAssignment>,
) -> Result<Order, OrderingError> {
    for attempt in 1..=MAX_ORDER_ID_ATTEMPTS {
        let order = Order::from_snapshot(ids.next_id(), snapshot, table, Utc::now());
        match history.append(order.clone()) {
            Ok(()) => return Ok(order),
            Err(OrderingError::DuplicateOrderId(id)) => {
                tracing::warn!(order = %id, attempt, "order id already used, drawing another");
            }
            Err(e) => return Err(e),
        }
    }
    Err(OrderingError::IdSpaceExhausted(MAX_ORDER_ID_ATTEMPTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ItemDescriptor;
    use crate::ids::MenuItemId;
    use crate::money::{Currency, Money};
    use std::collections::VecDeque;
    use std::rc::Rc;
    use tableserve_cache::{Cache, MemoryStore};

    struct ScriptedIds(VecDeque<&'static str>);

    impl OrderIdSource for ScriptedIds {
        fn next_id(&mut self) -> OrderId {
            OrderId::new(self.0.pop_front().unwrap_or("exhausted"))
        }
    }

    struct Fixture {
        store: Rc<MemoryStore>,
        cart: CartStore,
        history: OrderHistory,
        controller: CheckoutController,
    }

    fn fixture() -> Fixture {
        let store = Rc::new(MemoryStore::new());
        let cache = Cache::from_shared(store.clone());
        Fixture {
            cart: CartStore::open(cache.clone(), "cartItems"),
            history: OrderHistory::open(cache, "orderHistory"),
            controller: CheckoutController::default(),
            store,
        }
    }

    fn add(cart: &mut CartStore, id: &str, cents: i64) {
        cart.add_descriptor(ItemDescriptor {
            id: MenuItemId::new(id),
            name: id.to_string(),
            thumbnail_url: String::new(),
            price: Money::from_cents(cents, Currency::USD),
            category: None,
        })
        .unwrap();
    }

    #[test]
    fn test_begin_checkout_requires_items() {
        let mut f = fixture();
        assert!(matches!(
            f.controller.begin_checkout(f.cart.cart()),
            Err(OrderingError::EmptyCart)
        ));
        assert_eq!(f.controller.state(), CheckoutState::Reviewing);
    }

    #[test]
    fn test_begin_and_back() {
        let mut f = fixture();
        add(&mut f.cart, "1", 1299);

        let snapshot = f.controller.begin_checkout(f.cart.cart()).unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(f.controller.state(), CheckoutState::Summarizing);

        f.controller.back().unwrap();
        assert_eq!(f.controller.state(), CheckoutState::Reviewing);
        assert!(f.controller.snapshot().is_none());
    }

    #[test]
    fn test_illegal_transitions() {
        let mut f = fixture();
        assert!(matches!(
            f.controller.back(),
            Err(OrderingError::InvalidCheckoutTransition { .. })
        ));
        assert!(matches!(
            f.controller
                .confirm(&mut f.cart, &mut f.history, &mut RandomOrderIds, None),
            Err(OrderingError::InvalidCheckoutTransition { .. })
        ));

        add(&mut f.cart, "1", 1299);
        f.controller.begin_checkout(f.cart.cart()).unwrap();
        let err = f.controller.begin_checkout(f.cart.cart()).unwrap_err();
        match err {
            OrderingError::InvalidCheckoutTransition { from, to } => {
                assert_eq!(from, "summarizing");
                assert_eq!(to, "summarizing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_confirm_records_order_and_clears_cart() {
        let mut f = fixture();
        add(&mut f.cart, "1", 1299);
        add(&mut f.cart, "2", 899);
        f.controller.begin_checkout(f.cart.cart()).unwrap();

        let table = TableAssignment {
            primary: 5,
            merged_with: None,
        };
        let order = f
            .controller
            .confirm(&mut f.cart, &mut f.history, &mut RandomOrderIds, Some(table))
            .unwrap();

        assert_eq!(f.controller.state(), CheckoutState::Confirmed);
        assert_eq!(f.controller.last_order_id(), Some(&order.id));
        assert!(f.cart.cart().is_empty());
        assert_eq!(f.history.find_by_id(&order.id).unwrap(), &order);
        assert_eq!(order.table, Some(table));
        assert_eq!(order.totals.rounded().total, Money::from_cents(2673, Currency::USD));
    }

    #[test]
    fn test_snapshot_isolated_from_later_cart_edits() {
        let mut f = fixture();
        add(&mut f.cart, "1", 1299);
        f.controller.begin_checkout(f.cart.cart()).unwrap();

        add(&mut f.cart, "1", 1299);
        add(&mut f.cart, "2", 899);

        let order = f
            .controller
            .confirm(&mut f.cart, &mut f.history, &mut RandomOrderIds, None)
            .unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 1);
        assert_eq!(order.totals.subtotal, Money::from_cents(1299, Currency::USD));
    }

    #[test]
    fn test_duplicate_id_is_redrawn() {
        let mut f = fixture();
        add(&mut f.cart, "1", 1299);
        f.controller.begin_checkout(f.cart.cart()).unwrap();
        f.controller
            .confirm(
                &mut f.cart,
                &mut f.history,
                &mut ScriptedIds(VecDeque::from(["taken"])),
                None,
            )
            .unwrap();

        add(&mut f.cart, "2", 899);
        f.controller.observe_cart(f.cart.cart());
        f.controller.begin_checkout(f.cart.cart()).unwrap();
        let order = f
            .controller
            .confirm(
                &mut f.cart,
                &mut f.history,
                &mut ScriptedIds(VecDeque::from(["taken", "taken", "fresh"])),
                None,
            )
            .unwrap();

        assert_eq!(order.id.as_str(), "fresh");
        assert_eq!(f.history.len(), 2);
    }

    #[test]
    fn test_id_space_exhausted() {
        let mut f = fixture();
        add(&mut f.cart, "1", 1299);
        f.controller.begin_checkout(f.cart.cart()).unwrap();
        f.controller
            .confirm(&mut f.cart, &mut f.history, &mut ScriptedIds(VecDeque::from(["same"])), None)
            .unwrap();

        add(&mut f.cart, "1", 1299);
        f.controller.observe_cart(f.cart.cart());
        f.controller.begin_checkout(f.cart.cart()).unwrap();
        let err = f
            .controller
            .confirm(
                &mut f.cart,
                &mut f.history,
                &mut ScriptedIds(VecDeque::from(["same"; 8])),
                None,
            )
            .unwrap_err();

        assert!(matches!(err, OrderingError::IdSpaceExhausted(8)));
        assert_eq!(f.controller.state(), CheckoutState::Summarizing);
        assert!(!f.cart.cart().is_empty());
    }

    #[test]
    fn test_failed_append_returns_to_summarizing() {
        let mut f = fixture();
        add(&mut f.cart, "1", 1299);
        f.controller.begin_checkout(f.cart.cart()).unwrap();

        f.store.set_fail_writes(true);
        let err = f
            .controller
            .confirm(&mut f.cart, &mut f.history, &mut RandomOrderIds, None)
            .unwrap_err();

        assert!(matches!(err, OrderingError::Persistence(_)));
        assert_eq!(f.controller.state(), CheckoutState::Summarizing);
        assert!(f.history.is_empty());
        assert_eq!(f.cart.cart().unique_item_count(), 1);

        f.store.set_fail_writes(false);
        f.controller
            .confirm(&mut f.cart, &mut f.history, &mut RandomOrderIds, None)
            .unwrap();
        assert_eq!(f.history.len(), 1);
    }

    #[test]
    fn test_failed_clear_retries_without_second_order() {
        // Cart and history on separate stores so only the cart write fails.
        let cart_store = Rc::new(MemoryStore::new());
        let mut cart = CartStore::open(Cache::from_shared(cart_store.clone()), "cartItems");
        let mut history = OrderHistory::open(Cache::in_memory(), "orderHistory");
        let mut controller = CheckoutController::default();

        add(&mut cart, "1", 1299);
        controller.begin_checkout(cart.cart()).unwrap();

        cart_store.set_fail_writes(true);
        assert!(controller
            .confirm(&mut cart, &mut history, &mut RandomOrderIds, None)
            .is_err());
        assert_eq!(controller.state(), CheckoutState::Confirming);
        assert_eq!(history.len(), 1);
        assert!(controller.pending_order().is_some());

        cart_store.set_fail_writes(false);
        let order = controller
            .confirm(&mut cart, &mut history, &mut RandomOrderIds, None)
            .unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().id, order.id);
        assert_eq!(controller.state(), CheckoutState::Confirmed);
        assert!(cart.cart().is_empty());
    }

    #[test]
    fn test_cart_locked_only_while_confirming() {
        let cart_store = Rc::new(MemoryStore::new());
        let mut cart = CartStore::open(Cache::from_shared(cart_store.clone()), "cartItems");
        let mut history = OrderHistory::open(Cache::in_memory(), "orderHistory");
        let mut controller = CheckoutController::default();
        assert!(controller.ensure_cart_editable().is_ok());

        add(&mut cart, "1", 1299);
        controller.begin_checkout(cart.cart()).unwrap();
        assert!(controller.ensure_cart_editable().is_ok());

        cart_store.set_fail_writes(true);
        let _ = controller.confirm(&mut cart, &mut history, &mut RandomOrderIds, None);
        assert!(matches!(
            controller.ensure_cart_editable(),
            Err(OrderingError::InvalidCheckoutTransition { .. })
        ));

        cart_store.set_fail_writes(false);
        controller
            .confirm(&mut cart, &mut history, &mut RandomOrderIds, None)
            .unwrap();
        assert!(controller.ensure_cart_editable().is_ok());
    }

    #[test]
    fn test_observe_cart_reopens_review() {
        let mut f = fixture();
        add(&mut f.cart, "1", 1299);
        f.controller.begin_checkout(f.cart.cart()).unwrap();
        f.controller
            .confirm(&mut f.cart, &mut f.history, &mut RandomOrderIds, None)
            .unwrap();

        f.controller.observe_cart(f.cart.cart());
        assert_eq!(f.controller.state(), CheckoutState::Confirmed);

        add(&mut f.cart, "2", 899);
        f.controller.observe_cart(f.cart.cart());
        assert_eq!(f.controller.state(), CheckoutState::Reviewing);
    }
}
