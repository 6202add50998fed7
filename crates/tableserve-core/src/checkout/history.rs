//! Append-only order history.

use tableserve_cache::Cache;

use crate::checkout::Order;
use crate::error::OrderingError;
use crate::ids::OrderId;

/// Schema version of the stored order array.
pub const HISTORY_SCHEMA_VERSION: u32 = 1;

/// Confirmed orders in confirmation order, persisted write-through.
///
/// Orders are only ever appended; there is no update or delete.
#[derive(Debug)]
pub struct OrderHistory {
    cache: Cache,
    key: String,
    orders: Vec<Order>,
}

impl OrderHistory {
    /// Load the history stored under `key`.
    ///
    /// A missing value is an empty history. An unreadable one is also treated
    /// as empty, with a warning.
    pub fn open(cache: Cache, key: impl Into<String>) -> Self {
        let key = key.into();
        let orders = match cache.get_record::<Vec<Order>>(&key, HISTORY_SCHEMA_VERSION) {
            Ok(orders) => orders.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "stored order history is unreadable, starting empty");
                Vec::new()
            }
        };
        Self { cache, key, orders }
    }

    /// Record a new order.
    ///
    /// Fails with [`OrderingError::DuplicateOrderId`] if the id is taken, or
    /// with a persistence error, leaving the history unchanged either way.
    pub fn append(&mut self, order: Order) -> Result<(), OrderingError> {
        if self.contains(&order.id) {
            return Err(OrderingError::DuplicateOrderId(order.id.into_inner()));
        }

        let id = order.id.clone();
        let mut next = self.orders.clone();
        next.push(order);
        if let Err(e) = self.cache.set_record(&self.key, HISTORY_SCHEMA_VERSION, &next) {
            tracing::warn!(key = %self.key, order = %id, error = %e, "failed to persist order history");
            return Err(e.into());
        }
        self.orders = next;
        tracing::debug!(order = %id, total_orders = self.orders.len(), "appended order");
        Ok(())
    }

    /// Look up an order.
    pub fn find_by_id(&self, id: &OrderId) -> Result<&Order, OrderingError> {
        self.orders
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| OrderingError::OrderNotFound(id.to_string()))
    }

    /// All orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.orders.iter().any(|o| &o.id == id)
    }

    /// Most recently confirmed order.
    pub fn latest(&self) -> Option<&Order> {
        self.orders.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::PriceBreakdown;
    use crate::money::Currency;
    use chrono::Utc;
    use std::rc::Rc;
    use tableserve_cache::MemoryStore;

    fn order(id: &str) -> Order {
        Order {
            id: OrderId::new(id),
            items: Vec::new(),
            created_at: Utc::now(),
            totals: PriceBreakdown::zero(Currency::USD),
            table: None,
        }
    }

    #[test]
    fn test_append_and_find() {
        let mut history = OrderHistory::open(Cache::in_memory(), "orderHistory");
        assert!(history.is_empty());

        history.append(order("a")).unwrap();
        history.append(order("b")).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.find_by_id(&OrderId::new("a")).unwrap().id.as_str(), "a");
        assert_eq!(history.latest().unwrap().id.as_str(), "b");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut history = OrderHistory::open(Cache::in_memory(), "orderHistory");
        history.append(order("a")).unwrap();

        let err = history.append(order("a")).unwrap_err();
        assert!(matches!(err, OrderingError::DuplicateOrderId(ref id) if id == "a"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_not_found() {
        let history = OrderHistory::open(Cache::in_memory(), "orderHistory");
        assert!(matches!(
            history.find_by_id(&OrderId::new("missing")),
            Err(OrderingError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_persists_across_reopen() {
        let shared = Rc::new(MemoryStore::new());
        {
            let mut history = OrderHistory::open(Cache::from_shared(shared.clone()), "orderHistory");
            history.append(order("a")).unwrap();
        }
        let history = OrderHistory::open(Cache::from_shared(shared), "orderHistory");
        assert!(history.contains(&OrderId::new("a")));
    }

    #[test]
    fn test_failed_append_leaves_history_unchanged() {
        let shared = Rc::new(MemoryStore::new());
        let mut history = OrderHistory::open(Cache::from_shared(shared.clone()), "orderHistory");
        shared.set_fail_writes(true);

        assert!(matches!(
            history.append(order("a")),
            Err(OrderingError::Persistence(_))
        ));
        assert!(history.is_empty());
    }
}
