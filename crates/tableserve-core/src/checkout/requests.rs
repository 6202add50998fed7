//! Follow-up kitchen requests against a confirmed order.
//!
//! A guest can ask for extras (condiments, sides) or for staff assistance
//! after ordering. Requests are logged per order; the order itself never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tableserve_cache::{cache_key, Cache};

use crate::checkout::OrderHistory;
use crate::error::OrderingError;
use crate::ids::{KitchenRequestId, OrderId};
use crate::money::{Currency, Money};

/// Schema version of a stored request list.
pub const REQUESTS_SCHEMA_VERSION: u32 = 1;

/// Kind of orderable extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtraKind {
    Condiment,
    Side,
}

/// An extra the kitchen can add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    pub name: String,
    pub price: Money,
    pub kind: ExtraKind,
}

/// The extras on offer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrasCatalog {
    currency: Currency,
    extras: Vec<Extra>,
}

impl ExtrasCatalog {
    /// The standard condiment and side sheet.
    pub fn standard(currency: Currency) -> Self {
        let extra = |name: &str, cents: i64, kind| Extra {
            name: name.to_string(),
            price: Money::from_cents(cents, currency),
            kind,
        };

        Self {
            currency,
            extras: vec![
                extra("Mayonnaise", 50, ExtraKind::Condiment),
                extra("Ketchup", 50, ExtraKind::Condiment),
                extra("Mustard", 50, ExtraKind::Condiment),
                extra("Hot Sauce", 75, ExtraKind::Condiment),
                extra("Ranch Dressing", 75, ExtraKind::Condiment),
                extra("BBQ Sauce", 75, ExtraKind::Condiment),
                extra("Soy Sauce", 50, ExtraKind::Condiment),
                extra("Honey Mustard", 75, ExtraKind::Condiment),
                extra("French Fries", 399, ExtraKind::Side),
                extra("Onion Rings", 449, ExtraKind::Side),
                extra("Side Salad", 399, ExtraKind::Side),
                extra("Coleslaw", 299, ExtraKind::Side),
                extra("Mashed Potatoes", 349, ExtraKind::Side),
                extra("Rice Pilaf", 299, ExtraKind::Side),
            ],
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn condiments(&self) -> impl Iterator<Item = &Extra> {
        self.extras.iter().filter(|e| e.kind == ExtraKind::Condiment)
    }

    pub fn sides(&self) -> impl Iterator<Item = &Extra> {
        self.extras.iter().filter(|e| e.kind == ExtraKind::Side)
    }

    /// Look up an extra of the given kind by name (case-insensitive).
    pub fn find(&self, name: &str, kind: ExtraKind) -> Result<&Extra, OrderingError> {
        self.extras
            .iter()
            .find(|e| e.kind == kind && e.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| OrderingError::UnknownExtra(name.to_string()))
    }
}

/// What the guest is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KitchenRequestKind {
    /// Extra condiments or sides.
    Addition,
    /// Ask a member of staff to come over.
    Assistance,
}

/// A side with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideLine {
    pub extra: Extra,
    pub quantity: u32,
}

/// A request being composed.
#[derive(Debug, Clone, PartialEq)]
pub struct KitchenRequestDraft {
    order_id: OrderId,
    kind: KitchenRequestKind,
    note: String,
    condiments: Vec<Extra>,
    sides: Vec<SideLine>,
    currency: Currency,
}

impl KitchenRequestDraft {
    pub fn new(order_id: OrderId, kind: KitchenRequestKind, currency: Currency) -> Self {
        Self {
            order_id,
            kind,
            note: String::new(),
            condiments: Vec::new(),
            sides: Vec::new(),
            currency,
        }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn kind(&self) -> KitchenRequestKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: KitchenRequestKind) {
        self.kind = kind;
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Free-text note ("no onions, nut allergy").
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn condiments(&self) -> &[Extra] {
        &self.condiments
    }

    pub fn sides(&self) -> &[SideLine] {
        &self.sides
    }

    /// Select or deselect a condiment. Returns whether it is now selected.
    pub fn toggle_condiment(
        &mut self,
        catalog: &ExtrasCatalog,
        name: &str,
    ) -> Result<bool, OrderingError> {
        let extra = catalog.find(name, ExtraKind::Condiment)?;
        if let Some(pos) = self.condiments.iter().position(|c| c.name == extra.name) {
            self.condiments.remove(pos);
            Ok(false)
        } else {
            self.condiments.push(extra.clone());
            Ok(true)
        }
    }

    /// Add a side with quantity 1, or remove it if present. Returns whether it
    /// is now selected.
    pub fn toggle_side(&mut self, catalog: &ExtrasCatalog, name: &str) -> Result<bool, OrderingError> {
        let extra = catalog.find(name, ExtraKind::Side)?;
        if let Some(pos) = self.sides.iter().position(|s| s.extra.name == extra.name) {
            self.sides.remove(pos);
            Ok(false)
        } else {
            self.sides.push(SideLine {
                extra: extra.clone(),
                quantity: 1,
            });
            Ok(true)
        }
    }

    /// Set a side's quantity; `<= 0` removes it.
    pub fn set_side_quantity(
        &mut self,
        catalog: &ExtrasCatalog,
        name: &str,
        quantity: i64,
    ) -> Result<(), OrderingError> {
        let extra = catalog.find(name, ExtraKind::Side)?;
        if quantity <= 0 {
            self.sides.retain(|s| s.extra.name != extra.name);
            return Ok(());
        }
        let quantity = u32::try_from(quantity).map_err(|_| OrderingError::InvalidQuantity(quantity))?;

        match self.sides.iter_mut().find(|s| s.extra.name == extra.name) {
            Some(line) => line.quantity = quantity,
            None => self.sides.push(SideLine {
                extra: extra.clone(),
                quantity,
            }),
        }
        Ok(())
    }

    /// Price of the selected extras.
    pub fn extras_total(&self) -> Result<Money, OrderingError> {
        let mut total = Money::zero(self.currency);
        for condiment in &self.condiments {
            total = total.checked_add(&condiment.price)?;
        }
        for side in &self.sides {
            let line = side
                .extra
                .price
                .try_multiply(side.quantity)
                .ok_or(OrderingError::Overflow)?;
            total = total.checked_add(&line)?;
        }
        Ok(total)
    }

    /// Nothing selected and no note.
    pub fn is_empty(&self) -> bool {
        self.condiments.is_empty() && self.sides.is_empty() && self.note.trim().is_empty()
    }
}

/// A submitted request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenRequest {
    pub id: KitchenRequestId,
    pub order_id: OrderId,
    pub kind: KitchenRequestKind,
    pub note: String,
    pub condiments: Vec<Extra>,
    pub sides: Vec<SideLine>,
    pub extras_total: Money,
    pub submitted_at: DateTime<Utc>,
}

/// Per-order request log under `<prefix>:<order id>`.
#[derive(Debug, Clone)]
pub struct KitchenRequestLog {
    cache: Cache,
    prefix: String,
}

impl KitchenRequestLog {
    pub fn new(cache: Cache, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    fn key(&self, order_id: &OrderId) -> String {
        cache_key!(self.prefix.as_str(), order_id)
    }

    /// Validate and record a draft.
    ///
    /// The order must exist in `history`. An addition needs at least one extra
    /// or a note; an assistance request may be bare.
    pub fn submit(
        &self,
        history: &OrderHistory,
        draft: KitchenRequestDraft,
    ) -> Result<KitchenRequest, OrderingError> {
        history.find_by_id(&draft.order_id)?;
        if draft.kind == KitchenRequestKind::Addition && draft.is_empty() {
            return Err(OrderingError::Validation(
                "request has no extras and no note".to_string(),
            ));
        }

        let request = KitchenRequest {
            id: KitchenRequestId::generate(),
            extras_total: draft.extras_total()?,
            order_id: draft.order_id,
            kind: draft.kind,
            note: draft.note.trim().to_string(),
            condiments: draft.condiments,
            sides: draft.sides,
            submitted_at: Utc::now(),
        };

        let key = self.key(&request.order_id);
        let mut requests = self.read(&key)?;
        requests.push(request.clone());
        self.cache
            .set_record(&key, REQUESTS_SCHEMA_VERSION, &requests)?;

        tracing::info!(
            order = %request.order_id,
            request = %request.id,
            kind = ?request.kind,
            extras_total = %request.extras_total,
            "kitchen request submitted"
        );
        Ok(request)
    }

    /// Requests for an order, oldest first.
    pub fn for_order(&self, order_id: &OrderId) -> Result<Vec<KitchenRequest>, OrderingError> {
        self.read(&self.key(order_id))
    }

    fn read(&self, key: &str) -> Result<Vec<KitchenRequest>, OrderingError> {
        Ok(self
            .cache
            .get_record(key, REQUESTS_SCHEMA_VERSION)?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::PriceBreakdown;
    use crate::checkout::Order;

    fn catalog() -> ExtrasCatalog {
        ExtrasCatalog::standard(Currency::USD)
    }

    fn history_with(id: &str) -> (Cache, OrderHistory) {
        let cache = Cache::in_memory();
        let mut history = OrderHistory::open(cache.clone(), "orderHistory");
        history
            .append(Order {
                id: OrderId::new(id),
                items: Vec::new(),
                created_at: Utc::now(),
                totals: PriceBreakdown::zero(Currency::USD),
                table: None,
            })
            .unwrap();
        (cache, history)
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = catalog();
        assert_eq!(catalog.condiments().count(), 8);
        assert_eq!(catalog.sides().count(), 6);
        assert_eq!(
            catalog.find("onion rings", ExtraKind::Side).unwrap().price,
            Money::from_cents(449, Currency::USD)
        );
        assert!(matches!(
            catalog.find("Ketchup", ExtraKind::Side),
            Err(OrderingError::UnknownExtra(_))
        ));
    }

    #[test]
    fn test_toggles_and_total() {
        let catalog = catalog();
        let mut draft =
            KitchenRequestDraft::new(OrderId::new("o1"), KitchenRequestKind::Addition, Currency::USD);

        assert!(draft.toggle_condiment(&catalog, "Ketchup").unwrap());
        assert!(draft.toggle_condiment(&catalog, "BBQ Sauce").unwrap());
        assert!(!draft.toggle_condiment(&catalog, "Ketchup").unwrap());
        assert!(draft.toggle_side(&catalog, "French Fries").unwrap());
        draft.set_side_quantity(&catalog, "French Fries", 2).unwrap();
        draft.set_side_quantity(&catalog, "Coleslaw", 1).unwrap();

        // 0.75 + 2 * 3.99 + 2.99
        assert_eq!(draft.extras_total().unwrap(), Money::from_cents(1172, Currency::USD));

        draft.set_side_quantity(&catalog, "Coleslaw", 0).unwrap();
        assert!(!draft.toggle_side(&catalog, "French Fries").unwrap());
        assert_eq!(draft.extras_total().unwrap(), Money::from_cents(75, Currency::USD));
        assert!(draft.toggle_condiment(&catalog, "Gravy").is_err());
    }

    #[test]
    fn test_submit_and_read_back() {
        let (cache, history) = history_with("o1");
        let log = KitchenRequestLog::new(cache.clone(), "kitchenRequests");
        let catalog = catalog();

        let mut draft =
            KitchenRequestDraft::new(OrderId::new("o1"), KitchenRequestKind::Addition, Currency::USD);
        draft.toggle_condiment(&catalog, "Mustard").unwrap();
        draft.set_note("  extra napkins please ");
        let submitted = log.submit(&history, draft).unwrap();

        assert_eq!(submitted.note, "extra napkins please");
        assert_eq!(submitted.extras_total, Money::from_cents(50, Currency::USD));
        assert!(cache.exists("kitchenRequests:o1").unwrap());

        let bare =
            KitchenRequestDraft::new(OrderId::new("o1"), KitchenRequestKind::Assistance, Currency::USD);
        log.submit(&history, bare).unwrap();

        let requests = log.for_order(&OrderId::new("o1")).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], submitted);
        assert_eq!(requests[1].kind, KitchenRequestKind::Assistance);

        // The order is untouched.
        assert!(history.find_by_id(&OrderId::new("o1")).unwrap().items.is_empty());
    }

    #[test]
    fn test_submit_rejects_unknown_order_and_empty_addition() {
        let (cache, history) = history_with("o1");
        let log = KitchenRequestLog::new(cache, "kitchenRequests");

        let draft =
            KitchenRequestDraft::new(OrderId::new("nope"), KitchenRequestKind::Assistance, Currency::USD);
        assert!(matches!(
            log.submit(&history, draft),
            Err(OrderingError::OrderNotFound(_))
        ));

        let empty =
            KitchenRequestDraft::new(OrderId::new("o1"), KitchenRequestKind::Addition, Currency::USD);
        assert!(matches!(
            log.submit(&history, empty),
            Err(OrderingError::Validation(_))
        ));
        assert!(log.for_order(&OrderId::new("o1")).unwrap().is_empty());
    }
}
