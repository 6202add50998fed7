//! Checkout module.
//!
//! Contains the checkout state machine, orders, the order history and
//! follow-up kitchen requests.

mod flow;
mod history;
mod order;
mod requests;

pub use flow::{
    CheckoutController, CheckoutSnapshot, CheckoutState, OrderIdSource, RandomOrderIds,
    MAX_ORDER_ID_ATTEMPTS,
};
pub use history::{OrderHistory, HISTORY_SCHEMA_VERSION};
pub use order::{Order, OrderStatus, PREPARING_AFTER_MINUTES, READY_ESTIMATE_MINUTES};
pub use requests::{
    Extra, ExtraKind, ExtrasCatalog, KitchenRequest, KitchenRequestDraft, KitchenRequestKind,
    KitchenRequestLog, SideLine, REQUESTS_SCHEMA_VERSION,
};
