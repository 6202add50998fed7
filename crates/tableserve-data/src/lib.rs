//! Menu source client for TableServe.
//!
//! Fetches menu records from TheMealDB through a pluggable [`Transport`],
//! retrying transient failures with backoff, and turns them into a
//! [`Menu`](tableserve_core::menu::Menu) with [`MenuLoader`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rand::thread_rng;
//! use tableserve_core::menu::MenuEnricher;
//! use tableserve_core::TableServeConfig;
//! use tableserve_data::{MealDbSource, MenuLoader, SpinTransport};
//!
//! let config = TableServeConfig::default();
//! let source = MealDbSource::from_config(&config.menu, &config.retry, SpinTransport);
//! let mut enricher =
//!     MenuEnricher::from_config(&config.menu, config.pricing.currency, thread_rng())?;
//!
//! let load = MenuLoader::from_config(&config.menu).load(&source, &mut enricher);
//! if let Some(notice) = load.notice() {
//!     show_banner(&notice);
//! }
//! session.set_menu(load.menu);
//! ```

mod client;
mod error;
mod loader;
mod mealdb;
mod request;
mod response;
mod retry;
mod transport;

pub use client::{ClientRequestBuilder, FetchClient};
pub use error::FetchError;
pub use loader::{CategoryFailure, MenuLoad, MenuLoader};
pub use mealdb::{MealDbSource, MenuSource};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use retry::{BackoffStrategy, RetryPolicy};
#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;
pub use transport::Transport;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, MealDbSource, MenuLoad, MenuLoader, MenuSource};
}
