//! TheMealDB menu source.

use serde::Deserialize;
use tableserve_core::config::{MenuConfig, RetryConfig};
use tableserve_core::menu::{MealSummary, MenuCategory};

use crate::{FetchClient, FetchError, RetryPolicy, Transport};

/// Where menu records come from.
pub trait MenuSource {
    /// All records for one category, in source order.
    fn fetch_category(&self, category: MenuCategory) -> Result<Vec<MealSummary>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct FilterResponse {
    /// `null` when the category has no meals.
    meals: Option<Vec<MealSummary>>,
}

/// Reads categories from TheMealDB's `filter.php` endpoint.
#[derive(Debug)]
pub struct MealDbSource {
    client: FetchClient,
}

impl MealDbSource {
    /// Wrap a client whose base URL points at the API root.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    /// Build a client from the `menu` and `retry` config sections.
    pub fn from_config(
        menu: &MenuConfig,
        retry: &RetryConfig,
        transport: impl Transport + 'static,
    ) -> Self {
        Self::new(
            FetchClient::new(transport)
                .with_base_url(menu.api_base_url.clone())
                .with_retry(RetryPolicy::from_config(retry)),
        )
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

impl MenuSource for MealDbSource {
    fn fetch_category(&self, category: MenuCategory) -> Result<Vec<MealSummary>, FetchError> {
        let response: FilterResponse = self
            .client
            .get("filter.php")
            .query("c", category.as_str())
            .accept("application/json")
            .send()?
            .json()?;

        let meals = response.meals.unwrap_or_default();
        tracing::debug!(%category, count = meals.len(), "fetched menu category");
        Ok(meals)
    }
}
