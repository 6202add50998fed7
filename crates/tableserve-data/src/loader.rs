//! Menu loading: fetch every configured category, then enrich once.

use rand::Rng;
use tableserve_core::config::MenuConfig;
use tableserve_core::menu::{Menu, MenuCategory, MenuEnricher};

use crate::{FetchError, MenuSource};

/// One category that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFailure {
    pub category: MenuCategory,
    pub error: FetchError,
}

/// Result of a load: whatever menu could be built, plus what failed.
#[derive(Debug, Clone)]
pub struct MenuLoad {
    pub menu: Menu,
    pub failures: Vec<CategoryFailure>,
}

impl MenuLoad {
    /// Every category loaded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Non-blocking message for the guest, if anything failed.
    pub fn notice(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        if self.menu.is_empty() {
            return Some("We couldn't load the menu. Please try again in a moment.".to_string());
        }
        let names: Vec<&str> = self.failures.iter().map(|f| f.category.as_str()).collect();
        Some(format!(
            "Some dishes are unavailable right now ({}). Showing the rest of the menu.",
            names.join(", ")
        ))
    }
}

/// Builds a [`Menu`] from a [`MenuSource`].
#[derive(Debug, Clone)]
pub struct MenuLoader {
    categories: Vec<MenuCategory>,
    items_per_category: usize,
}

impl MenuLoader {
    pub fn new(categories: Vec<MenuCategory>, items_per_category: usize) -> Self {
        Self {
            categories,
            items_per_category,
        }
    }

    pub fn from_config(config: &MenuConfig) -> Self {
        Self::new(config.categories.clone(), config.items_per_category)
    }

    /// Fetch each category in order and enrich the first
    /// `items_per_category` records.
    ///
    /// A failed category is recorded and skipped; the others still load.
    pub fn load<S, R>(&self, source: &S, enricher: &mut MenuEnricher<R>) -> MenuLoad
    where
        S: MenuSource + ?Sized,
        R: Rng,
    {
        let mut menu = Menu::new();
        let mut failures = Vec::new();

        for &category in &self.categories {
            match source.fetch_category(category) {
                Ok(meals) => {
                    let kept = meals.into_iter().take(self.items_per_category);
                    menu.push_section(category, enricher.enrich_all(kept, category));
                }
                Err(error) => {
                    tracing::warn!(%category, %error, "menu category failed to load");
                    failures.push(CategoryFailure { category, error });
                }
            }
        }

        tracing::info!(
            items = menu.len(),
            failed = failures.len(),
            "menu loaded"
        );
        MenuLoad { menu, failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tableserve_core::ids::MenuItemId;
    use tableserve_core::menu::MealSummary;
    use tableserve_core::Currency;

    struct StubSource;

    impl MenuSource for StubSource {
        fn fetch_category(&self, category: MenuCategory) -> Result<Vec<MealSummary>, FetchError> {
            match category {
                MenuCategory::Dessert => Err(FetchError::Timeout),
                MenuCategory::Starter => Ok(Vec::new()),
                _ => Ok((0..10)
                    .map(|i| MealSummary {
                        id: MenuItemId::new(format!("{category}-{i}")),
                        name: format!("{category} {i}"),
                        thumbnail_url: String::new(),
                    })
                    .collect()),
            }
        }
    }

    fn enricher() -> MenuEnricher<StdRng> {
        MenuEnricher::from_config(
            &MenuConfig::default(),
            Currency::USD,
            StdRng::seed_from_u64(3),
        )
        .unwrap()
    }

    #[test]
    fn test_partial_load_keeps_successful_categories() {
        let load = MenuLoader::from_config(&MenuConfig::default()).load(&StubSource, &mut enricher());

        assert!(!load.is_complete());
        assert_eq!(load.failures.len(), 1);
        assert_eq!(load.failures[0].category, MenuCategory::Dessert);
        assert_eq!(load.menu.section(MenuCategory::Beef).map(<[_]>::len), Some(6));
        assert_eq!(load.menu.section(MenuCategory::Starter).map(<[_]>::len), Some(0));
        assert!(load.menu.section(MenuCategory::Dessert).is_none());

        let notice = load.notice().unwrap();
        assert!(notice.contains("Dessert"));
    }

    #[test]
    fn test_keeps_source_order() {
        let loader = MenuLoader::new(vec![MenuCategory::Chicken], 3);
        let load = loader.load(&StubSource, &mut enricher());
        let ids: Vec<&str> = load.menu.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["Chicken-0", "Chicken-1", "Chicken-2"]);
        assert!(load.notice().is_none());
    }

    #[test]
    fn test_total_failure_notice() {
        let loader = MenuLoader::new(vec![MenuCategory::Dessert], 6);
        let load = loader.load(&StubSource, &mut enricher());
        assert!(load.menu.is_empty());
        assert_eq!(
            load.notice().as_deref(),
            Some("We couldn't load the menu. Please try again in a moment.")
        );
    }
}
