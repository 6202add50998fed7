//! Menu item and category types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::ItemDescriptor;
use crate::ids::MenuItemId;
use crate::money::Money;

/// Menu categories, named as the recipe API names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuCategory {
    Starter,
    Beef,
    Chicken,
    Dessert,
    Vegetarian,
}

impl MenuCategory {
    /// All categories in display order.
    pub const ALL: [MenuCategory; 5] = [
        MenuCategory::Starter,
        MenuCategory::Beef,
        MenuCategory::Chicken,
        MenuCategory::Dessert,
        MenuCategory::Vegetarian,
    ];

    /// Name used in API queries (`filter.php?c=Beef`).
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Starter => "Starter",
            MenuCategory::Beef => "Beef",
            MenuCategory::Chicken => "Chicken",
            MenuCategory::Dessert => "Dessert",
            MenuCategory::Vegetarian => "Vegetarian",
        }
    }

    /// Parse a category name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw record returned by the recipe API's category filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: MenuItemId,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail_url: String,
}

/// A priced, described menu item. Immutable once enriched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub thumbnail_url: String,
    pub price: Money,
    pub category: MenuCategory,
    pub description: String,
    /// Star rating with one fractional digit.
    pub rating: Decimal,
    pub prep_time_minutes: u32,
}

impl MenuItem {
    /// Prep time as shown on the menu card ("15 min").
    pub fn prep_time_label(&self) -> String {
        format!("{} min", self.prep_time_minutes)
    }

    /// Copy of the fields a cart line keeps.
    pub fn descriptor(&self) -> ItemDescriptor {
        ItemDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            price: self.price,
            category: Some(self.category),
        }
    }
}

/// One category's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub category: MenuCategory,
    pub items: Vec<MenuItem>,
}

/// The browsable menu: sections in configured order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    sections: Vec<MenuSection>,
}

impl Menu {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section. A repeated category replaces the earlier section.
    pub fn push_section(&mut self, category: MenuCategory, items: Vec<MenuItem>) {
        if let Some(existing) = self.sections.iter_mut().find(|s| s.category == category) {
            existing.items = items;
        } else {
            self.sections.push(MenuSection { category, items });
        }
    }

    /// All sections in order.
    pub fn sections(&self) -> &[MenuSection] {
        &self.sections
    }

    /// Items of one category, if loaded.
    pub fn section(&self, category: MenuCategory) -> Option<&[MenuItem]> {
        self.sections
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.items.as_slice())
    }

    /// Loaded categories in order.
    pub fn categories(&self) -> impl Iterator<Item = MenuCategory> + '_ {
        self.sections.iter().map(|s| s.category)
    }

    /// Every item across sections.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// Look up an item by id.
    pub fn find(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.items().find(|item| &item.id == id)
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Whether no items are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn item(id: &str, category: MenuCategory) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: format!("Meal {id}"),
            thumbnail_url: String::new(),
            price: Money::from_cents(1299, Currency::USD),
            category,
            description: String::new(),
            rating: Decimal::new(45, 1),
            prep_time_minutes: 15,
        }
    }

    #[test]
    fn test_meal_summary_uses_api_field_names() {
        let summary: MealSummary = serde_json::from_str(
            r#"{"strMeal":"Beef Wellington","strMealThumb":"https://img/1.jpg","idMeal":"52803"}"#,
        )
        .unwrap();
        assert_eq!(summary.id.as_str(), "52803");
        assert_eq!(summary.name, "Beef Wellington");
        assert_eq!(summary.thumbnail_url, "https://img/1.jpg");
    }

    #[test]
    fn test_category_names() {
        assert_eq!(MenuCategory::Vegetarian.as_str(), "Vegetarian");
        assert_eq!(MenuCategory::from_name("beef"), Some(MenuCategory::Beef));
        assert_eq!(MenuCategory::from_name("Seafood"), None);
    }

    #[test]
    fn test_menu_sections_keep_order() {
        let mut menu = Menu::new();
        menu.push_section(MenuCategory::Dessert, vec![item("1", MenuCategory::Dessert)]);
        menu.push_section(MenuCategory::Beef, vec![item("2", MenuCategory::Beef)]);

        let categories: Vec<_> = menu.categories().collect();
        assert_eq!(categories, vec![MenuCategory::Dessert, MenuCategory::Beef]);
        assert_eq!(menu.len(), 2);
        assert!(menu.find(&MenuItemId::new("2")).is_some());
        assert!(menu.section(MenuCategory::Chicken).is_none());
    }

    #[test]
    fn test_push_section_replaces_category() {
        let mut menu = Menu::new();
        menu.push_section(MenuCategory::Beef, vec![item("1", MenuCategory::Beef)]);
        menu.push_section(MenuCategory::Beef, vec![]);
        assert_eq!(menu.sections().len(), 1);
        assert!(menu.is_empty());
    }

    #[test]
    fn test_descriptor_copies_price() {
        let menu_item = item("52874", MenuCategory::Beef);
        let descriptor = menu_item.descriptor();
        assert_eq!(descriptor.id, menu_item.id);
        assert_eq!(descriptor.price, menu_item.price);
        assert_eq!(menu_item.prep_time_label(), "15 min");
    }
}
