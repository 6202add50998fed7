//! Nutrition estimates for the order details view.
//!
//! These are rough, per-category baselines rather than real nutritional data,
//! and every summary is marked as an estimate.

use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;
use crate::ids::MenuItemId;
use crate::menu::MenuCategory;

/// Reference daily intake used for percentages.
pub const DAILY_CALORIES: u32 = 2000;
pub const DAILY_PROTEIN_G: u32 = 50;
pub const DAILY_CARBS_G: u32 = 260;
pub const DAILY_FAT_G: u32 = 65;

/// Macros for one serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Macros {
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

impl Macros {
    const fn new(calories: u32, protein_g: u32, carbs_g: u32, fat_g: u32) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    /// Per-serving baseline for a category; `None` is anything off the menu.
    pub fn baseline(category: Option<MenuCategory>) -> Self {
        match category {
            Some(MenuCategory::Starter) => Self::new(250, 8, 25, 12),
            Some(MenuCategory::Beef) => Self::new(650, 42, 30, 38),
            Some(MenuCategory::Chicken) => Self::new(520, 40, 35, 22),
            Some(MenuCategory::Dessert) => Self::new(420, 5, 58, 19),
            Some(MenuCategory::Vegetarian) => Self::new(380, 14, 48, 14),
            None => Self::new(300, 8, 35, 14),
        }
    }

    fn add_scaled(&mut self, other: Macros, quantity: u32) {
        self.calories = self.calories.saturating_add(other.calories.saturating_mul(quantity));
        self.protein_g = self.protein_g.saturating_add(other.protein_g.saturating_mul(quantity));
        self.carbs_g = self.carbs_g.saturating_add(other.carbs_g.saturating_mul(quantity));
        self.fat_g = self.fat_g.saturating_add(other.fat_g.saturating_mul(quantity));
    }
}

/// Share of the reference daily intake, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyValues {
    pub calories_pct: u32,
    pub protein_pct: u32,
    pub carbs_pct: u32,
    pub fat_pct: u32,
}

/// Estimated nutrition for a set of line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub totals: Macros,
    pub daily: DailyValues,
    pub insights: Vec<String>,
    pub tags: Vec<String>,
    /// Always true; shown as "Estimated values".
    pub is_estimate: bool,
}

impl NutritionSummary {
    /// Estimate from line items. A line's own category wins; `category_of`
    /// covers lines added without one.
    pub fn estimate<F>(items: &[CartLineItem], category_of: F) -> Self
    where
        F: Fn(&MenuItemId) -> Option<MenuCategory>,
    {
        let mut totals = Macros::default();
        let mut categories = Vec::with_capacity(items.len());
        for item in items {
            let category = item.category.or_else(|| category_of(&item.id));
            totals.add_scaled(Macros::baseline(category), item.quantity);
            categories.push(category);
        }

        let daily = DailyValues {
            calories_pct: percent(totals.calories, DAILY_CALORIES),
            protein_pct: percent(totals.protein_g, DAILY_PROTEIN_G),
            carbs_pct: percent(totals.carbs_g, DAILY_CARBS_G),
            fat_pct: percent(totals.fat_g, DAILY_FAT_G),
        };

        let has = |c: MenuCategory| categories.contains(&Some(c));
        let mut insights = Vec::new();
        let mut tags = Vec::new();

        if totals.protein_g >= 30 {
            insights.push("Rich in essential amino acids from protein sources".to_string());
            tags.push("High Protein".to_string());
        }
        if daily.calories_pct >= 50 {
            insights.push("A hearty meal, over half of a typical daily calorie intake".to_string());
        }
        if daily.fat_pct >= 60 {
            insights.push("High in fat; consider sharing a dish".to_string());
        }
        if has(MenuCategory::Beef) || has(MenuCategory::Chicken) {
            insights.push("Moderately high in sodium - consider drinking extra water".to_string());
        }
        if !items.is_empty() && !has(MenuCategory::Vegetarian) {
            insights.push("Consider adding a side salad to increase fiber intake".to_string());
        }

        match daily.carbs_pct {
            0 => {}
            1..=24 => tags.push("Low Carb".to_string()),
            25..=49 => tags.push("Moderate Carbs".to_string()),
            _ => tags.push("High Carb".to_string()),
        }
        if !categories.is_empty() && categories.iter().all(|c| *c == Some(MenuCategory::Vegetarian)) {
            tags.push("Vegetarian".to_string());
        }
        if has(MenuCategory::Dessert) {
            tags.push("Contains Sweets".to_string());
        }

        Self {
            totals,
            daily,
            insights,
            tags,
            is_estimate: true,
        }
    }
}

fn percent(value: u32, daily: u32) -> u32 {
    ((u64::from(value) * 100 + u64::from(daily) / 2) / u64::from(daily)) as u32
}
