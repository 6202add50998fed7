//! "Goes well with" suggestions for the cart panel.

use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, ItemDescriptor};
use crate::ids::MenuItemId;
use crate::money::{Currency, Money};

/// Kind of suggested add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    Side,
    Dessert,
    Appetizer,
}

/// A suggestion that can be added to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub id: MenuItemId,
    pub name: String,
    pub thumbnail_url: String,
    pub price: Money,
    pub kind: CandidateKind,
    /// 0-100, higher first.
    pub match_score: u8,
    /// Short badge text ("Popular pairing").
    pub tag: String,
}

impl RecommendationCandidate {
    /// Descriptor for `CartStore::update_quantity(id, 1, Some(descriptor))`.
    pub fn descriptor(&self) -> ItemDescriptor {
        ItemDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            price: self.price,
            category: None,
        }
    }
}

/// Pick up to `limit` candidates not already in the cart, best match first.
///
/// The sort is stable: candidates with equal scores keep their pool order.
pub fn recommend(
    cart_items: &[CartLineItem],
    pool: &[RecommendationCandidate],
    limit: usize,
) -> Vec<RecommendationCandidate> {
    let mut picks: Vec<&RecommendationCandidate> = pool
        .iter()
        .filter(|c| !cart_items.iter().any(|line| line.id == c.id))
        .collect();
    picks.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    picks.into_iter().take(limit).cloned().collect()
}

/// The built-in suggestion catalog.
pub fn default_candidates(currency: Currency) -> Vec<RecommendationCandidate> {
    let entry = |id: &str, name: &str, cents: i64, kind, score, tag: &str| RecommendationCandidate {
        id: MenuItemId::new(id),
        name: name.to_string(),
        thumbnail_url: String::new(),
        price: Money::from_cents(cents, currency),
        kind,
        match_score: score,
        tag: tag.to_string(),
    };

    vec![
        entry("side-french-fries", "French Fries", 399, CandidateKind::Side, 95, "Popular pairing"),
        entry("side-onion-rings", "Onion Rings", 449, CandidateKind::Side, 82, "Crispy favourite"),
        entry("side-salad", "Side Salad", 399, CandidateKind::Side, 88, "Light and fresh"),
        entry("side-coleslaw", "Coleslaw", 299, CandidateKind::Side, 74, "Classic side"),
        entry("dessert-lava-cake", "Chocolate Lava Cake", 699, CandidateKind::Dessert, 90, "Chef's pick"),
        entry("dessert-tiramisu", "Tiramisu", 749, CandidateKind::Dessert, 82, "Sweet finish"),
        entry("app-garlic-bread", "Garlic Bread", 499, CandidateKind::Appetizer, 86, "Great to share"),
        entry("app-mozzarella-sticks", "Mozzarella Sticks", 599, CandidateKind::Appetizer, 78, "Crowd pleaser"),
    ]
}
