//! Browsing helpers: category filter, title search and rating display.

use crate::types::{Ingredient, StoredRecipe, CATEGORIES};

/// The category that matches every recipe.
pub const ALL_CATEGORY: &str = CATEGORIES[0];

/// Recipes in `category`; [`ALL_CATEGORY`] returns every recipe.
pub fn filter_by_category<'a>(recipes: &'a [StoredRecipe], category: &str) -> Vec<&'a StoredRecipe> {
    let category = category.trim();
    if category.eq_ignore_ascii_case(ALL_CATEGORY) {
        return recipes.iter().collect();
    }
    recipes
        .iter()
        .filter(|r| r.category.trim().eq_ignore_ascii_case(category))
        .collect()
}

/// Recipes whose display title contains `query`, ignoring case.
pub fn search<'a, I>(recipes: I, query: &str) -> Vec<&'a StoredRecipe>
where
    I: IntoIterator<Item = &'a StoredRecipe>,
{
    let needle = query.trim().to_lowercase();
    recipes
        .into_iter()
        .filter(|r| needle.is_empty() || r.display_title().to_lowercase().contains(&needle))
        .collect()
}

/// Split a rating into `(filled, half, empty)` stars out of five.
pub fn star_breakdown(rating: f64) -> (u8, u8, u8) {
    let rating = if rating.is_finite() {
        rating.clamp(0.0, 5.0)
    } else {
        0.0
    };
    let filled = rating.floor() as u8;
    let half = u8::from(filled < 5 && rating - rating.floor() >= 0.5);
    (filled, half, 5 - filled - half)
}

pub fn total_cost(ingredients: &[Ingredient]) -> f64 {
    ingredients.iter().map(|i| i.ingredient_cost).sum()
}
