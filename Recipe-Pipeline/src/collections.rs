//! Per-session favorites and shopping cart.

use crate::types::StoredRecipe;

/// Favorite recipes in the order they were added, unique by id.
#[derive(Debug, Clone, Default)]
pub struct FavoriteSet {
    recipes: Vec<StoredRecipe>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the recipe, or remove it if already a favorite.
    ///
    /// Returns `true` when the recipe is a favorite afterwards.
    pub fn toggle(&mut self, recipe: StoredRecipe) -> bool {
        if let Some(pos) = self.recipes.iter().position(|r| r.id == recipe.id) {
            self.recipes.remove(pos);
            false
        } else {
            self.recipes.push(recipe);
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Recipes queued for shopping, unique by id.
#[derive(Debug, Clone, Default)]
pub struct CartSet {
    recipes: Vec<StoredRecipe>,
}

impl CartSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipe. Returns `false` if it was already in the cart.
    pub fn add(&mut self, recipe: StoredRecipe) -> bool {
        if self.recipes.iter().any(|r| r.id == recipe.id) {
            return false;
        }
        self.recipes.push(recipe);
        true
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }

    /// Sum of every ingredient cost across the cart.
    pub fn total_cost(&self) -> f64 {
        self.recipes.iter().map(StoredRecipe::total_cost).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
