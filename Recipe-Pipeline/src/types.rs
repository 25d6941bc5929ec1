use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category stamped on every recipe produced by the generator.
pub const AI_GENERATED_CATEGORY: &str = "AI Generated";

/// Shown when a generated recipe carries no instructions.
pub const MISSING_INSTRUCTIONS: &str = "No instructions provided.";

/// Used when a generated recipe carries no title.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// Measurement used when an ingredient has none.
pub const UNKNOWN_MEASUREMENT: &str = "N/A";

/// Browsing categories, in display order.
pub const CATEGORIES: [&str; 7] = [
    "All",
    "AI Generated",
    "BreakFast",
    "Lunch",
    "FastFood",
    "Dinner",
    "Dessert",
];

/// Anything with a title that can be deduplicated or searched.
pub trait Titled {
    fn title(&self) -> &str;
}

/// A single ingredient after normalization.
///
/// `ingredient_cost` is always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub ingredient_name: String,
    pub ingredient_measurement: String,
    pub ingredient_cost: f64,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, measurement: impl Into<String>, cost: f64) -> Self {
        Self {
            ingredient_name: name.into(),
            ingredient_measurement: measurement.into(),
            ingredient_cost: if cost.is_finite() && cost > 0.0 { cost } else { 0.0 },
        }
    }
}

/// Ingredient as the model (or an older stored record) emitted it.
///
/// Resolved into [`Ingredient`] once, at the normalization boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RawIngredient {
    Simple(String),
    Detailed {
        name: Option<String>,
        measurement: Option<String>,
        cost: Option<f64>,
    },
}

impl From<RawIngredient> for Ingredient {
    fn from(raw: RawIngredient) -> Self {
        match raw {
            RawIngredient::Simple(name) => Ingredient::new(name, UNKNOWN_MEASUREMENT, 0.0),
            RawIngredient::Detailed {
                name,
                measurement,
                cost,
            } => Ingredient::new(
                name.unwrap_or_else(|| "Unknown".to_string()),
                measurement.unwrap_or_else(|| UNKNOWN_MEASUREMENT.to_string()),
                cost.unwrap_or(0.0),
            ),
        }
    }
}

/// A recipe produced by the normalizer from LLM output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: String,
}

impl GeneratedRecipe {
    /// True when the recipe has a non-blank image URL.
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn total_cost(&self) -> f64 {
        self.ingredients.iter().map(|i| i.ingredient_cost).sum()
    }
}

impl Titled for GeneratedRecipe {
    fn title(&self) -> &str {
        &self.title
    }
}

/// A recipe as held by the document store.
///
/// Manual recipes were historically saved under `name`; reading accepts
/// either field (see [`crate::recipes::recipe_from_document`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecipe {
    #[serde(skip)]
    pub id: String,
    pub title: String,
    pub category: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: f64,
}

impl StoredRecipe {
    /// Title for display, never empty.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Unnamed Recipe"
        } else {
            &self.title
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.ingredients.iter().map(|i| i.ingredient_cost).sum()
    }
}

impl Titled for StoredRecipe {
    fn title(&self) -> &str {
        &self.title
    }
}

impl From<GeneratedRecipe> for StoredRecipe {
    fn from(r: GeneratedRecipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            category: r.category,
            ingredients: r.ingredients,
            instructions: r.instructions,
            image: r.image.unwrap_or_default(),
            created_by: None,
            created_at: None,
            rating: 0.0,
        }
    }
}

/// A comment attached to a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip)]
    pub id: String,
    pub recipe_id: String,
    pub username: String,
    pub comment: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Profile document in the `users` collection, keyed by auth uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}
