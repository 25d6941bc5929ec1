//! # Recipe Pipeline
//!
//! Turns a user's meal preferences into saved, illustrated recipes using an
//! LLM, and provides the catalog operations around them.
//!
//! ## Features
//!
//! - **Prompt building**: preferences rendered into a schema-constrained prompt
//! - **Tolerant normalization**: code fences, prose preambles, string-only
//!   ingredient lists and currency-formatted costs are all accepted
//! - **Title deduplication** against already-saved recipes
//! - **Image backfill**: concurrent lookups with per-task timeout,
//!   cancellation and a placeholder fallback
//! - **Single-flight generation** with a progress callback per state
//! - **Catalog helpers**: category filter, search, ratings, comments,
//!   favorites and cart
//!
//! ## Quick Start
//!
//! ```no_run
//! use recipe_pipeline::{
//!     ChatCompletionClient, CompletionConfig, MemoryStore, PreferenceRecord,
//!     RecipeGenerator, RecipeRepository, StaticAuth,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatCompletionClient::new(CompletionConfig::from_env()?)?;
//!     let repository = RecipeRepository::new(Arc::new(MemoryStore::new()));
//!     let generator = RecipeGenerator::new(
//!         Arc::new(client),
//!         repository,
//!         Arc::new(StaticAuth::signed_in("user-1")),
//!     );
//!
//!     let mut prefs = PreferenceRecord::collector();
//!     prefs.toggle_cuisine("Sri Lankan");
//!     prefs.diet("Vegetarian").meals_per_day("3");
//!
//!     let report = generator.generate(&prefs.finish()).await?;
//!     for recipe in &report.recipes {
//!         println!("{} ({:.2})", recipe.title, recipe.total_cost());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Normalization
//!
//! ```
//! use recipe_pipeline::normalize_response;
//!
//! let raw = "```json\n[{\"title\": \"Dal\", \"ingredients\": [\"Lentils\"]}]\n```";
//! let recipes = normalize_response(raw).unwrap();
//! assert_eq!(recipes[0].title, "Dal");
//! assert_eq!(recipes[0].ingredients[0].ingredient_measurement, "N/A");
//! ```

pub mod auth;
pub mod backfill;
pub mod catalog;
pub mod client;
pub mod collections;
pub mod config;
pub mod dedup;
pub mod draft;
pub mod error;
pub mod freeform;
pub mod normalize;
pub mod pipeline;
pub mod preferences;
pub mod prompt;
pub mod recipes;
pub mod store;
pub mod types;

pub use auth::{AuthSession, StaticAuth};
pub use backfill::{backfill_images, BackfillReport, ImageOutcome, ImageSource};
pub use client::{ChatCompletionClient, CompletionProvider, FakeProvider};
pub use collections::{CartSet, FavoriteSet};
pub use config::{BackfillConfig, CompletionConfig, PLACEHOLDER_IMAGE_URL};
pub use draft::{ImageUploader, RecipeDraft};
pub use error::{RecipeError, Result};
pub use freeform::{parse_freeform_recipe, FreeformRecipe};
pub use normalize::normalize_response;
pub use pipeline::{GenerationReport, GenerationState, RecipeGenerator};
pub use preferences::{PreferenceCollector, PreferenceRecord};
pub use prompt::{build_ingredient_prompt, build_recipe_prompt};
pub use recipes::{NewRecipe, RecipeRepository};
pub use store::{Document, DocumentStore, MemoryStore, OrderBy};
pub use types::{Comment, GeneratedRecipe, Ingredient, StoredRecipe, UserProfile};
