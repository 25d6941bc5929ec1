//! Recipe, comment and profile persistence over a [`DocumentStore`].

use crate::error::{RecipeError, Result};
use crate::normalize::normalize_ingredients;
use crate::store::{server_timestamp, Document, DocumentStore, OrderBy};
use crate::types::{Comment, GeneratedRecipe, Ingredient, StoredRecipe, UserProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const RECIPES: &str = "recipes";
pub const COMMENTS: &str = "comments";
pub const USERS: &str = "users";

/// Display name for comments and authors without an account.
pub const ANONYMOUS: &str = "Anonymous";

/// Display name when a profile lookup fails.
pub const UNKNOWN_USER: &str = "Unknown";

/// A manually entered recipe ready to be saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    pub category: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub image: String,
    pub created_by: String,
}

/// Decode a recipe document, tolerating the older `name` field and any
/// ingredient shape.
pub fn recipe_from_document(doc: Document) -> StoredRecipe {
    let data = &doc.data;
    let text = |field: &str| -> Option<String> {
        data.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    StoredRecipe {
        title: text("title").or_else(|| text("name")).unwrap_or_default(),
        category: text("category").unwrap_or_default(),
        ingredients: data
            .get("ingredients")
            .map(normalize_ingredients)
            .unwrap_or_default(),
        instructions: text("instructions").unwrap_or_default(),
        image: text("image").unwrap_or_default(),
        created_by: text("createdBy"),
        created_at: text("createdAt").and_then(|s| parse_timestamp(&s)),
        rating: data
            .get("rating")
            .and_then(Value::as_f64)
            .filter(|r| r.is_finite())
            .unwrap_or(0.0),
        id: doc.id,
    }
}

fn comment_from_document(doc: Document) -> Comment {
    let field = |name: &str| doc.str_field(name).unwrap_or_default().to_string();
    Comment {
        recipe_id: field("recipeId"),
        username: field("username"),
        comment: field("comment"),
        timestamp: doc.str_field("timestamp").and_then(parse_timestamp),
        id: doc.id.clone(),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Typed access to the `recipes`, `comments` and `users` collections.
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    store: Arc<dyn DocumentStore>,
}

impl RecipeRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Save a manually entered recipe.
    pub async fn add_recipe(&self, recipe: NewRecipe) -> Result<String> {
        let mut data = serde_json::to_value(&recipe)?;
        data["createdAt"] = server_timestamp();
        data["rating"] = json!(0);
        let id = self.store.create(RECIPES, data).await?;
        tracing::info!(id = %id, title = %recipe.title, "recipe saved");
        Ok(id)
    }

    /// Save a generated recipe with a server timestamp.
    pub async fn save_generated(
        &self,
        recipe: &GeneratedRecipe,
        created_by: Option<&str>,
    ) -> Result<String> {
        let mut stored = StoredRecipe::from(recipe.clone());
        stored.created_by = created_by.map(str::to_string);
        let mut data = serde_json::to_value(&stored)?;
        data["createdAt"] = server_timestamp();
        self.store.create(RECIPES, data).await
    }

    pub async fn get_recipe(&self, id: &str) -> Result<StoredRecipe> {
        self.store
            .get(RECIPES, id)
            .await?
            .map(recipe_from_document)
            .ok_or_else(|| RecipeError::NotFound(format!("recipe {}", id)))
    }

    pub async fn list_recipes(&self) -> Result<Vec<StoredRecipe>> {
        Ok(self
            .store
            .list(RECIPES)
            .await?
            .into_iter()
            .map(recipe_from_document)
            .collect())
    }

    /// Recipes created by `uid`, newest first.
    pub async fn recipes_by_creator(&self, uid: &str) -> Result<Vec<StoredRecipe>> {
        Ok(self
            .store
            .query(RECIPES, "createdBy", &json!(uid), Some(&OrderBy::desc("createdAt")))
            .await?
            .into_iter()
            .map(recipe_from_document)
            .collect())
    }

    /// Titles of every persisted recipe, for deduplication.
    pub async fn persisted_titles(&self) -> Result<Vec<String>> {
        Ok(self
            .list_recipes()
            .await?
            .into_iter()
            .map(|r| r.title)
            .filter(|t| !t.is_empty())
            .collect())
    }

    /// Set a recipe's rating, replacing any previous one.
    pub async fn rate_recipe(&self, id: &str, stars: u8) -> Result<()> {
        if !(1..=5).contains(&stars) {
            return Err(RecipeError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                stars
            )));
        }
        self.store
            .update(RECIPES, id, json!({ "rating": stars }))
            .await
    }

    /// Post a comment. A missing username is stored as "Anonymous".
    pub async fn add_comment(
        &self,
        recipe_id: &str,
        username: Option<&str>,
        text: &str,
    ) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RecipeError::Validation("Comment cannot be empty".to_string()));
        }
        if recipe_id.trim().is_empty() {
            return Err(RecipeError::Validation("Recipe id is required".to_string()));
        }
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(ANONYMOUS);

        self.store
            .create(
                COMMENTS,
                json!({
                    "recipeId": recipe_id,
                    "username": username,
                    "comment": text,
                    "timestamp": server_timestamp(),
                }),
            )
            .await
    }

    /// Comments on a recipe, newest first.
    pub async fn comments_for(&self, recipe_id: &str) -> Result<Vec<Comment>> {
        Ok(self
            .store
            .query(
                COMMENTS,
                "recipeId",
                &json!(recipe_id),
                Some(&OrderBy::desc("timestamp")),
            )
            .await?
            .into_iter()
            .map(comment_from_document)
            .collect())
    }

    pub async fn create_user_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        self.store
            .set(USERS, uid, serde_json::to_value(profile)?)
            .await
    }

    pub async fn user_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        match self.store.get(USERS, uid).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Display name for a recipe author. Never fails.
    pub async fn username_for(&self, uid: Option<&str>) -> String {
        let Some(uid) = uid.filter(|u| !u.trim().is_empty()) else {
            return ANONYMOUS.to_string();
        };
        match self.store.get(USERS, uid).await {
            Ok(Some(doc)) => doc
                .str_field("username")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(UNKNOWN_USER)
                .to_string(),
            Ok(None) => UNKNOWN_USER.to_string(),
            Err(e) => {
                tracing::warn!(uid, error = %e, "username lookup failed");
                UNKNOWN_USER.to_string()
            }
        }
    }

    pub async fn update_username(&self, uid: &str, username: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RecipeError::Validation("Username cannot be empty".to_string()));
        }
        self.store
            .update(USERS, uid, json!({ "username": username }))
            .await
    }

    pub async fn update_profile_image(&self, uid: &str, url: &str) -> Result<()> {
        self.store
            .update(USERS, uid, json!({ "profileImage": url }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::AI_GENERATED_CATEGORY;

    fn repo() -> (Arc<MemoryStore>, RecipeRepository) {
        let store = Arc::new(MemoryStore::new());
        let repo = RecipeRepository::new(store.clone());
        (store, repo)
    }

    fn new_recipe(title: &str, uid: &str) -> NewRecipe {
        NewRecipe {
            title: title.to_string(),
            category: "Dinner".to_string(),
            ingredients: vec![Ingredient::new("Rice", "1 cup", 1.0)],
            instructions: "Cook.".to_string(),
            image: String::new(),
            created_by: uid.to_string(),
        }
    }

    #[test]
    fn test_recipe_from_legacy_document() {
        let doc = Document {
            id: "r1".to_string(),
            data: json!({
                "name": "Kottu",
                "category": "Dinner",
                "ingredients": ["Roti", {"ingredientName": "Egg", "ingredientCost": "Rs. 40"}],
                "createdAt": "2024-03-01T10:00:00.000000Z",
                "rating": 4
            }),
        };
        let recipe = recipe_from_document(doc);
        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.title, "Kottu");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[1].ingredient_cost, 40.0);
        assert_eq!(recipe.rating, 4.0);
        assert!(recipe.created_at.is_some());
        assert_eq!(recipe.image, "");
    }

    #[tokio::test]
    async fn test_add_and_get_recipe() {
        let (_, repo) = repo();
        let id = repo.add_recipe(new_recipe("Stew", "u1")).await.unwrap();
        let recipe = repo.get_recipe(&id).await.unwrap();
        assert_eq!(recipe.title, "Stew");
        assert_eq!(recipe.created_by.as_deref(), Some("u1"));
        assert!(recipe.created_at.is_some());

        let err = repo.get_recipe("nope").await.unwrap_err();
        assert!(matches!(err, RecipeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_generated_keeps_category_and_creator() {
        let (_, repo) = repo();
        let generated = GeneratedRecipe {
            id: "g1".to_string(),
            title: "Soup".to_string(),
            ingredients: vec![],
            instructions: "Boil.".to_string(),
            image: Some("https://img".to_string()),
            category: AI_GENERATED_CATEGORY.to_string(),
        };
        let id = repo.save_generated(&generated, Some("u9")).await.unwrap();
        let stored = repo.get_recipe(&id).await.unwrap();
        assert_eq!(stored.category, AI_GENERATED_CATEGORY);
        assert_eq!(stored.created_by.as_deref(), Some("u9"));
        assert_eq!(stored.image, "https://img");
        assert_eq!(repo.persisted_titles().await.unwrap(), vec!["Soup"]);
    }

    #[tokio::test]
    async fn test_recipes_by_creator_newest_first() {
        let (_, repo) = repo();
        repo.add_recipe(new_recipe("First", "u1")).await.unwrap();
        repo.add_recipe(new_recipe("Other", "u2")).await.unwrap();
        repo.add_recipe(new_recipe("Second", "u1")).await.unwrap();

        let mine = repo.recipes_by_creator("u1").await.unwrap();
        let titles: Vec<&str> = mine.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_rate_recipe_bounds_and_overwrite() {
        let (_, repo) = repo();
        let id = repo.add_recipe(new_recipe("Stew", "u1")).await.unwrap();

        assert!(matches!(
            repo.rate_recipe(&id, 0).await.unwrap_err(),
            RecipeError::Validation(_)
        ));
        assert!(matches!(
            repo.rate_recipe(&id, 6).await.unwrap_err(),
            RecipeError::Validation(_)
        ));

        repo.rate_recipe(&id, 3).await.unwrap();
        repo.rate_recipe(&id, 5).await.unwrap();
        assert_eq!(repo.get_recipe(&id).await.unwrap().rating, 5.0);

        assert!(matches!(
            repo.rate_recipe("missing", 4).await.unwrap_err(),
            RecipeError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_comments_validation_and_order() {
        let (_, repo) = repo();
        assert!(matches!(
            repo.add_comment("r1", Some("amy"), "   ").await.unwrap_err(),
            RecipeError::Validation(_)
        ));
        assert!(matches!(
            repo.add_comment("", Some("amy"), "hi").await.unwrap_err(),
            RecipeError::Validation(_)
        ));

        repo.add_comment("r1", Some("amy"), " first ").await.unwrap();
        repo.add_comment("r1", None, "second").await.unwrap();
        repo.add_comment("r2", Some("bob"), "elsewhere").await.unwrap();

        let comments = repo.comments_for("r1").await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].comment, "second");
        assert_eq!(comments[0].username, ANONYMOUS);
        assert_eq!(comments[1].comment, "first");
        assert!(comments[0].timestamp > comments[1].timestamp);
    }

    #[tokio::test]
    async fn test_username_lookup() {
        let (store, repo) = repo();
        repo.create_user_profile(
            "u1",
            &UserProfile {
                username: "amy".to_string(),
                email: "amy@example.com".to_string(),
                profile_image: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(repo.username_for(Some("u1")).await, "amy");
        assert_eq!(repo.username_for(Some("ghost")).await, UNKNOWN_USER);
        assert_eq!(repo.username_for(None).await, ANONYMOUS);
        assert_eq!(store.len(USERS), 1);
    }

    #[tokio::test]
    async fn test_profile_updates() {
        let (_, repo) = repo();
        repo.create_user_profile(
            "u1",
            &UserProfile {
                username: "amy".to_string(),
                email: "amy@example.com".to_string(),
                profile_image: None,
            },
        )
        .await
        .unwrap();

        repo.update_username("u1", " amelia ").await.unwrap();
        repo.update_profile_image("u1", "https://cdn/amy.png")
            .await
            .unwrap();
        let profile = repo.user_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.username, "amelia");
        assert_eq!(profile.email, "amy@example.com");
        assert_eq!(profile.profile_image.as_deref(), Some("https://cdn/amy.png"));

        assert!(matches!(
            repo.update_username("u1", " ").await.unwrap_err(),
            RecipeError::Validation(_)
        ));
        assert!(repo.update_username("ghost", "x").await.is_err());
    }
}
