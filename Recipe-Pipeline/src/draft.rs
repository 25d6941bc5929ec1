//! Manual recipe entry.

use crate::auth::AuthSession;
use crate::error::{RecipeError, Result};
use crate::normalize::parse_cost_str;
use crate::recipes::NewRecipe;
use crate::types::Ingredient;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Uploads a local image and returns its public URL.
#[async_trait]
pub trait ImageUploader: Send + Sync + fmt::Debug {
    async fn upload(&self, path: &Path) -> Result<String>;
}

/// A recipe being typed in by a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub category: String,
    pub instructions: String,
    ingredients: Vec<Ingredient>,
    image: Option<String>,
}

impl RecipeDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Append an ingredient. All three fields are required; the cost is
    /// parsed leniently (`"Rs. 45"` → 45.0).
    pub fn add_ingredient(&mut self, name: &str, measurement: &str, cost: &str) -> Result<()> {
        let (name, measurement, cost) = (name.trim(), measurement.trim(), cost.trim());
        if name.is_empty() || measurement.is_empty() || cost.is_empty() {
            return Err(RecipeError::Validation(
                "Please fill in all ingredient fields".to_string(),
            ));
        }
        self.ingredients
            .push(Ingredient::new(name, measurement, parse_cost_str(cost)));
        Ok(())
    }

    /// Remove the ingredient at `index`, returning it if it existed.
    pub fn remove_ingredient(&mut self, index: usize) -> Option<Ingredient> {
        (index < self.ingredients.len()).then(|| self.ingredients.remove(index))
    }

    /// Upload a local image and attach its URL.
    pub async fn attach_image(&mut self, uploader: &dyn ImageUploader, path: &Path) -> Result<()> {
        let url = uploader.upload(path).await.map_err(|e| match e {
            RecipeError::Upload(_) => e,
            other => RecipeError::Upload(other.to_string()),
        })?;
        if !url.starts_with("https://") {
            return Err(RecipeError::Upload(format!(
                "uploader returned a non-HTTPS URL: {}",
                url
            )));
        }
        self.image = Some(url);
        Ok(())
    }

    /// Validate the draft and turn it into a record for the repository.
    pub fn submit(&self, auth: &dyn AuthSession) -> Result<NewRecipe> {
        let missing = if self.title.trim().is_empty() {
            Some("recipe name")
        } else if self.category.trim().is_empty() {
            Some("category")
        } else if self.ingredients.is_empty() {
            Some("at least one ingredient")
        } else if self.instructions.trim().is_empty() {
            Some("instructions")
        } else {
            None
        };
        if let Some(field) = missing {
            return Err(RecipeError::Validation(format!("Please provide {}", field)));
        }

        let created_by = auth
            .current_user()
            .ok_or_else(|| RecipeError::Validation("You must be signed in".to_string()))?;

        Ok(NewRecipe {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.trim().to_string(),
            image: self.image.clone().unwrap_or_default(),
            created_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuth;

    #[derive(Debug)]
    struct FakeUploader(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl ImageUploader for FakeUploader {
        async fn upload(&self, _path: &Path) -> Result<String> {
            match self.0 {
                Ok(url) => Ok(url.to_string()),
                Err(msg) => Err(RecipeError::Store(msg.to_string())),
            }
        }
    }

    fn complete_draft() -> RecipeDraft {
        let mut draft = RecipeDraft::new()
            .with_title(" Hoppers ")
            .with_category("BreakFast")
            .with_instructions("Ferment overnight.");
        draft.add_ingredient("Rice flour", "2 cups", "Rs. 120").unwrap();
        draft
    }

    #[test]
    fn test_add_ingredient_requires_all_fields() {
        let mut draft = RecipeDraft::new();
        let err = draft.add_ingredient("Salt", "", "1").unwrap_err();
        assert!(matches!(err, RecipeError::Validation(_)));
        assert!(draft.ingredients().is_empty());

        draft.add_ingredient("Salt", "1 tsp", "$0.25").unwrap();
        assert_eq!(draft.ingredients()[0], Ingredient::new("Salt", "1 tsp", 0.25));
    }

    #[test]
    fn test_remove_ingredient() {
        let mut draft = complete_draft();
        assert!(draft.remove_ingredient(5).is_none());
        assert_eq!(draft.remove_ingredient(0).unwrap().ingredient_name, "Rice flour");
        assert!(draft.ingredients().is_empty());
    }

    #[test]
    fn test_submit() {
        let recipe = complete_draft()
            .submit(&StaticAuth::signed_in("u1"))
            .unwrap();
        assert_eq!(recipe.title, "Hoppers");
        assert_eq!(recipe.created_by, "u1");
        assert_eq!(recipe.ingredients[0].ingredient_cost, 120.0);
        assert_eq!(recipe.image, "");
    }

    #[test]
    fn test_submit_validation() {
        let auth = StaticAuth::signed_in("u1");
        assert!(complete_draft().with_title("").submit(&auth).is_err());
        assert!(complete_draft().with_category(" ").submit(&auth).is_err());
        assert!(complete_draft().with_instructions("").submit(&auth).is_err());

        let mut no_ingredients = complete_draft();
        no_ingredients.remove_ingredient(0);
        assert!(no_ingredients.submit(&auth).is_err());

        let err = complete_draft()
            .submit(&StaticAuth::signed_out())
            .unwrap_err();
        assert!(matches!(err, RecipeError::Validation(_)));
    }

    #[tokio::test]
    async fn test_attach_image() {
        let mut draft = complete_draft();
        draft
            .attach_image(&FakeUploader(Ok("https://cdn/x.jpg")), Path::new("x.jpg"))
            .await
            .unwrap();
        assert_eq!(draft.image(), Some("https://cdn/x.jpg"));
        let recipe = draft.submit(&StaticAuth::signed_in("u1")).unwrap();
        assert_eq!(recipe.image, "https://cdn/x.jpg");
    }

    #[tokio::test]
    async fn test_attach_image_failures_are_upload_errors() {
        let mut draft = complete_draft();
        let err = draft
            .attach_image(&FakeUploader(Err("quota")), Path::new("x.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::Upload(_)));

        let err = draft
            .attach_image(&FakeUploader(Ok("http://insecure")), Path::new("x.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::Upload(_)));
        assert!(draft.image().is_none());
    }
}
