use image_search::{ImageSearchClient, ImageSearchConfig};
use recipe_pipeline::{
    ChatCompletionClient, CompletionConfig, CompletionProvider, FakeProvider, MemoryStore,
    PreferenceRecord, RecipeGenerator, RecipeRepository, StaticAuth,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const OFFLINE_RESPONSE: &str = r#"```json
[
  {"title": "Vegetable Kottu", "ingredients": [{"ingredientName": "Godamba roti", "ingredientMeasurement": "3 pieces", "ingredientCost": "Rs. 150"}, "Leeks", "Carrot"], "instructions": "Chop the roti. Stir-fry with vegetables."},
  {"title": "Dhal Curry", "ingredients": [{"ingredientName": "Red lentils", "ingredientMeasurement": "1 cup", "ingredientCost": 120}], "instructions": "Simmer lentils with coconut milk and spices."}
]
```"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Use the real endpoint when GROQ_API_KEY is set, otherwise a canned reply.
    let provider: Arc<dyn CompletionProvider> = match CompletionConfig::from_env() {
        Ok(config) => Arc::new(ChatCompletionClient::new(config)?),
        Err(_) => {
            println!("GROQ_API_KEY not set, using an offline response.");
            Arc::new(FakeProvider::new().with_default_response(OFFLINE_RESPONSE))
        }
    };

    let repository = RecipeRepository::new(Arc::new(MemoryStore::new()));
    let mut generator = RecipeGenerator::new(
        provider,
        repository.clone(),
        Arc::new(StaticAuth::signed_in("demo-user")),
    );
    if let Ok(config) = ImageSearchConfig::from_env() {
        generator = generator.with_image_source(Arc::new(ImageSearchClient::new(config)));
    }

    let mut prefs = PreferenceRecord::collector();
    prefs.toggle_cuisine("Sri Lankan");
    prefs.diet("Vegetarian").meals_per_day("3");

    let report = generator
        .generate_with_progress(&prefs.finish(), |state| println!("[{:?}]", state))
        .await?;

    println!(
        "\nSaved {} recipes ({} duplicates skipped):",
        report.persisted_ids.len(),
        report.skipped_duplicates
    );
    for recipe in &report.recipes {
        println!("\n{} (total {:.2})", recipe.title, recipe.total_cost());
        for ing in &recipe.ingredients {
            println!(
                "  - {} ({}) {:.2}",
                ing.ingredient_name, ing.ingredient_measurement, ing.ingredient_cost
            );
        }
        println!("  image: {}", recipe.image.as_deref().unwrap_or_default());
        println!("  {}", recipe.instructions);
    }

    println!("\nStore now holds {} recipes.", repository.list_recipes().await?.len());
    Ok(())
}
