use crate::preferences::PreferenceRecord;

const RECIPE_SCHEMA: &str = r#"[
  {
    "title": "string",
    "ingredients": [
      { "ingredientName": "string", "ingredientMeasurement": "string", "ingredientCost": number }
    ],
    "instructions": "string"
  }
]"#;

/// Build the instruction asking the model for a strict JSON array of recipes.
pub fn build_recipe_prompt(prefs: &PreferenceRecord) -> String {
    let cuisines = prefs.cuisines.join(", ");

    [
        "You are a professional chef and meal planner.".to_string(),
        section(
            "Preferences",
            &format!(
                "Cuisines: {}\nDiet: {}\nMeals per day: {}",
                cuisines, prefs.diet, prefs.meals_per_day
            ),
        ),
        section(
            "Output format",
            &format!(
                "Respond with ONLY a JSON array of recipes matching this schema:\n{}\n\
                 ingredientCost is a plain number with no currency symbol.\n\
                 Do NOT wrap the array in markdown code fences. Do NOT add any text before or after the array.",
                RECIPE_SCHEMA
            ),
        ),
    ]
    .join("\n\n")
}

/// Prose prompt for the ingredient-driven generator.
pub fn build_ingredient_prompt(ingredients: &str) -> String {
    format!(
        "You are a helpful recipe assistant. Generate a clear, well-formatted recipe using the user's ingredients: {}\n\
         List the ingredients under an \"Ingredients:\" heading and the steps under an \"Instructions:\" heading.",
        ingredients.trim()
    )
}

/// Wrap text in a labeled section for structured prompts.
pub fn section(label: &str, content: &str) -> String {
    format!("## {}\n{}", label, content)
}
