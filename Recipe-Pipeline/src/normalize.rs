//! Turn free-text LLM output into typed recipes.
//!
//! The model is asked for a bare JSON array but routinely answers with a
//! preamble, a ```` ```json ```` fence, string-only ingredient lists, or costs
//! like `"Rs. 45.00"`. Normalization is a pure function of the input text:
//!
//! 1. Trim and strip a leading ```` ```json ```` / ```` ``` ```` fence and a trailing ```` ``` ````
//! 2. Slice from the first `[` to the last `]`
//! 3. Parse the slice as JSON
//! 4. Coerce every element into a [`GeneratedRecipe`], defaulting missing fields
//!
//! Only steps 2 and 3 can fail. Missing or malformed fields never do.

use crate::error::{RecipeError, Result};
use crate::types::{
    GeneratedRecipe, Ingredient, RawIngredient, AI_GENERATED_CATEGORY, MISSING_INSTRUCTIONS,
    UNTITLED_RECIPE,
};
use serde_json::Value;
use uuid::Uuid;

/// Normalize a raw completion into recipes.
///
/// # Errors
///
/// Returns [`RecipeError::Parse`] when no bracketed array can be found or the
/// bracketed span is not valid JSON. No partial list is returned.
pub fn normalize_response(raw: &str) -> Result<Vec<GeneratedRecipe>> {
    let unfenced = strip_code_fences(raw);
    let slice = extract_json_array(unfenced)?;

    let parsed: Value = serde_json::from_str(slice).map_err(|e| {
        RecipeError::Parse(format!(
            "{} in: {}",
            e,
            slice.chars().take(200).collect::<String>()
        ))
    })?;

    let items = parsed
        .as_array()
        .ok_or_else(|| RecipeError::Parse("top-level value is not an array".to_string()))?;

    let recipes = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let recipe = normalize_recipe(idx, item);
            if recipe.is_none() {
                tracing::warn!(index = idx, "skipping non-object recipe entry");
            }
            recipe
        })
        .collect();

    Ok(recipes)
}

/// Strip one leading code fence (```` ```json ```` or bare ```` ``` ````) and one trailing fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        s = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }

    s.trim()
}

/// Slice `text` from its first `[` through its last `]`.
pub fn extract_json_array(text: &str) -> Result<&str> {
    let start = text
        .find('[')
        .ok_or_else(|| RecipeError::Parse("no '[' found in LLM output".to_string()))?;
    let end = text
        .rfind(']')
        .ok_or_else(|| RecipeError::Parse("no ']' found in LLM output".to_string()))?;

    if end < start {
        return Err(RecipeError::Parse(
            "closing ']' precedes opening '['".to_string(),
        ));
    }
    Ok(&text[start..=end])
}

/// Coerce one array element into a recipe; `None` for non-objects.
fn normalize_recipe(index: usize, item: &Value) -> Option<GeneratedRecipe> {
    let obj = item.as_object()?;

    let title = non_empty_str(obj.get("title"))
        .or_else(|| non_empty_str(obj.get("name")))
        .unwrap_or(UNTITLED_RECIPE)
        .to_string();

    let instructions = match obj.get("instructions") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Array(steps)) => {
            let joined = steps
                .iter()
                .filter_map(|s| s.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            if joined.is_empty() {
                MISSING_INSTRUCTIONS.to_string()
            } else {
                joined
            }
        }
        _ => MISSING_INSTRUCTIONS.to_string(),
    };

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => derived_id(index, &title),
    };

    Some(GeneratedRecipe {
        id,
        ingredients: obj
            .get("ingredients")
            .map(normalize_ingredients)
            .unwrap_or_default(),
        instructions,
        image: non_empty_str(obj.get("image")).map(str::to_string),
        category: AI_GENERATED_CATEGORY.to_string(),
        title,
    })
}

/// Ids for recipes the model left unnumbered are derived from position and
/// title, so normalizing the same text twice yields the same ids.
fn derived_id(index: usize, title: &str) -> String {
    let key = format!("{}:{}", index, title.trim().to_lowercase());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

/// Normalize an `ingredients` value of any shape.
///
/// Non-array values yield an empty list.
pub fn normalize_ingredients(value: &Value) -> Vec<Ingredient> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .filter_map(classify_ingredient)
            .map(Ingredient::from)
            .collect(),
        None => Vec::new(),
    }
}

/// Resolve the duck-typed ingredient entry into the tagged form.
pub fn classify_ingredient(value: &Value) -> Option<RawIngredient> {
    match value {
        Value::String(s) => Some(RawIngredient::Simple(s.trim().to_string())),
        Value::Number(n) => Some(RawIngredient::Simple(n.to_string())),
        Value::Object(obj) => Some(RawIngredient::Detailed {
            name: non_empty_str(obj.get("ingredientName"))
                .or_else(|| non_empty_str(obj.get("name")))
                .map(str::to_string),
            measurement: match obj.get("ingredientMeasurement") {
                Some(Value::Number(n)) => Some(n.to_string()),
                other => non_empty_str(other).map(str::to_string),
            },
            cost: obj.get("ingredientCost").map(parse_cost),
        }),
        _ => None,
    }
}

/// Parse a cost value, tolerating currency symbols and prose.
///
/// Numbers are used as-is. For strings, thousands separators are dropped and
/// every other character that is not a digit or `.` separates tokens; the
/// first token with a numeric prefix wins (`"Rs. 45.00"` → 45.0,
/// `"$3.50"` → 3.5). Anything else is 0.
pub fn parse_cost(value: &Value) -> f64 {
    let cost = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_cost_str(s),
        _ => 0.0,
    };
    if cost.is_finite() && cost > 0.0 {
        cost
    } else {
        0.0
    }
}

pub(crate) fn parse_cost_str(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',')
        .map(|c| if c.is_ascii_digit() || c == '.' { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .find_map(leading_number)
        .unwrap_or(0.0)
}

/// Longest `digits[.digits]` prefix of `token`, parsed.
fn leading_number(token: &str) -> Option<f64> {
    let mut seen_dot = false;
    let end = token
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' {
                if seen_dot {
                    return true;
                }
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map(|(i, _)| i)
        .unwrap_or(token.len());

    let prefix = token[..end].trim_end_matches('.');
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
