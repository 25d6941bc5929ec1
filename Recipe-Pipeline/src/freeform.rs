//! Parser for prose recipes of the form
//! `Ingredients: ... Instructions: ...`, as returned by the ingredient prompt.

/// Ingredient and instruction lines recovered from free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeformRecipe {
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

const BULLETS: &[char] = &['*', '•', '-', ' ', '\t'];

/// Split a prose recipe into ingredient and instruction lines.
///
/// Headers are matched case-insensitively with or without the plural `s`.
/// Ingredients run up to the instructions header and lose leading bullets;
/// instructions run to the end of the text and are only trimmed.
/// A missing section yields an empty list.
pub fn parse_freeform_recipe(text: &str) -> FreeformRecipe {
    let lower = text.to_ascii_lowercase();
    let ingredients_at = find_header(&lower, "ingredient");
    let instructions_at = find_header(&lower, "instruction");

    let ingredients = ingredients_at
        .map(|(_, body_start)| {
            let end = match instructions_at {
                Some((start, _)) if start > body_start => start,
                _ => text.len(),
            };
            &text[body_start..end]
        })
        .map(|body| {
            body.split(&['\n', ','][..])
                .map(|s| s.trim_start_matches(BULLETS).trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let instructions = instructions_at
        .map(|(_, body_start)| &text[body_start..])
        .map(|body| {
            body.lines()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    FreeformRecipe {
        ingredients,
        instructions,
    }
}

/// First `word:` or `words:` in `lower`, as (header start, body start).
fn find_header(lower: &str, word: &str) -> Option<(usize, usize)> {
    lower.match_indices(word).find_map(|(start, _)| {
        let rest = &lower[start + word.len()..];
        let skip = if rest.starts_with("s:") {
            2
        } else if rest.starts_with(':') {
            1
        } else {
            return None;
        };
        Some((start, start + word.len() + skip))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_sections() {
        let text = "Here is a recipe.\n\nIngredients:\n* 2 eggs\n* 1 cup flour, pinch of salt\n\nInstructions:\n1. Whisk eggs.\n2. Fold in flour.\n";
        let parsed = parse_freeform_recipe(text);
        assert_eq!(
            parsed.ingredients,
            vec!["2 eggs", "1 cup flour", "pinch of salt"]
        );
        assert_eq!(parsed.instructions, vec!["1. Whisk eggs.", "2. Fold in flour."]);
    }

    #[test]
    fn test_headers_case_insensitive_and_singular() {
        let parsed = parse_freeform_recipe("INGREDIENT: rice\ninstruction: boil");
        assert_eq!(parsed.ingredients, vec!["rice"]);
        assert_eq!(parsed.instructions, vec!["boil"]);
    }

    #[test]
    fn test_bullets_stripped() {
        let parsed = parse_freeform_recipe("Ingredients:\n• sugar\n- butter\n  * milk\nInstructions:\n- mix");
        assert_eq!(parsed.ingredients, vec!["sugar", "butter", "milk"]);
        assert_eq!(parsed.instructions, vec!["- mix"]);
    }

    #[test]
    fn test_instruction_lines_only_trimmed() {
        let parsed = parse_freeform_recipe("Ingredients:\n- rice\nInstructions:\n- Boil water\n  * Add rice  ");
        assert_eq!(parsed.ingredients, vec!["rice"]);
        assert_eq!(parsed.instructions, vec!["- Boil water", "* Add rice"]);
    }

    #[test]
    fn test_instructions_run_to_end_of_text() {
        let parsed = parse_freeform_recipe("Instructions:\nStir\nIngredients: oats");
        assert_eq!(parsed.instructions, vec!["Stir", "Ingredients: oats"]);
        assert_eq!(parsed.ingredients, vec!["oats"]);
    }

    #[test]
    fn test_missing_sections() {
        assert_eq!(parse_freeform_recipe("just chat"), FreeformRecipe::default());

        let only_steps = parse_freeform_recipe("Instructions:\nStir well");
        assert!(only_steps.ingredients.is_empty());
        assert_eq!(only_steps.instructions, vec!["Stir well"]);
    }

    #[test]
    fn test_word_without_colon_is_not_a_header() {
        let parsed = parse_freeform_recipe("The ingredients are simple.\nIngredients: oats");
        assert_eq!(parsed.ingredients, vec!["oats"]);
    }
}
