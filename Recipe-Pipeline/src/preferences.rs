use serde::{Deserialize, Serialize};

/// The answers collected by the generation wizard.
///
/// Immutable once built; pass it to the generator by reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    /// Cuisines in the order the user selected them.
    pub cuisines: Vec<String>,
    pub diet: String,
    pub meals_per_day: String,
}

impl PreferenceRecord {
    pub fn collector() -> PreferenceCollector {
        PreferenceCollector::default()
    }
}

/// Accumulates wizard selections step by step.
///
/// Consumed by [`PreferenceCollector::finish`], so a new session always
/// starts from an empty record.
#[derive(Debug, Default)]
pub struct PreferenceCollector {
    record: PreferenceRecord,
}

impl PreferenceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a cuisine, or deselect it if it is already selected.
    ///
    /// Returns whether the cuisine is selected afterwards.
    pub fn toggle_cuisine(&mut self, cuisine: impl Into<String>) -> bool {
        let cuisine = cuisine.into();
        if let Some(pos) = self.record.cuisines.iter().position(|c| *c == cuisine) {
            self.record.cuisines.remove(pos);
            false
        } else {
            self.record.cuisines.push(cuisine);
            true
        }
    }

    pub fn diet(&mut self, diet: impl Into<String>) -> &mut Self {
        self.record.diet = diet.into();
        self
    }

    pub fn meals_per_day(&mut self, meals: impl Into<String>) -> &mut Self {
        self.record.meals_per_day = meals.into();
        self
    }

    pub fn selected_cuisines(&self) -> &[String] {
        &self.record.cuisines
    }

    pub fn finish(self) -> PreferenceRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_keeps_selection_order() {
        let mut c = PreferenceCollector::new();
        assert!(c.toggle_cuisine("Italian"));
        assert!(c.toggle_cuisine("Chinese"));
        assert!(c.toggle_cuisine("Mexican"));
        assert!(!c.toggle_cuisine("Chinese"));
        assert_eq!(c.selected_cuisines(), &["Italian", "Mexican"]);

        assert!(c.toggle_cuisine("Chinese"));
        assert_eq!(c.selected_cuisines(), &["Italian", "Mexican", "Chinese"]);
    }

    #[test]
    fn test_finish_builds_record() {
        let mut c = PreferenceRecord::collector();
        c.toggle_cuisine("Sri Lankan");
        c.diet("Vegan").meals_per_day("All three");
        let record = c.finish();
        assert_eq!(record.cuisines, vec!["Sri Lankan"]);
        assert_eq!(record.diet, "Vegan");
        assert_eq!(record.meals_per_day, "All three");
    }

    #[test]
    fn test_later_answers_overwrite() {
        let mut c = PreferenceCollector::new();
        c.diet("Keto").diet("Halal");
        assert_eq!(c.finish().diet, "Halal");
    }
}
