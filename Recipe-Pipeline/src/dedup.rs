//! Title-based deduplication.
//!
//! Two recipes are the same recipe when their titles match after trimming
//! and lowercasing, whatever their ids or origin.

use crate::types::Titled;
use std::collections::HashSet;

/// The deduplication key of a title; `None` for blank titles.
pub fn title_key(title: &str) -> Option<String> {
    let key = title.trim().to_lowercase();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Collect the keys of already-persisted titles.
pub fn title_keys<'a, I>(titles: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    titles.into_iter().filter_map(title_key).collect()
}

/// Keep candidates whose title is neither persisted nor repeated earlier in
/// the batch. Blank titles are dropped.
pub fn filter_new<T: Titled>(persisted: &HashSet<String>, candidates: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<String> = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| match title_key(c.title()) {
            Some(key) => !persisted.contains(&key) && seen.insert(key),
            None => false,
        })
        .collect()
}

/// Merge the in-memory AI recipes with persisted ones for the "All" view.
///
/// AI recipes come first, so on a title clash the AI copy is kept.
pub fn merge_all_view<T: Titled>(ai: Vec<T>, persisted: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<String> = HashSet::new();
    ai.into_iter()
        .chain(persisted)
        .filter(|r| title_key(r.title()).is_some_and(|key| seen.insert(key)))
        .collect()
}
