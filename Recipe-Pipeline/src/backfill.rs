//! Best-effort image backfill for recipes without a picture.
//!
//! Lookups for a batch run concurrently and are joined before returning.
//! Each lookup is bounded by [`BackfillConfig::task_timeout`] and observes a
//! [`CancellationToken`]; any failure degrades to the placeholder image and
//! never to an error.

use crate::config::BackfillConfig;
use crate::error::Result;
use crate::types::{GeneratedRecipe, StoredRecipe, Titled};
use async_trait::async_trait;
use futures::future::join_all;
use image_search::ImageSearchClient;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Something that can find an image URL for a search term.
#[async_trait]
pub trait ImageSource: Send + Sync + fmt::Debug {
    /// First matching image URL, `None` when nothing matched.
    async fn find_image(&self, term: &str) -> Result<Option<String>>;
}

#[async_trait]
impl ImageSource for ImageSearchClient {
    async fn find_image(&self, term: &str) -> Result<Option<String>> {
        Ok(self.first_image(term).await?)
    }
}

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Found(String),
    /// Lookup failed, timed out, was cancelled or found nothing.
    Fallback,
}

impl ImageOutcome {
    /// The URL to display, substituting `placeholder` on fallback.
    pub fn into_url(self, placeholder: &str) -> String {
        match self {
            ImageOutcome::Found(url) => url,
            ImageOutcome::Fallback => placeholder.to_string(),
        }
    }
}

/// Recipes whose image can be backfilled.
pub trait Backfillable: Titled {
    fn needs_image(&self) -> bool;
    fn set_image(&mut self, url: String);
}

impl Backfillable for GeneratedRecipe {
    fn needs_image(&self) -> bool {
        !self.has_image()
    }

    fn set_image(&mut self, url: String) {
        self.image = Some(url);
    }
}

impl Backfillable for StoredRecipe {
    fn needs_image(&self) -> bool {
        self.image.trim().is_empty()
    }

    fn set_image(&mut self, url: String) {
        self.image = url;
    }
}

/// Counts from one backfill batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub found: usize,
    pub fallback: usize,
    /// Recipes that already had an image.
    pub skipped: usize,
}

/// Search term for a title: the trimmed title, or the configured fallback.
pub fn search_term(title: &str, config: &BackfillConfig) -> String {
    let title = title.trim();
    if title.is_empty() {
        config.fallback_term.clone()
    } else {
        title.to_string()
    }
}

/// Look up one image, never failing.
pub async fn lookup_image(
    source: &dyn ImageSource,
    term: &str,
    config: &BackfillConfig,
    cancel: &CancellationToken,
) -> ImageOutcome {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            tracing::debug!(term, "image lookup cancelled");
            ImageOutcome::Fallback
        }
        res = tokio::time::timeout(config.task_timeout, source.find_image(term)) => match res {
            Ok(Ok(Some(url))) if !url.trim().is_empty() => ImageOutcome::Found(url),
            Ok(Ok(_)) => {
                tracing::debug!(term, "no image found");
                ImageOutcome::Fallback
            }
            Ok(Err(e)) => {
                tracing::warn!(term, error = %e, "image lookup failed");
                ImageOutcome::Fallback
            }
            Err(_) => {
                tracing::warn!(term, timeout = ?config.task_timeout, "image lookup timed out");
                ImageOutcome::Fallback
            }
        }
    }
}

/// Fill in images for every recipe lacking one.
///
/// Recipes with an image issue no request. Afterwards every recipe has a
/// non-empty image: a found URL or the placeholder.
pub async fn backfill_images<R: Backfillable>(
    recipes: &mut [R],
    source: &dyn ImageSource,
    config: &BackfillConfig,
    cancel: &CancellationToken,
) -> BackfillReport {
    let pending: Vec<(usize, String)> = recipes
        .iter()
        .enumerate()
        .filter(|(_, r)| r.needs_image())
        .map(|(i, r)| (i, search_term(r.title(), config)))
        .collect();

    let mut report = BackfillReport {
        skipped: recipes.len() - pending.len(),
        ..Default::default()
    };
    if pending.is_empty() {
        return report;
    }

    let outcomes = join_all(
        pending
            .iter()
            .map(|(_, term)| lookup_image(source, term, config, cancel)),
    )
    .await;

    for ((idx, _), outcome) in pending.into_iter().zip(outcomes) {
        match &outcome {
            ImageOutcome::Found(_) => report.found += 1,
            ImageOutcome::Fallback => report.fallback += 1,
        }
        recipes[idx].set_image(outcome.into_url(&config.placeholder_url));
    }

    tracing::info!(
        found = report.found,
        fallback = report.fallback,
        skipped = report.skipped,
        "image backfill finished"
    );
    report
}
