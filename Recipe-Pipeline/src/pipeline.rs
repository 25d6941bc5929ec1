use crate::auth::AuthSession;
use crate::backfill::{backfill_images, BackfillReport, Backfillable, ImageSource};
use crate::client::CompletionProvider;
use crate::config::BackfillConfig;
use crate::dedup::{filter_new, title_keys};
use crate::error::{RecipeError, Result};
use crate::normalize::normalize_response;
use crate::preferences::PreferenceRecord;
use crate::prompt::build_recipe_prompt;
use crate::recipes::RecipeRepository;
use crate::types::GeneratedRecipe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Where a generation run currently is.
///
/// `Done` and `Failed` are terminal; a failed run is never retried
/// automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Requesting,
    Normalizing,
    Persisting,
    Done,
    Failed,
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Done | GenerationState::Failed)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Newly generated recipes, with images filled in.
    pub recipes: Vec<GeneratedRecipe>,
    /// Store ids, parallel to `recipes`.
    pub persisted_ids: Vec<String>,
    /// Recipes dropped because their title already existed.
    pub skipped_duplicates: usize,
    pub images: BackfillReport,
}

/// Runs one preference record through prompt, completion, normalization,
/// deduplication, image backfill and persistence.
///
/// Only one run may be in flight per generator; a second call while one is
/// running fails with [`RecipeError::AlreadyInFlight`].
#[derive(Debug)]
pub struct RecipeGenerator {
    provider: Arc<dyn CompletionProvider>,
    repository: RecipeRepository,
    auth: Arc<dyn AuthSession>,
    images: Option<Arc<dyn ImageSource>>,
    backfill: BackfillConfig,
    cancel: CancellationToken,
    current_run: Mutex<Option<CancellationToken>>,
    in_flight: AtomicBool,
    state: Mutex<GenerationState>,
}

/// Clears the in-flight flag when a run ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl RecipeGenerator {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        repository: RecipeRepository,
        auth: Arc<dyn AuthSession>,
    ) -> Self {
        Self {
            provider,
            repository,
            auth,
            images: None,
            backfill: BackfillConfig::default(),
            cancel: CancellationToken::new(),
            current_run: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            state: Mutex::new(GenerationState::Idle),
        }
    }

    /// Look up images for recipes that lack one. Without a source every such
    /// recipe gets the placeholder.
    pub fn with_image_source(mut self, source: Arc<dyn ImageSource>) -> Self {
        self.images = Some(source);
        self
    }

    pub fn with_backfill_config(mut self, config: BackfillConfig) -> Self {
        self.backfill = config;
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token for the generator's whole lifetime.
    ///
    /// Cancelling it stops the current run and makes every later run fail
    /// with [`RecipeError::Cancelled`]; tie it to the owning screen. To stop
    /// only the run in progress use [`RecipeGenerator::cancel_current`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel the run in progress, if any. Later runs are unaffected.
    ///
    /// Pending image lookups fall back to the placeholder; a run that has not
    /// started persisting fails with [`RecipeError::Cancelled`].
    pub fn cancel_current(&self) {
        if let Ok(current) = self.current_run.lock() {
            if let Some(token) = current.as_ref() {
                token.cancel();
            }
        }
    }

    pub fn repository(&self) -> &RecipeRepository {
        &self.repository
    }

    /// State of the most recent run.
    pub fn state(&self) -> GenerationState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(GenerationState::Failed)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn generate(&self, prefs: &PreferenceRecord) -> Result<GenerationReport> {
        self.generate_with_progress(prefs, |_| {}).await
    }

    /// Generate recipes, reporting every state transition to `on_state`.
    pub async fn generate_with_progress<F>(
        &self,
        prefs: &PreferenceRecord,
        mut on_state: F,
    ) -> Result<GenerationReport>
    where
        F: FnMut(GenerationState),
    {
        let _guard = self.acquire()?;

        let run_token = self.cancel.child_token();
        self.set_current_run(Some(run_token.clone()));
        let result = self.run(prefs, &run_token, &mut on_state).await;
        self.set_current_run(None);

        match &result {
            Ok(report) => {
                tracing::info!(
                    saved = report.persisted_ids.len(),
                    skipped = report.skipped_duplicates,
                    "generation finished"
                );
                self.transition(GenerationState::Done, &mut on_state);
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                self.transition(GenerationState::Failed, &mut on_state);
            }
        }
        result
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| RecipeError::AlreadyInFlight)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    fn transition<F: FnMut(GenerationState)>(&self, next: GenerationState, on_state: &mut F) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
        tracing::debug!(state = ?next, "generation state");
        on_state(next);
    }

    fn set_current_run(&self, token: Option<CancellationToken>) {
        if let Ok(mut current) = self.current_run.lock() {
            *current = token;
        }
    }

    fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(RecipeError::Cancelled);
        }
        Ok(())
    }

    async fn run<F: FnMut(GenerationState)>(
        &self,
        prefs: &PreferenceRecord,
        cancel: &CancellationToken,
        on_state: &mut F,
    ) -> Result<GenerationReport> {
        Self::check_cancelled(cancel)?;
        self.transition(GenerationState::Requesting, on_state);
        let prompt = build_recipe_prompt(prefs);
        let raw = self.provider.complete(&prompt).await?;

        self.transition(GenerationState::Normalizing, on_state);
        let recipes = normalize_response(&raw)?;
        tracing::info!(count = recipes.len(), model = self.provider.model_name(), "normalized recipes");

        Self::check_cancelled(cancel)?;
        self.transition(GenerationState::Persisting, on_state);
        let titles = self.repository.persisted_titles().await.map_err(into_store_error)?;
        let persisted = title_keys(titles.iter().map(String::as_str));

        let total = recipes.len();
        let mut fresh = filter_new(&persisted, recipes);
        let skipped_duplicates = total - fresh.len();
        if skipped_duplicates > 0 {
            tracing::info!(skipped = skipped_duplicates, "skipping recipes already saved");
        }

        let images = match &self.images {
            Some(source) => {
                backfill_images(&mut fresh, source.as_ref(), &self.backfill, cancel).await
            }
            None => {
                let mut report = BackfillReport::default();
                for recipe in fresh.iter_mut() {
                    if recipe.needs_image() {
                        recipe.set_image(self.backfill.placeholder_url.clone());
                        report.fallback += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                report
            }
        };

        let created_by = self.auth.current_user();
        let mut persisted_ids = Vec::with_capacity(fresh.len());
        for recipe in &fresh {
            match self
                .repository
                .save_generated(recipe, created_by.as_deref())
                .await
            {
                Ok(id) => persisted_ids.push(id),
                Err(e) => {
                    tracing::error!(title = %recipe.title, error = %e, "failed to save recipe");
                    return Err(into_store_error(e));
                }
            }
        }

        Ok(GenerationReport {
            recipes: fresh,
            persisted_ids,
            skipped_duplicates,
            images,
        })
    }
}

fn into_store_error(e: RecipeError) -> RecipeError {
    match e {
        RecipeError::Store(_) => e,
        other => RecipeError::Store(other.to_string()),
    }
}
