//! Photo-shoot pipeline driver.
//!
//! [`PhotoPipeline`] owns the dish board and the backend handle and runs
//! the sequential generation loop: parse once, then publish a placeholder
//! and issue one generation request per dish, spacing request issuance by
//! a fixed delay. The delay throttles the backend's rate limit; it is not
//! a completion barrier, so a dish's call may still be pending while the
//! next dish's delay elapses. Each dish's outcome is recorded on its own
//! record and never affects siblings.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use menushot_core::board::DishBoard;
use menushot_core::data_url;
use menushot_core::dish::Dish;
use menushot_core::style::PhotoStyle;
use menushot_core::types::DishId;
use menushot_genai::backend::GenAiBackend;

use crate::events::{DishEvent, EVENT_CHANNEL_CAPACITY};
use crate::{editor, generator, parser};

/// Fixed spacing between generation requests. A deliberate throttle
/// against backend rate limits, not an adaptive backoff.
pub const DEFAULT_INTER_REQUEST_DELAY: Duration = Duration::from_secs(10);

/// Tunables for a photo-shoot run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delay inserted before every dish except the first. Paces request
    /// issuance only.
    pub inter_request_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inter_request_delay: DEFAULT_INTER_REQUEST_DELAY,
        }
    }
}

/// Run-level failures. Everything downstream of a successful parse is
/// isolated to individual dish records instead of failing the run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The menu input was empty or whitespace-only. No backend contacted.
    #[error("Please enter your menu.")]
    EmptyMenu,

    /// The parse phase failed; no dish list is shown.
    #[error(transparent)]
    Parse(#[from] parser::MenuParseError),

    /// The parser returned zero dishes for non-empty input.
    #[error("Could not parse any dishes from the menu. Please check the format.")]
    NoDishes,
}

/// Drives photo-shoot runs and post-hoc edits over a shared dish board.
pub struct PhotoPipeline {
    backend: Arc<dyn GenAiBackend>,
    board: Arc<DishBoard>,
    events: broadcast::Sender<DishEvent>,
    config: PipelineConfig,
    running: AtomicBool,
}

impl PhotoPipeline {
    /// Create a pipeline with the default configuration.
    pub fn new(backend: Arc<dyn GenAiBackend>) -> Self {
        Self::with_config(backend, PipelineConfig::default())
    }

    /// Create a pipeline with explicit tunables.
    pub fn with_config(backend: Arc<dyn GenAiBackend>, config: PipelineConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            board: Arc::new(DishBoard::new()),
            events,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Shared handle to the dish board.
    pub fn board(&self) -> Arc<DishBoard> {
        Arc::clone(&self.board)
    }

    /// Subscribe to progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<DishEvent> {
        self.events.subscribe()
    }

    /// Whether a run is currently underway.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run a full photo shoot over the given menu text.
    ///
    /// Clears all records from any previous run before starting. Returns
    /// `Err` only for run-level failures (empty input, parse failure, zero
    /// dishes); per-dish failures are recorded on the dish records.
    pub async fn run_menu(&self, menu_text: &str, style: PhotoStyle) -> Result<(), RunError> {
        if menu_text.trim().is_empty() {
            return Err(RunError::EmptyMenu);
        }

        self.running.store(true, Ordering::SeqCst);
        self.board.reset().await;
        self.publish(DishEvent::RunStarted);

        let names = match parser::parse_menu(self.backend.as_ref(), menu_text).await {
            Ok(names) => names,
            Err(e) => {
                self.finish_run();
                return Err(e.into());
            }
        };

        if names.is_empty() {
            self.finish_run();
            return Err(RunError::NoDishes);
        }

        tracing::info!(
            dish_count = names.len(),
            style = style.label(),
            "Menu parsed, starting photo shoot",
        );

        let mut tasks = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.inter_request_delay).await;
            }

            let dish_id = DishId::new_v4();
            self.board.push(Dish::placeholder(dish_id, name.clone())).await;
            self.publish(DishEvent::DishQueued {
                dish_id,
                name: name.clone(),
            });

            let backend = Arc::clone(&self.backend);
            let board = Arc::clone(&self.board);
            let events = self.events.clone();
            tasks.push(tokio::spawn(async move {
                generate_one(backend, board, events, dish_id, name, style).await;
            }));
        }

        // Every dish records its outcome before the run counts as done.
        let _ = futures::future::join_all(tasks).await;
        self.finish_run();
        Ok(())
    }

    /// Apply a free-text edit to a dish's photo.
    ///
    /// Silently no-ops when the dish is unknown or has no generated image
    /// yet. The edit always derives from the original image, never from a
    /// previous edit; on failure the generic edit message lands on the
    /// record. Edits are independent of the generation loop and of each
    /// other; concurrent edits on one record race and the last write wins.
    pub async fn apply_edit(&self, dish_id: DishId, instruction: &str) {
        let Some(dish) = self.board.get(dish_id).await else {
            tracing::debug!(dish_id = %dish_id, "Edit requested for unknown dish");
            return;
        };
        if !dish.has_original_image() {
            tracing::debug!(dish_id = %dish_id, "Edit requested before an image exists");
            return;
        }

        self.board.update(dish_id, Dish::begin_edit).await;

        let base64_data = match data_url::split(&dish.original_image) {
            Some((_, payload)) => payload.to_string(),
            None => dish.original_image.clone(),
        };

        match editor::edit_image(
            self.backend.as_ref(),
            &base64_data,
            &dish.mime_type,
            instruction,
        )
        .await
        {
            Ok(image) => {
                self.board
                    .update(dish_id, |d| {
                        d.finish_edit(&image.base64_data, &image.mime_type)
                    })
                    .await;
                tracing::info!(dish_id = %dish_id, dish = %dish.name, "Edit applied");
                self.publish(DishEvent::DishEdited { dish_id });
            }
            Err(e) => {
                tracing::error!(dish_id = %dish_id, dish = %dish.name, error = %e, "Edit failed");
                self.board
                    .update(dish_id, |d| d.fail_edit(editor::EDIT_FAILED_MESSAGE))
                    .await;
                self.publish(DishEvent::DishEditFailed { dish_id });
            }
        }
    }

    fn finish_run(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.publish(DishEvent::RunFinished);
    }

    fn publish(&self, event: DishEvent) {
        // Zero receivers only means nobody is watching right now.
        let _ = self.events.send(event);
    }
}

/// Generate one dish's photo and record the outcome on its record.
async fn generate_one(
    backend: Arc<dyn GenAiBackend>,
    board: Arc<DishBoard>,
    events: broadcast::Sender<DishEvent>,
    dish_id: DishId,
    name: String,
    style: PhotoStyle,
) {
    match generator::generate_image(backend.as_ref(), &name, style).await {
        Ok(photo) => {
            board
                .update(dish_id, |d| {
                    d.finish_generation(&photo.base64_image, &photo.mime_type, &photo.prompt)
                })
                .await;
            tracing::info!(dish_id = %dish_id, dish = %name, "Dish photo generated");
            let _ = events.send(DishEvent::DishCompleted { dish_id });
        }
        Err(e) => {
            let message = generator::classify_generation_error(&e, &name);
            tracing::error!(dish_id = %dish_id, dish = %name, error = %e, "Dish photo generation failed");
            board
                .update(dish_id, |d| d.fail_generation(message.clone()))
                .await;
            let _ = events.send(DishEvent::DishFailed {
                dish_id,
                error: message,
            });
        }
    }
}
