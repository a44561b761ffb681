//! Command-line surface for the menu photo-shoot pipeline.
//!
//! Reads menu text from a file argument (or stdin), runs one photo shoot,
//! logs progress events as they happen, and writes the resulting photos
//! into the output directory.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use menushot_core::data_url;
use menushot_core::dish::Dish;
use menushot_genai::api::GeminiApi;
use menushot_pipeline::driver::{PhotoPipeline, PipelineConfig};
use menushot_pipeline::events::DishEvent;

mod config;

use config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menushot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CliConfig::from_env();
    let menu_text = read_menu_text()?;

    let api = match &config.base_url {
        Some(url) => GeminiApi::with_base_url(config.api_key.as_str(), url.as_str()),
        None => GeminiApi::new(config.api_key.as_str()),
    };
    let pipeline = PhotoPipeline::with_config(
        Arc::new(api),
        PipelineConfig {
            inter_request_delay: config.inter_request_delay,
        },
    );

    let mut events = pipeline.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            log_event(&event);
        }
    });

    let run_result = pipeline.run_menu(&menu_text, config.style).await;

    if let Some(instruction) = &config.edit_instruction {
        let dishes = pipeline.board().snapshot().await;
        for dish in dishes.iter().filter(|d| d.has_original_image()) {
            pipeline.apply_edit(dish.id, instruction).await;
        }
    }

    progress.abort();

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "Photo shoot failed");
    }

    let dishes = pipeline.board().snapshot().await;
    let saved = save_photos(&dishes, &config.output_dir)?;
    summarize(&dishes, saved);

    run_result.map_err(Into::into)
}

/// Read the menu from the file given as the first argument, or stdin when
/// the argument is missing or `-`.
fn read_menu_text() -> anyhow::Result<String> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read menu file {path}")),
        _ => {
            let mut text = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut text)
                .context("Failed to read menu from stdin")?;
            Ok(text)
        }
    }
}

/// Translate a pipeline event into a log line.
fn log_event(event: &DishEvent) {
    match event {
        DishEvent::RunStarted => tracing::info!("Photo shoot started"),
        DishEvent::DishQueued { dish_id, name } => {
            tracing::info!(dish_id = %dish_id, dish = %name, "Generating photo");
        }
        DishEvent::DishCompleted { dish_id } => {
            tracing::info!(dish_id = %dish_id, "Photo generated");
        }
        DishEvent::DishFailed { dish_id, error } => {
            tracing::warn!(dish_id = %dish_id, error = %error, "Photo generation failed");
        }
        DishEvent::DishEdited { dish_id } => {
            tracing::info!(dish_id = %dish_id, "Edit applied");
        }
        DishEvent::DishEditFailed { dish_id } => {
            tracing::warn!(dish_id = %dish_id, "Edit failed");
        }
        DishEvent::RunFinished => tracing::info!("Photo shoot complete"),
    }
}

/// Decode and write each dish's current photo (the edited one when
/// present) into `output_dir`. Returns the number of files written.
fn save_photos(dishes: &[Dish], output_dir: &Path) -> anyhow::Result<usize> {
    let with_images: Vec<&Dish> = dishes.iter().filter(|d| d.has_original_image()).collect();
    if with_images.is_empty() {
        return Ok(0);
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let mut saved = 0;
    for dish in with_images {
        let image = dish.edited_image.as_deref().unwrap_or(&dish.original_image);
        let Some((mime_type, payload)) = data_url::split(image) else {
            tracing::warn!(dish = %dish.name, "Skipping malformed image payload");
            continue;
        };
        let bytes = match STANDARD.decode(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(dish = %dish.name, error = %e, "Skipping undecodable image payload");
                continue;
            }
        };

        let path = output_dir.join(format!("{}.{}", slug(&dish.name), extension_for(mime_type)));
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(dish = %dish.name, path = %path.display(), "Photo saved");
        saved += 1;
    }
    Ok(saved)
}

/// Per-dish closing summary.
fn summarize(dishes: &[Dish], saved: usize) {
    for dish in dishes {
        match &dish.error {
            Some(error) => tracing::warn!(dish = %dish.name, error = %error, "Dish failed"),
            None => {
                tracing::info!(dish = %dish.name, edited = dish.edited_image.is_some(), "Dish ready");
            }
        }
    }
    tracing::info!(dish_count = dishes.len(), saved, "Photo shoot finished");
}

/// File-name slug for a dish name.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// File extension for a reported media type.
fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "bin",
    }
}
