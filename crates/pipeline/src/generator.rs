//! Image generation orchestrator.
//!
//! Composes a descriptive prompt, requests exactly one synthesized image,
//! and classifies per-dish failures into the human-readable messages
//! stored on dish records. Backend errors pass through with their typed
//! detail intact so classification can inspect the structured status.

use menushot_core::style::PhotoStyle;
use menushot_genai::api::{GenAiError, STATUS_RESOURCE_EXHAUSTED};
use menushot_genai::backend::{GenAiBackend, ImageRequest};

use crate::composer;
use crate::IMAGE_GENERATION_MODEL;

/// Fixed output media type for synthesized images.
pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// User-facing message for a rate-limited generation call.
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait and try again.";

/// A successfully synthesized photo.
#[derive(Debug, Clone)]
pub struct GeneratedPhoto {
    /// Base64-encoded image bytes.
    pub base64_image: String,
    /// Media type reported by the backend.
    pub mime_type: String,
    /// The composed prompt that produced the image.
    pub prompt: String,
}

/// Failures of a single dish's generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The backend reported zero images for the request.
    #[error("Image generation failed, no images returned.")]
    NoImages,

    /// Any other backend failure, preserved so callers can classify it.
    #[error(transparent)]
    Backend(#[from] GenAiError),
}

/// Generate one photograph for a dish.
pub async fn generate_image(
    backend: &dyn GenAiBackend,
    dish_name: &str,
    style: PhotoStyle,
) -> Result<GeneratedPhoto, GenerateError> {
    let prompt = composer::compose_prompt(backend, dish_name, style).await?;

    let images = backend
        .generate_images(ImageRequest {
            model: IMAGE_GENERATION_MODEL.to_string(),
            prompt: prompt.clone(),
            image_count: 1,
            output_mime_type: OUTPUT_MIME_TYPE.to_string(),
            aspect_ratio: style.aspect_ratio().to_string(),
        })
        .await?;

    let image = images.into_iter().next().ok_or(GenerateError::NoImages)?;

    Ok(GeneratedPhoto {
        base64_image: image.base64_data,
        mime_type: image.mime_type,
        prompt,
    })
}

/// Map a generation failure to the message stored on the dish record.
///
/// A structured `RESOURCE_EXHAUSTED` status yields the fixed rate-limit
/// message, any other API error yields its embedded message, and
/// everything else falls back to the error's own display text.
pub fn classify_generation_error(error: &GenerateError, dish_name: &str) -> String {
    match error {
        GenerateError::Backend(GenAiError::Api {
            status_code,
            message,
            ..
        }) => {
            if status_code.as_deref() == Some(STATUS_RESOURCE_EXHAUSTED) {
                RATE_LIMIT_MESSAGE.to_string()
            } else if message.is_empty() {
                format!("Failed to generate an image for {dish_name}.")
            } else {
                message.clone()
            }
        }
        other => {
            let text = other.to_string();
            if text.is_empty() {
                format!("Failed to generate an image for {dish_name}.")
            } else {
                text
            }
        }
    }
}
