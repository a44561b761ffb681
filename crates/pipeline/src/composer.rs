//! Prompt composer.
//!
//! Asks the text backend for a single paragraph of photography direction
//! (lighting, composition, plating, background, garnish) tailored to the
//! dish and the style's hint text. The response is trimmed and otherwise
//! accepted as-is; backend errors propagate unmodified.

use menushot_core::style::PhotoStyle;
use menushot_genai::api::GenAiError;
use menushot_genai::backend::{GenAiBackend, TextRequest, TextResponseFormat};

use crate::MENU_PARSING_MODEL;

/// Compose a detailed image-synthesis prompt for a dish.
pub async fn compose_prompt(
    backend: &dyn GenAiBackend,
    dish_name: &str,
    style: PhotoStyle,
) -> Result<String, GenAiError> {
    let instruction = format!(
        "Create a detailed, high-end food photography prompt for an image generation \
         model. The dish is \"{dish_name}\". The desired aesthetic is \"{}\". The prompt \
         must describe lighting, composition, plating, background, and any garnishes to \
         create a hyper-realistic, appetizing image. Incorporate these style hints: {}. \
         The final output should ONLY be the prompt text itself, nothing else.",
        style.label(),
        style.prompt_hint(),
    );

    // The fast text model is good enough for prompt composition.
    let response = backend
        .generate_text(TextRequest {
            model: MENU_PARSING_MODEL.to_string(),
            prompt: instruction,
            format: TextResponseFormat::PlainText,
        })
        .await?;

    Ok(response.trim().to_string())
}
