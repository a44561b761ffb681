//! Image editor.
//!
//! Requests an edited image from the backend given an inline source image
//! and a free-text instruction. The source is always the dish's original
//! generated image; edits are never chained. The invocation flow in
//! [`driver`](crate::driver) collapses every failure into
//! [`EDIT_FAILED_MESSAGE`] on the record.

use menushot_genai::api::GenAiError;
use menushot_genai::backend::{EditRequest, GenAiBackend, InlineImage};

use crate::IMAGE_EDITING_MODEL;

/// User-facing message for any edit failure.
pub const EDIT_FAILED_MESSAGE: &str = "Failed to apply edits.";

/// Request an edited image derived from the source payload.
pub async fn edit_image(
    backend: &dyn GenAiBackend,
    base64_data: &str,
    mime_type: &str,
    instruction: &str,
) -> Result<InlineImage, GenAiError> {
    backend
        .edit_image(EditRequest {
            model: IMAGE_EDITING_MODEL.to_string(),
            base64_data: base64_data.to_string(),
            mime_type: mime_type.to_string(),
            instruction: instruction.to_string(),
        })
        .await
}
