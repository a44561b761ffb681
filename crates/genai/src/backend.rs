//! Backend seam for the generative-AI service.
//!
//! The pipeline is written against [`GenAiBackend`] rather than the
//! concrete HTTP client, so tests can substitute the scripted
//! [`MockBackend`](crate::mock::MockBackend). Requests and responses are
//! neutral structs; the Gemini wire shapes live in
//! [`messages`](crate::messages).

use async_trait::async_trait;

use crate::api::GenAiError;

/// Response-format constraint for a text generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextResponseFormat {
    /// Free-form plain text.
    PlainText,
    /// A JSON array of plain strings.
    JsonStringArray,
}

/// A text generation request.
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub model: String,
    pub prompt: String,
    pub format: TextResponseFormat,
}

/// An image synthesis request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    /// Number of images to synthesize. The pipeline always asks for one.
    pub image_count: u32,
    /// Requested output media type, e.g. `image/jpeg`.
    pub output_mime_type: String,
    /// Aspect ratio label, e.g. `4:3`.
    pub aspect_ratio: String,
}

/// An image-conditioned edit request.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub model: String,
    /// Raw base64 payload of the source image, without any data-URL tag.
    pub base64_data: String,
    /// Media type of the source image.
    pub mime_type: String,
    /// Free-text editing instruction.
    pub instruction: String,
}

/// One synthesized or edited image payload as reported by the backend.
#[derive(Debug, Clone)]
pub struct InlineImage {
    /// Base64-encoded image bytes.
    pub base64_data: String,
    /// Media type reported by the backend.
    pub mime_type: String,
}

/// The three backend calls the system depends on.
///
/// Implemented by [`GeminiApi`](crate::api::GeminiApi) over HTTPS and by
/// [`MockBackend`](crate::mock::MockBackend) in tests.
#[async_trait]
pub trait GenAiBackend: Send + Sync {
    /// Generate text from an instruction, optionally constrained to a
    /// structured response format.
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenAiError>;

    /// Synthesize images from a prompt. May legitimately return an empty
    /// list; callers decide whether that is an error.
    async fn generate_images(&self, request: ImageRequest)
        -> Result<Vec<InlineImage>, GenAiError>;

    /// Produce an edited image from an inline source image and a text
    /// instruction.
    async fn edit_image(&self, request: EditRequest) -> Result<InlineImage, GenAiError>;
}
