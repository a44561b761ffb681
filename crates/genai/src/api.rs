//! HTTP client for the Gemini REST endpoints.
//!
//! Wraps the `generateContent` and `:predict` endpoints using [`reqwest`]
//! and implements the [`GenAiBackend`] seam. Authentication is a single
//! process-scoped API key sent as the `x-goog-api-key` header; there is no
//! rotation or refresh logic.

use async_trait::async_trait;

use crate::backend::{EditRequest, GenAiBackend, ImageRequest, InlineImage, TextRequest, TextResponseFormat};
use crate::messages::{
    ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, PredictInstance, PredictParameters, PredictRequest, PredictResponse, Schema,
};

/// Production endpoint for the Gemini REST API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Structured status reported by the backend when a quota is exhausted.
pub const STATUS_RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// Errors from the generative-AI backend layer.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code. `status_code` carries
    /// the backend's structured status (e.g. `RESOURCE_EXHAUSTED`) when the
    /// error body could be parsed; classification happens on that field,
    /// never by re-parsing display text.
    #[error("Backend API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Structured status from the error body, if present.
        status_code: Option<String>,
        /// Error message from the body, or the raw body text.
        message: String,
    },

    /// A 2xx response carried no text part where one was expected.
    #[error("No text returned in the response.")]
    MissingText,

    /// A 2xx response carried no inline image data where one was expected.
    #[error("No edited image data found in the response.")]
    MissingImageData,
}

/// Convert a non-2xx response body into a typed [`GenAiError::Api`].
///
/// The backend wraps failures as `{"error":{"message","status",...}}`;
/// bodies that do not parse keep their raw text as the message.
pub fn parse_error_body(status: u16, body: &str) -> GenAiError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => GenAiError::Api {
            status,
            status_code: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => GenAiError::Api {
            status,
            status_code: None,
            message: body.to_string(),
        },
    }
}

/// HTTP client for the Gemini generative-AI backend.
pub struct GeminiApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiApi {
    /// Create a client for the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a specific base URL (used to point tests or
    /// proxies at a different host).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Issue a `generateContent` call for a model.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Issue an image-synthesis `:predict` call for a model.
    async fn predict(
        &self,
        model: &str,
        request: &PredictRequest,
    ) -> Result<PredictResponse, GenAiError> {
        let response = self
            .client
            .post(format!("{}/models/{}:predict", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or the typed API error on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GenAiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(parse_error_body(status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenAiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GenAiBackend for GeminiApi {
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenAiError> {
        let generation_config = match request.format {
            TextResponseFormat::PlainText => None,
            TextResponseFormat::JsonStringArray => Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(Schema::string_array()),
                response_modalities: None,
            }),
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::Text {
                    text: request.prompt,
                }],
            }],
            generation_config,
        };

        let response = self.generate_content(&request.model, &body).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or(GenAiError::MissingText)
    }

    async fn generate_images(
        &self,
        request: ImageRequest,
    ) -> Result<Vec<InlineImage>, GenAiError> {
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.image_count,
                aspect_ratio: request.aspect_ratio,
                output_mime_type: request.output_mime_type,
            },
        };

        let response = self.predict(&request.model, &body).await?;
        Ok(response
            .predictions
            .into_iter()
            .map(|p| InlineImage {
                base64_data: p.bytes_base64_encoded,
                mime_type: p.mime_type,
            })
            .collect())
    }

    async fn edit_image(&self, request: EditRequest) -> Result<InlineImage, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type,
                            data: request.base64_data,
                        },
                    },
                    Part::Text {
                        text: request.instruction,
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(vec!["IMAGE".to_string()]),
            }),
        };

        let response = self.generate_content(&request.model, &body).await?;
        response
            .first_inline_data()
            .map(|inline| InlineImage {
                base64_data: inline.data.clone(),
                mime_type: inline.mime_type.clone(),
            })
            .ok_or(GenAiError::MissingImageData)
    }
}
