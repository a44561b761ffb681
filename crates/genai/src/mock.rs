//! Scripted in-memory backend for tests.
//!
//! [`MockBackend`] records every call together with the [`Instant`] it was
//! issued, which lets pipeline tests assert request spacing under a paused
//! tokio clock. Responses are popped from per-call FIFO scripts; when a
//! script is empty a canned success is returned, so tests only script the
//! calls they care about. A scripted entry may carry an artificial latency
//! to model a slow backend call.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::api::GenAiError;
use crate::backend::{EditRequest, GenAiBackend, ImageRequest, InlineImage, TextRequest};

/// A backend call recorded by the mock, with its issue instant.
#[derive(Debug, Clone)]
pub enum RecordedCall {
    Text { at: Instant, request: TextRequest },
    Images { at: Instant, request: ImageRequest },
    Edit { at: Instant, request: EditRequest },
}

struct Scripted<T> {
    latency: Option<Duration>,
    result: Result<T, GenAiError>,
}

/// Scripted implementation of [`GenAiBackend`].
#[derive(Default)]
pub struct MockBackend {
    text_script: Mutex<VecDeque<Scripted<String>>>,
    image_script: Mutex<VecDeque<Scripted<Vec<InlineImage>>>>,
    edit_script: Mutex<VecDeque<Scripted<InlineImage>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Canned base64 payload returned by un-scripted image calls.
pub const DEFAULT_IMAGE_DATA: &str = "Zm9vZA==";

/// Canned base64 payload returned by un-scripted edit calls.
pub const DEFAULT_EDIT_DATA: &str = "ZWRpdGVk";

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next text response.
    pub fn push_text(&self, result: Result<String, GenAiError>) {
        self.text_script.lock().unwrap().push_back(Scripted {
            latency: None,
            result,
        });
    }

    /// Script the next image-synthesis response.
    pub fn push_images(&self, result: Result<Vec<InlineImage>, GenAiError>) {
        self.image_script.lock().unwrap().push_back(Scripted {
            latency: None,
            result,
        });
    }

    /// Script the next image-synthesis response, delivered after an
    /// artificial latency.
    pub fn push_images_after(&self, latency: Duration, result: Result<Vec<InlineImage>, GenAiError>) {
        self.image_script.lock().unwrap().push_back(Scripted {
            latency: Some(latency),
            result,
        });
    }

    /// Script the next edit response.
    pub fn push_edit(&self, result: Result<InlineImage, GenAiError>) {
        self.edit_script.lock().unwrap().push_back(Scripted {
            latency: None,
            result,
        });
    }

    /// Every call issued so far, in issue order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Issue instants of the image-synthesis calls, in issue order.
    pub fn image_call_instants(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::Images { at, .. } => Some(at),
                _ => None,
            })
            .collect()
    }

    /// The edit requests issued so far, in issue order.
    pub fn edit_requests(&self) -> Vec<EditRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::Edit { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GenAiBackend for MockBackend {
    async fn generate_text(&self, request: TextRequest) -> Result<String, GenAiError> {
        self.record(RecordedCall::Text {
            at: Instant::now(),
            request,
        });
        let scripted = self.text_script.lock().unwrap().pop_front();
        match scripted {
            Some(s) => {
                if let Some(latency) = s.latency {
                    tokio::time::sleep(latency).await;
                }
                s.result
            }
            None => Ok("A hyper-realistic plated dish under studio lighting.".to_string()),
        }
    }

    async fn generate_images(
        &self,
        request: ImageRequest,
    ) -> Result<Vec<InlineImage>, GenAiError> {
        self.record(RecordedCall::Images {
            at: Instant::now(),
            request,
        });
        let scripted = self.image_script.lock().unwrap().pop_front();
        match scripted {
            Some(s) => {
                if let Some(latency) = s.latency {
                    tokio::time::sleep(latency).await;
                }
                s.result
            }
            None => Ok(vec![InlineImage {
                base64_data: DEFAULT_IMAGE_DATA.to_string(),
                mime_type: "image/jpeg".to_string(),
            }]),
        }
    }

    async fn edit_image(&self, request: EditRequest) -> Result<InlineImage, GenAiError> {
        self.record(RecordedCall::Edit {
            at: Instant::now(),
            request,
        });
        let scripted = self.edit_script.lock().unwrap().pop_front();
        match scripted {
            Some(s) => {
                if let Some(latency) = s.latency {
                    tokio::time::sleep(latency).await;
                }
                s.result
            }
            None => Ok(InlineImage {
                base64_data: DEFAULT_EDIT_DATA.to_string(),
                mime_type: "image/jpeg".to_string(),
            }),
        }
    }
}
