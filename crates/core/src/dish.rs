//! The dish record and its lifecycle transitions.
//!
//! A [`Dish`] is created as a generating placeholder when its name is
//! parsed from the menu, mutated in place as generation and editing
//! progress, and only ever destroyed by a wholesale board reset at the
//! start of the next run.

use chrono::Utc;
use serde::Serialize;

use crate::data_url;
use crate::types::{DishId, Timestamp};

/// One parsed menu dish and the state of its photo.
///
/// Generation-phase invariant: at most one of `is_generating`, a non-empty
/// `original_image`, or a set `error` is active at any time. Editing state
/// is orthogonal and is only ever set while `original_image` is non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct Dish {
    /// Process-unique id, stable for the record's lifetime.
    pub id: DishId,
    /// Dish name as returned by the parser. Immutable after creation.
    pub name: String,
    /// Prompt text used for image synthesis; empty until generation succeeds.
    pub image_prompt: String,
    /// Data-URL payload of the first successful generation; empty before that.
    pub original_image: String,
    /// Data-URL payload of the most recent successful edit, if any.
    /// Each successful edit overwrites the previous one.
    pub edited_image: Option<String>,
    /// Media type of the original generated image.
    pub mime_type: String,
    /// Generation call in flight.
    pub is_generating: bool,
    /// Edit call in flight.
    pub is_editing: bool,
    /// Human-readable failure description; cleared only by a full reset.
    pub error: Option<String>,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl Dish {
    /// Create a placeholder record in the generating state.
    pub fn placeholder(id: DishId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_prompt: String::new(),
            original_image: String::new(),
            edited_image: None,
            mime_type: String::new(),
            is_generating: true,
            is_editing: false,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Record a successful generation: store the image as a data URL along
    /// with the prompt that produced it, and clear the in-flight flag.
    pub fn finish_generation(&mut self, base64_image: &str, mime_type: &str, prompt: &str) {
        self.original_image = data_url::compose(mime_type, base64_image);
        self.image_prompt = prompt.to_string();
        self.mime_type = mime_type.to_string();
        self.is_generating = false;
    }

    /// Record a generation failure and clear the in-flight flag.
    pub fn fail_generation(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.is_generating = false;
    }

    /// Whether the record holds a generated image that edits can derive from.
    pub fn has_original_image(&self) -> bool {
        !self.original_image.is_empty()
    }

    /// Mark an edit call as in flight.
    pub fn begin_edit(&mut self) {
        self.is_editing = true;
    }

    /// Record a successful edit, overwriting any previous edited image.
    pub fn finish_edit(&mut self, base64_image: &str, mime_type: &str) {
        self.edited_image = Some(data_url::compose(mime_type, base64_image));
        self.is_editing = false;
    }

    /// Record an edit failure. The failure message lands in the record's
    /// single `error` field; generation errors cannot coexist because a
    /// record only reaches the editor once it holds an original image.
    pub fn fail_edit(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.is_editing = false;
    }
}
