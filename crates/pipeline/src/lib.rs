//! Menu photo-shoot pipeline.
//!
//! Parses free-form menu text into dish names, generates one photograph
//! per dish with fixed inter-request throttling and per-dish failure
//! isolation, and applies independent post-hoc edits to generated images.
//! Driven by [`driver::PhotoPipeline`]; progress is observable via
//! [`events::DishEvent`].

pub mod composer;
pub mod driver;
pub mod editor;
pub mod events;
pub mod generator;
pub mod parser;

/// Model used for menu parsing and prompt composition.
pub const MENU_PARSING_MODEL: &str = "gemini-2.5-flash";

/// Model used for image synthesis.
pub const IMAGE_GENERATION_MODEL: &str = "imagen-4.0-generate-001";

/// Model used for image-conditioned editing.
pub const IMAGE_EDITING_MODEL: &str = "gemini-2.5-flash-image";
