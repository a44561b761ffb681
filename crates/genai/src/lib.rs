//! REST client for the Gemini generative-AI backend.
//!
//! Provides typed wire messages, the HTTP API wrapper used in production,
//! the [`GenAiBackend`](backend::GenAiBackend) trait seam the pipeline is
//! written against, and a scripted mock backend for tests.

pub mod api;
pub mod backend;
pub mod messages;
pub mod mock;
