//! Upstream client for the Gemini generative language API.
//!
//! Covers the three calls the relay needs: listing models, resolving a model
//! identifier to a handle, and single-turn content generation.

mod client;
pub mod types;

pub use client::{
    resource_name, GeminiClient, Generation, ModelHandle, UpstreamError, API_KEY_HEADER,
};
pub use types::ModelInfo;
