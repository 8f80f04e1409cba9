//! gemini-relay - local HTTP relay for the Gemini generative language API
//!
//! This library provides configuration, startup model selection, the upstream
//! client, and the HTTP handlers behind the `gemini-relay` binary.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod gemini;
pub mod relay;

pub use config::Config;
pub use error::{Error, Result};
