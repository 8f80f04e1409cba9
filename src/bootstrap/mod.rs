//! Startup sequence that resolves the model handle.
//!
//! Runs once per process:
//! - authenticate by listing the upstream models
//! - try the candidate identifiers in priority order
//! - keep the first handle that initializes, or record why none did
//!
//! Failure here is never fatal; the server starts unconfigured instead.

mod selector;

pub use selector::{select_model, CandidateFailure, Selected, SelectionError};

use reqwest::Client;

use crate::config::GeminiConfig;
use crate::gemini::{GeminiClient, ModelHandle};

/// Why bootstrap produced no model handle.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("no API key configured (set GEMINI_API_KEY or gemini.api_key)")]
    MissingApiKey,

    #[error("authentication with upstream failed: {0}")]
    Authentication(String),

    #[error(transparent)]
    NoCandidate(#[from] SelectionError),
}

/// Outcome of the startup sequence.
#[derive(Debug)]
pub struct Bootstrap {
    /// Upstream client, present whenever an API key is configured
    pub upstream: Option<GeminiClient>,
    /// Selected model handle, or the reason there is none
    pub model: Result<ModelHandle, BootstrapError>,
}

impl Bootstrap {
    /// A bootstrap result with no upstream at all.
    pub fn unconfigured(reason: BootstrapError) -> Self {
        Self {
            upstream: None,
            model: Err(reason),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_ok()
    }
}

/// Resolve the model handle for this process.
pub async fn bootstrap(config: &GeminiConfig, http: Client) -> Bootstrap {
    let Some(client) = GeminiClient::from_config(config, http) else {
        let reason = BootstrapError::MissingApiKey;
        tracing::error!(error = %reason, "Gemini bootstrap failed");
        return Bootstrap::unconfigured(reason);
    };

    tracing::info!(base_url = %client.base_url(), "Listing available models");
    match client.list_models().await {
        Ok(models) => {
            for model in models.iter().filter(|m| m.supports_generation()) {
                tracing::info!(model = %model.name, "Model available");
            }
        }
        Err(e) => {
            let reason = BootstrapError::Authentication(e.to_string());
            tracing::error!(error = %reason, "Gemini bootstrap failed");
            return Bootstrap {
                upstream: Some(client),
                model: Err(reason),
            };
        }
    }

    if config.models.is_empty() {
        tracing::warn!("No candidate models configured");
    }

    let selection = select_model(&config.models, |candidate| {
        let client = client.clone();
        async move { client.model(&candidate).await }
    })
    .await;

    let model = match selection {
        Ok(selected) => {
            if !selected.skipped.is_empty() {
                tracing::info!(
                    model = %selected.candidate,
                    skipped = selected.skipped.len(),
                    "Fell back to lower-priority candidate"
                );
            }
            Ok(selected.value)
        }
        Err(e) => {
            for failure in &e.failures {
                tracing::debug!(
                    model = %failure.candidate,
                    reason = %failure.reason,
                    "Candidate rejected"
                );
            }
            tracing::error!(error = %e, "Gemini bootstrap failed");
            Err(BootstrapError::from(e))
        }
    };

    Bootstrap {
        upstream: Some(client),
        model,
    }
}
