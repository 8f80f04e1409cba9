//! Request and response bodies of the relay endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /generate`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// Absent and empty are treated the same.
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    /// The prompt, if one was actually supplied.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }
}

/// Successful `POST /generate` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub text: String,
}

impl GenerateResponse {
    pub fn new(text: String) -> Self {
        Self {
            success: true,
            text,
        }
    }
}

/// `GET /health` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub gemini_configured: bool,
    pub available_models: Vec<String>,
}
