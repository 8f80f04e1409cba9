//! HTTP client for the Generative Language API.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::types::{
    ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, ListModelsResponse, ModelInfo,
    UsageMetadata,
};
use crate::config::{ApiKey, GeminiConfig};

/// Header carrying the API key on every upstream call.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Page size requested from `models.list`.
const LIST_PAGE_SIZE: &str = "1000";

/// Errors raised by upstream calls.
///
/// The display string is what `/generate` hands back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{status} {message}")]
    Http { status: u16, message: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("prompt blocked: {0}")]
    Blocked(String),
}

/// Normalise a model identifier to its resource name.
///
/// `gemini-pro` becomes `models/gemini-pro`; names already carrying a
/// `models/` or `tunedModels/` prefix are kept as-is.
pub fn resource_name(identifier: &str) -> String {
    let identifier = identifier.trim();
    if identifier.starts_with("models/") || identifier.starts_with("tunedModels/") {
        identifier.to_string()
    } else {
        format!("models/{}", identifier)
    }
}

/// Extract a human-readable message from an upstream error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().to_string(),
    }
}

/// Authenticated client for one upstream endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl GeminiClient {
    pub fn new(http: Client, base_url: &str, api_key: ApiKey) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Build a client from config; `None` when no API key is configured.
    pub fn from_config(config: &GeminiConfig, http: Client) -> Option<Self> {
        config
            .api_key
            .clone()
            .map(|key| Self::new(http, &config.base_url, key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let response = request
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// All models the key can see, following pagination to the end.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, UpstreamError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.url("models"))
                .query(&[("pageSize", LIST_PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListModelsResponse = self.send_json(request).await?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(count = models.len(), "Listed upstream models");
        Ok(models)
    }

    /// Resource names of the models that support `generateContent`.
    pub async fn list_generation_models(&self) -> Result<Vec<String>, UpstreamError> {
        Ok(self
            .list_models()
            .await?
            .into_iter()
            .filter(ModelInfo::supports_generation)
            .map(|m| m.name)
            .collect())
    }

    /// Bind a handle to `identifier`, confirming the model exists upstream.
    pub async fn model(&self, identifier: &str) -> Result<ModelHandle, UpstreamError> {
        let resource = resource_name(identifier);
        let info: ModelInfo = self.send_json(self.http.get(self.url(&resource))).await?;
        tracing::debug!(
            model = %info.name,
            display_name = ?info.display_name,
            generates = info.supports_generation(),
            "Resolved model"
        );

        Ok(ModelHandle {
            client: self.clone(),
            identifier: identifier.to_string(),
            resource,
        })
    }
}

/// Result of a successful `generateContent` call. `text` may be empty.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: Option<UsageMetadata>,
}

/// A client bound to one model, chosen once at startup.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    client: GeminiClient,
    identifier: String,
    resource: String,
}

impl ModelHandle {
    /// The candidate identifier this handle was created from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn resource_name(&self) -> &str {
        &self.resource
    }

    /// Send a single-turn prompt and wait for the full generation.
    pub async fn generate(&self, prompt: &str) -> Result<Generation, UpstreamError> {
        let url = self
            .client
            .url(&format!("{}:generateContent", self.resource));
        let request = self
            .client
            .http
            .post(url)
            .json(&GenerateContentRequest::from_prompt(prompt));

        let response: GenerateContentResponse = self.client.send_json(request).await?;

        if let Some(reason) = response.block_reason() {
            return Err(UpstreamError::Blocked(reason.to_string()));
        }

        Ok(Generation {
            text: response.text(),
            finish_reason: response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone()),
            usage: response.usage_metadata,
        })
    }
}
