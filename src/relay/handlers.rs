//! HTTP request handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::server::AppState;
use super::types::{GenerateRequest, GenerateResponse, HealthResponse};
use crate::error::{Error, Result};

/// Handle POST /generate
///
/// A body that is missing or not a JSON object counts as a missing prompt.
pub async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable generate body");
            GenerateRequest::default()
        }
    };

    let prompt = request.prompt().ok_or(Error::InvalidInput)?;
    let model = state.model.as_ref().ok_or(Error::Unavailable)?;

    tracing::info!(
        model = %model.identifier(),
        prompt_chars = prompt.chars().count(),
        "Generating content"
    );

    let start = std::time::Instant::now();
    let generation = model.generate(prompt).await.map_err(|e| {
        tracing::error!(error = %e, "Content generation failed");
        Error::from(e)
    })?;
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    if generation.text.is_empty() {
        tracing::error!(
            finish_reason = ?generation.finish_reason,
            latency_ms,
            "Empty response from upstream"
        );
        return Err(Error::EmptyResponse);
    }

    tracing::info!(
        response_chars = generation.text.chars().count(),
        finish_reason = ?generation.finish_reason,
        total_tokens = ?generation.usage.as_ref().and_then(|u| u.total_token_count),
        latency_ms,
        "Content generated"
    );

    Ok(Json(GenerateResponse::new(generation.text)))
}

/// Handle GET /health
///
/// Always 200. A failed model listing is reported as an empty list.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let available_models = match &state.upstream {
        Some(client) => match client.list_generation_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::warn!(error = %e, "Model listing failed during health check");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        gemini_configured: state.model.is_some(),
        available_models,
    })
}
