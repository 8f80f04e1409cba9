//! HTTP relay module.
//!
//! Exposes `POST /generate` and `GET /health` to local clients and forwards
//! prompts to the model handle chosen at startup.

mod handlers;
mod server;
pub mod types;

pub use server::{
    build_http_client, create_router, run_server, AppState, RequestId, REQUEST_ID_HEADER,
};
pub use types::{GenerateRequest, GenerateResponse, HealthResponse};
