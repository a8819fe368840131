//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::generation::pipeline::{generate_posts, GenerateContentRequest, PostsEnvelope};
use crate::state::AppState;

/// POST /api/generate
///
/// Full generation pipeline: validate → build prompts → LLM call →
/// repair/parse → schema validation. Returns `{ "posts": [...] }`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateContentRequest>,
) -> Result<Json<PostsEnvelope>, AppError> {
    let envelope = generate_posts(&state.llm, request).await?;
    Ok(Json(envelope))
}
