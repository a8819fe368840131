//! Content Generation — orchestrates the request pipeline.
//!
//! Flow: validate request → build prompts → single LLM call →
//!       repair/parse → schema validation → response.
//!
//! Stateless: each invocation is an independent request/response cycle with
//! no shared mutable state. The upstream call is never retried; every failure
//! is surfaced to the caller immediately.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, UpstreamKind};
use crate::generation::platform::{Platform, Tone};
use crate::generation::prompts::{system_prompt, user_prompt, VARIATIONS_PER_PLATFORM};
use crate::generation::validate::validate_posts;
use crate::llm_client::repair::{parse_repaired, RepairError};
use crate::llm_client::{max_tokens_for, LlmClient, LlmError};
use crate::profile::models::PersonaProfile;

/// Top-level key the prompt demands; also the truncation-detection marker.
const POSTS_KEY: &str = "posts";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for content generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(default)]
    pub raw_text: String,
    pub brand_voice: Option<String>,
    pub selected_tone: Tone,
    #[serde(default)]
    pub selected_platforms: Vec<Platform>,
    pub user_profile: Option<PersonaProfile>,
}

/// A single generated post draft.
///
/// Exactly one of `content` or (`caption`, `script`) is populated, determined
/// by platform — enforced by `validate_posts` after parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPost {
    pub platform: String,
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    pub human_likeness_score: u8,
    pub approach: String,
}

/// The `{ "posts": [...] }` envelope the model is instructed to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsEnvelope {
    pub posts: Vec<GeneratedPost>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the generation pipeline for one request.
///
/// Validation failures are reported before any upstream call is made.
pub async fn generate_posts(
    llm: &LlmClient,
    request: GenerateContentRequest,
) -> Result<PostsEnvelope, AppError> {
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("Raw text is required".to_string()));
    }

    let platforms = dedupe_platforms(&request.selected_platforms);
    if platforms.is_empty() {
        return Err(AppError::Validation(
            "At least one platform must be selected".to_string(),
        ));
    }

    let system = system_prompt(&platforms);
    let user = user_prompt(
        &request.raw_text,
        request.selected_tone,
        request.brand_voice.as_deref(),
        &platforms,
        request.user_profile.as_ref(),
    );

    info!(
        "Generating {} posts across {} platform(s), tone={}",
        VARIATIONS_PER_PLATFORM * platforms.len(),
        platforms.len(),
        request.selected_tone.label()
    );

    let raw = llm
        .call(&system, &user, max_tokens_for(platforms.len()))
        .await
        .map_err(map_llm_error)?;

    let envelope: PostsEnvelope = parse_repaired(&raw, POSTS_KEY).map_err(|e| match e {
        RepairError::Incomplete => AppError::Truncated(e.to_string()),
        RepairError::Unparseable(_) => AppError::Unparseable(e.to_string()),
    })?;

    validate_posts(&envelope.posts, &platforms).map_err(AppError::MalformedPosts)?;

    info!("Generated {} posts", envelope.posts.len());

    Ok(envelope)
}

/// Collapses duplicate platform selections while preserving order.
fn dedupe_platforms(selected: &[Platform]) -> Vec<Platform> {
    let mut out: Vec<Platform> = Vec::with_capacity(selected.len());
    for &platform in selected {
        if !out.contains(&platform) {
            out.push(platform);
        }
    }
    out
}

fn map_llm_error(e: LlmError) -> AppError {
    match e {
        LlmError::Auth { .. } => AppError::Upstream {
            kind: UpstreamKind::Auth,
            detail: e.to_string(),
        },
        LlmError::RateLimited { .. } => AppError::Upstream {
            kind: UpstreamKind::RateLimited,
            detail: e.to_string(),
        },
        LlmError::InsufficientQuota { .. } => AppError::Upstream {
            kind: UpstreamKind::InsufficientQuota,
            detail: e.to_string(),
        },
        LlmError::Api { .. } | LlmError::Http(_) => AppError::Upstream {
            kind: UpstreamKind::Other,
            detail: e.to_string(),
        },
        LlmError::Truncated { .. } => AppError::Truncated(e.to_string()),
        LlmError::EmptyContent => AppError::Unparseable(e.to_string()),
    }
}
