use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// Sub-classification of non-2xx responses from the generation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// 401/403 from the provider — bad or revoked credential.
    Auth,
    /// 429 from the provider.
    RateLimited,
    /// 402 from the provider — out of credits.
    InsufficientQuota,
    /// Anything else non-successful.
    Other,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Nothing here is retried: every failure is reported synchronously to the
/// caller as `{ error, details, timestamp }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Generation API error: {detail}")]
    Upstream { kind: UpstreamKind, detail: String },

    #[error("Incomplete model response: {0}")]
    Truncated(String),

    #[error("Unparseable model response: {0}")]
    Unparseable(String),

    #[error("Malformed posts in model response: {0}")]
    MalformedPosts(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error maps to on the wire.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { kind, .. } => match kind {
                UpstreamKind::InsufficientQuota => StatusCode::PAYMENT_REQUIRED,
                UpstreamKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                UpstreamKind::Auth | UpstreamKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Truncated(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Configuration(_)
            | AppError::Unparseable(_)
            | AppError::MalformedPosts(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message shown to the caller. Technical detail goes in
    /// the `details` field instead.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Configuration(_) => "API key not configured".to_string(),
            AppError::Upstream { kind, .. } => match kind {
                UpstreamKind::Auth => "Generation API rejected the configured credential".to_string(),
                UpstreamKind::RateLimited => "Generation API rate limit reached".to_string(),
                UpstreamKind::InsufficientQuota => {
                    "Generation API quota exhausted".to_string()
                }
                UpstreamKind::Other => "Failed to generate content".to_string(),
            },
            AppError::Truncated(_) => {
                "The model response was cut off before completion".to_string()
            }
            AppError::Unparseable(_) | AppError::MalformedPosts(_) => {
                "Failed to generate content".to_string()
            }
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An unexpected error occurred".to_string(),
        }
    }

    /// Technical detail string, where one is available.
    fn detail(&self) -> Option<String> {
        match self {
            AppError::Validation(_) | AppError::NotFound(_) => None,
            AppError::Configuration(msg) => Some(msg.clone()),
            AppError::Upstream { detail, .. } => Some(detail.clone()),
            AppError::Truncated(msg) => Some(msg.clone()),
            AppError::Unparseable(msg) => Some(msg.clone()),
            AppError::MalformedPosts(msg) => Some(msg.clone()),
            AppError::Database(e) => Some(e.to_string()),
            AppError::Internal(e) => Some(format!("{e:#}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::warn!("{self}");
        }

        let mut body = json!({
            "error": self.public_message(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let Some(detail) = self.detail() {
            body["details"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let e = AppError::Validation("Raw text is required".to_string());
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_quota_maps_to_402() {
        let e = AppError::Upstream {
            kind: UpstreamKind::InsufficientQuota,
            detail: "402 from provider".to_string(),
        };
        assert_eq!(e.status_code(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn test_rate_limit_maps_to_429() {
        let e = AppError::Upstream {
            kind: UpstreamKind::RateLimited,
            detail: "429 from provider".to_string(),
        };
        assert_eq!(e.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_truncation_maps_to_413() {
        let e = AppError::Truncated("response ended mid-array".to_string());
        assert_eq!(e.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_auth_and_generic_upstream_map_to_500() {
        for kind in [UpstreamKind::Auth, UpstreamKind::Other] {
            let e = AppError::Upstream {
                kind,
                detail: String::new(),
            };
            assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_configuration_message_is_fixed() {
        let e = AppError::Configuration("OPENROUTER_API_KEY is missing".to_string());
        assert_eq!(e.public_message(), "API key not configured");
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let e = AppError::NotFound("No profile found to delete.".to_string());
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
    }
}
