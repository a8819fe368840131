//! Configuration diagnostics endpoint — reports which environment pieces are
//! wired up without ever leaking the full credential.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/diagnostics
pub async fn diagnostics_handler(State(state): State<AppState>) -> (HeaderMap, Json<Value>) {
    let config = &state.config;

    let key_configured = !config.openrouter_api_key.is_empty();
    let db_configured = !config.database_url.is_empty();

    let mut recommendations: Vec<String> = Vec::new();
    if !key_configured {
        recommendations.push("CRITICAL: Set OPENROUTER_API_KEY".to_string());
    }
    if !db_configured {
        recommendations.push("WARNING: Set DATABASE_URL".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("All environment variables are configured!".to_string());
    }

    let body = json!({
        "timestamp": Utc::now().to_rfc3339(),
        "checks": {
            "openrouterApiKey": {
                "configured": key_configured,
                "length": config.openrouter_api_key.len(),
                "preview": mask_credential(&config.openrouter_api_key),
            },
            "databaseUrl": {
                "configured": db_configured,
            },
            "siteUrl": {
                "value": config.site_url,
            },
            "llmTimeoutSecs": config.llm_timeout_secs,
        },
        "recommendations": recommendations,
    });

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );

    (headers, Json(body))
}

/// Shows at most the first 8 and last 4 characters of a credential.
/// Short values are fully masked rather than partially revealed.
fn mask_credential(key: &str) -> String {
    if key.is_empty() {
        return "NOT SET".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 16 {
        return "********".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
