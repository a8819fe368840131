//! Axum route handlers for the Profile API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::models::PersonaProfile;
use crate::profile::store::{delete_profile, fetch_profile, upsert_profile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileIdQuery {
    pub id: Option<Uuid>,
}

/// Upsert body: a client-generated id plus the persona fields.
#[derive(Debug, Deserialize)]
pub struct ProfileUpsertRequest {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub profile: PersonaProfile,
}

/// GET /api/profile?id=
///
/// Absence is not an error: a missing id or an unknown id both return
/// `{ "profile": null }` with an explanatory message.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<ProfileIdQuery>,
) -> Result<Json<Value>, AppError> {
    let Some(id) = params.id else {
        return Ok(Json(json!({
            "profile": null,
            "message": "No user ID provided."
        })));
    };

    match fetch_profile(&state.db, id).await? {
        Some(profile) => Ok(Json(json!({ "profile": profile }))),
        None => Ok(Json(json!({
            "profile": null,
            "message": "No profile found. Please create one."
        }))),
    }
}

/// POST /api/profile
///
/// Upserts the record. Requires an id and at least one populated field.
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileUpsertRequest>,
) -> Result<Json<Value>, AppError> {
    let id = request
        .id
        .ok_or_else(|| AppError::Validation("User ID is required.".to_string()))?;

    if !request.profile.has_content() {
        return Err(AppError::Validation(
            "At least one field must be provided.".to_string(),
        ));
    }

    let profile = upsert_profile(&state.db, id, &request.profile).await?;

    Ok(Json(json!({
        "message": "Profile saved successfully!",
        "profile": profile
    })))
}

/// DELETE /api/profile?id=
///
/// Idempotent at the store level; reports 404 when nothing was deleted.
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Query(params): Query<ProfileIdQuery>,
) -> Result<Json<Value>, AppError> {
    let id = params
        .id
        .ok_or_else(|| AppError::Validation("User ID is required.".to_string()))?;

    if !delete_profile(&state.db, id).await? {
        return Err(AppError::NotFound("No profile found to delete.".to_string()));
    }

    Ok(Json(json!({ "message": "Profile deleted successfully!" })))
}
