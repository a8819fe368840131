//! Persona store — sqlx-backed CRUD on the `profiles` table.
//!
//! Absence of a row is never an error for fetches; deletes are idempotent
//! and report whether a row existed.

use sqlx::PgPool;
use uuid::Uuid;

use crate::profile::models::{PersonaProfile, ProfileRow};

/// Fetches a profile by id. Returns `None` when no row exists.
pub async fn fetch_profile(pool: &PgPool, id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Upserts a profile record. Blank fields are stored as NULL.
pub async fn upsert_profile(
    pool: &PgPool,
    id: Uuid,
    data: &PersonaProfile,
) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (id, full_name, role, project_name, project_description,
             target_audience, style_keywords, source_url,
             instagram_username, twitter_username, linkedin_username, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
        ON CONFLICT (id) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            role = EXCLUDED.role,
            project_name = EXCLUDED.project_name,
            project_description = EXCLUDED.project_description,
            target_audience = EXCLUDED.target_audience,
            style_keywords = EXCLUDED.style_keywords,
            source_url = EXCLUDED.source_url,
            instagram_username = EXCLUDED.instagram_username,
            twitter_username = EXCLUDED.twitter_username,
            linkedin_username = EXCLUDED.linkedin_username,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(normalized(&data.full_name))
    .bind(normalized(&data.role))
    .bind(normalized(&data.project_name))
    .bind(normalized(&data.project_description))
    .bind(normalized(&data.target_audience))
    .bind(normalized(&data.style_keywords))
    .bind(normalized(&data.source_url))
    .bind(normalized(&data.instagram_username))
    .bind(normalized(&data.twitter_username))
    .bind(normalized(&data.linkedin_username))
    .fetch_one(pool)
    .await
}

/// Deletes a profile by id. Returns whether a row was actually removed.
pub async fn delete_profile(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Collapses whitespace-only values to NULL before binding.
fn normalized(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
