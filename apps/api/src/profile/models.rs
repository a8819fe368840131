use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted persona profile row, one per client-generated id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub target_audience: Option<String>,
    pub style_keywords: Option<String>,
    pub source_url: Option<String>,
    pub instagram_username: Option<String>,
    pub twitter_username: Option<String>,
    pub linkedin_username: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Free-text persona fields, all optional. Used both as the upsert payload
/// and as the inline `userProfile` the generation request may carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub target_audience: Option<String>,
    pub style_keywords: Option<String>,
    pub source_url: Option<String>,
    pub instagram_username: Option<String>,
    pub twitter_username: Option<String>,
    pub linkedin_username: Option<String>,
}

impl PersonaProfile {
    /// (prompt label, value) pairs for every populated field, in a stable
    /// order. Whitespace-only values count as absent.
    pub fn populated_fields(&self) -> Vec<(&'static str, &str)> {
        let candidates: [(&'static str, &Option<String>); 10] = [
            ("Author Name", &self.full_name),
            ("Role", &self.role),
            ("Project", &self.project_name),
            ("Project Description", &self.project_description),
            ("Target Audience", &self.target_audience),
            ("Style Keywords", &self.style_keywords),
            ("Source URL", &self.source_url),
            ("Instagram", &self.instagram_username),
            ("Twitter/X", &self.twitter_username),
            ("LinkedIn", &self.linkedin_username),
        ];

        candidates
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (label, v))
            })
            .collect()
    }

    /// True when at least one field carries a non-blank value.
    pub fn has_content(&self) -> bool {
        !self.populated_fields().is_empty()
    }
}
