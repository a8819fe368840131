//! Platform and tone catalogs — the fixed lists the UI offers and the prompt
//! builder renders guidelines from.

use serde::{Deserialize, Serialize};

/// A target social network with its own formatting rules.
/// Serde names match the labels the client sends ("Instagram", "TikTok", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    Twitter,
    LinkedIn,
    Facebook,
    TikTok,
    YouTube,
}

/// Per-platform prompt guidance: character limit and hashtag conventions.
#[derive(Debug, Clone, Copy)]
pub struct PlatformGuideline {
    pub char_limit: &'static str,
    pub hashtag_guidance: &'static str,
    pub formatting_note: &'static str,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Instagram,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::Facebook,
        Platform::TikTok,
        Platform::YouTube,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "LinkedIn",
            Platform::Facebook => "Facebook",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
        }
    }

    /// Instagram posts are requested as a caption + reel script pair;
    /// every other platform gets a single content string.
    pub fn uses_caption_script(&self) -> bool {
        matches!(self, Platform::Instagram)
    }

    pub fn guideline(&self) -> PlatformGuideline {
        match self {
            Platform::Instagram => PlatformGuideline {
                char_limit: "2,200",
                hashtag_guidance: "Use 3-5 hashtags (max 30 allowed)",
                formatting_note: "Place hashtags in the caption for search visibility",
            },
            Platform::Twitter => PlatformGuideline {
                char_limit: "280",
                hashtag_guidance: "Use 1-2 hashtags per post",
                formatting_note:
                    "Longer posts truncate in feed; integrate hashtags inline or at end of tweet",
            },
            Platform::LinkedIn => PlatformGuideline {
                char_limit: "3,000",
                hashtag_guidance: "Use 2-5 hashtags per post",
                formatting_note: "\"see more\" appears around 210-220 characters on desktop; \
                    place hashtags at bottom, they count toward the limit",
            },
            Platform::Facebook => PlatformGuideline {
                char_limit: "63,206",
                hashtag_guidance: "Use 1-3 hashtags per post",
                formatting_note: "Short posts outperform; front-load the hook in the first 80 characters",
            },
            Platform::TikTok => PlatformGuideline {
                char_limit: "2,200",
                hashtag_guidance: "Use 3-5 hashtags per post",
                formatting_note: "Open with a strong hook; caption keywords drive search placement",
            },
            Platform::YouTube => PlatformGuideline {
                char_limit: "5,000",
                hashtag_guidance: "Use 3-5 hashtags in the description",
                formatting_note: "The first 157 characters of the description show in search results",
            },
        }
    }

    /// Resolves a display label back to a platform, as returned by the model.
    pub fn from_label(label: &str) -> Option<Platform> {
        Platform::ALL.iter().copied().find(|p| p.label() == label)
    }
}

/// The six tone presets offered by the UI. Serde names are the lowercase
/// values the client sends ("witty", "storytelling", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Inspirational,
    Professional,
    Witty,
    Casual,
    Educational,
    Storytelling,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Inspirational => "inspirational",
            Tone::Professional => "professional",
            Tone::Witty => "witty",
            Tone::Casual => "casual",
            Tone::Educational => "educational",
            Tone::Storytelling => "storytelling",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_serde_uses_display_labels() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.label()));
            let back: Platform = serde_json::from_str(&json).unwrap();
            assert_eq!(back, platform);
        }
    }

    #[test]
    fn test_tone_serde_is_lowercase() {
        let tone: Tone = serde_json::from_str("\"witty\"").unwrap();
        assert_eq!(tone, Tone::Witty);
        assert_eq!(serde_json::to_string(&Tone::Storytelling).unwrap(), "\"storytelling\"");
    }

    #[test]
    fn test_unknown_tone_is_rejected() {
        let result: Result<Tone, _> = serde_json::from_str("\"sarcastic\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_only_instagram_uses_caption_script() {
        for platform in Platform::ALL {
            assert_eq!(
                platform.uses_caption_script(),
                platform == Platform::Instagram
            );
        }
    }

    #[test]
    fn test_from_label_round_trips() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_label(platform.label()), Some(platform));
        }
        assert_eq!(Platform::from_label("Mastodon"), None);
    }

    #[test]
    fn test_twitter_limit_is_280() {
        assert_eq!(Platform::Twitter.guideline().char_limit, "280");
    }
}
