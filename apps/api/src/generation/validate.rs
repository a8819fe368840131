//! Post schema validation — the model's adherence to the requested JSON shape
//! is never trusted. Parseable-but-malformed output (wrong platform, missing
//! keys, out-of-range numbers) is rejected here instead of propagating to the
//! caller.

use std::collections::HashMap;

use crate::generation::pipeline::GeneratedPost;
use crate::generation::platform::Platform;
use crate::generation::prompts::VARIATIONS_PER_PLATFORM;

/// Validates a parsed post list against the requested platforms.
///
/// Checks, per post: recognized and requested platform label, version in
/// 1..=3, score in 1..=100, and the exactly-one-of shape invariant
/// (caption+script for Instagram, content otherwise). Across the list:
/// exactly 3 posts per requested platform.
pub fn validate_posts(posts: &[GeneratedPost], requested: &[Platform]) -> Result<(), String> {
    if posts.is_empty() {
        return Err("model returned an empty post list".to_string());
    }

    let mut per_platform: HashMap<Platform, usize> = HashMap::new();

    for (i, post) in posts.iter().enumerate() {
        let platform = Platform::from_label(&post.platform)
            .ok_or_else(|| format!("post {i}: unknown platform '{}'", post.platform))?;

        if !requested.contains(&platform) {
            return Err(format!(
                "post {i}: platform '{}' was not requested",
                post.platform
            ));
        }

        if !(1..=3).contains(&post.version) {
            return Err(format!(
                "post {i}: version {} out of range 1..=3",
                post.version
            ));
        }

        if !(1..=100).contains(&post.human_likeness_score) {
            return Err(format!(
                "post {i}: humanLikenessScore {} out of range 1..=100",
                post.human_likeness_score
            ));
        }

        if post.approach.trim().is_empty() {
            return Err(format!("post {i}: approach is empty"));
        }

        validate_shape(i, post, platform)?;

        *per_platform.entry(platform).or_insert(0) += 1;
    }

    for &platform in requested {
        let count = per_platform.get(&platform).copied().unwrap_or(0);
        if count != VARIATIONS_PER_PLATFORM {
            return Err(format!(
                "expected {VARIATIONS_PER_PLATFORM} posts for {}, got {count}",
                platform.label()
            ));
        }
    }

    Ok(())
}

/// Exactly one of `content` or (`caption`, `script`) must be populated,
/// determined by platform.
fn validate_shape(i: usize, post: &GeneratedPost, platform: Platform) -> Result<(), String> {
    let content = nonblank(&post.content);
    let caption = nonblank(&post.caption);
    let script = nonblank(&post.script);

    if platform.uses_caption_script() {
        if !caption || !script {
            return Err(format!(
                "post {i}: {} posts require both caption and script",
                platform.label()
            ));
        }
        if content {
            return Err(format!(
                "post {i}: {} posts must not carry a content field",
                platform.label()
            ));
        }
    } else {
        if !content {
            return Err(format!(
                "post {i}: {} posts require a content field",
                platform.label()
            ));
        }
        if caption || script {
            return Err(format!(
                "post {i}: {} posts must not carry caption/script fields",
                platform.label()
            ));
        }
    }

    Ok(())
}

fn nonblank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_post(platform: &str, version: u8) -> GeneratedPost {
        GeneratedPost {
            platform: platform.to_string(),
            version,
            content: Some("a generated post".to_string()),
            caption: None,
            script: None,
            human_likeness_score: 85,
            approach: "story-driven".to_string(),
        }
    }

    fn instagram_post(version: u8) -> GeneratedPost {
        GeneratedPost {
            platform: "Instagram".to_string(),
            version,
            content: None,
            caption: Some("caption #launch".to_string()),
            script: Some("hey everyone...".to_string()),
            human_likeness_score: 90,
            approach: "conversational".to_string(),
        }
    }

    #[test]
    fn test_valid_single_platform_batch_passes() {
        let posts: Vec<_> = (1..=3).map(|v| content_post("Twitter", v)).collect();
        assert!(validate_posts(&posts, &[Platform::Twitter]).is_ok());
    }

    #[test]
    fn test_instagram_scenario_three_caption_script_posts() {
        let posts: Vec<_> = (1..=3).map(instagram_post).collect();
        assert!(validate_posts(&posts, &[Platform::Instagram]).is_ok());
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(validate_posts(&[], &[Platform::Twitter]).is_err());
    }

    #[test]
    fn test_unknown_platform_label_is_rejected() {
        let posts = vec![content_post("Mastodon", 1)];
        let err = validate_posts(&posts, &[Platform::Twitter]).unwrap_err();
        assert!(err.contains("unknown platform"));
    }

    #[test]
    fn test_unrequested_platform_is_rejected() {
        let mut posts: Vec<_> = (1..=3).map(|v| content_post("Twitter", v)).collect();
        posts.push(content_post("Facebook", 1));
        let err = validate_posts(&posts, &[Platform::Twitter]).unwrap_err();
        assert!(err.contains("not requested"));
    }

    #[test]
    fn test_version_out_of_range_is_rejected() {
        let posts = vec![content_post("Twitter", 4)];
        let err = validate_posts(&posts, &[Platform::Twitter]).unwrap_err();
        assert!(err.contains("version"));
    }

    #[test]
    fn test_score_out_of_range_is_rejected() {
        let mut post = content_post("Twitter", 1);
        post.human_likeness_score = 0;
        let err = validate_posts(&[post], &[Platform::Twitter]).unwrap_err();
        assert!(err.contains("humanLikenessScore"));

        let mut post = content_post("Twitter", 1);
        post.human_likeness_score = 101;
        assert!(validate_posts(&[post], &[Platform::Twitter]).is_err());
    }

    #[test]
    fn test_instagram_post_with_content_is_rejected() {
        let mut post = instagram_post(1);
        post.content = Some("should not be here".to_string());
        let err = validate_posts(&[post], &[Platform::Instagram]).unwrap_err();
        assert!(err.contains("must not carry a content field"));
    }

    #[test]
    fn test_instagram_post_missing_script_is_rejected() {
        let mut post = instagram_post(1);
        post.script = None;
        let err = validate_posts(&[post], &[Platform::Instagram]).unwrap_err();
        assert!(err.contains("caption and script"));
    }

    #[test]
    fn test_non_instagram_post_with_caption_is_rejected() {
        let mut post = content_post("LinkedIn", 1);
        post.caption = Some("stray caption".to_string());
        let err = validate_posts(&[post], &[Platform::LinkedIn]).unwrap_err();
        assert!(err.contains("must not carry caption/script"));
    }

    #[test]
    fn test_blank_content_counts_as_missing() {
        let mut post = content_post("Twitter", 1);
        post.content = Some("   ".to_string());
        let err = validate_posts(&[post], &[Platform::Twitter]).unwrap_err();
        assert!(err.contains("require a content field"));
    }

    #[test]
    fn test_wrong_count_per_platform_is_rejected() {
        let posts: Vec<_> = (1..=2).map(|v| content_post("Twitter", v)).collect();
        let err = validate_posts(&posts, &[Platform::Twitter]).unwrap_err();
        assert!(err.contains("expected 3 posts"));
    }

    #[test]
    fn test_missing_platform_in_batch_is_rejected() {
        let posts: Vec<_> = (1..=3).map(|v| content_post("Twitter", v)).collect();
        let err = validate_posts(&posts, &[Platform::Twitter, Platform::LinkedIn]).unwrap_err();
        assert!(err.contains("LinkedIn"));
    }

    #[test]
    fn test_multi_platform_batch_passes() {
        let mut posts: Vec<_> = (1..=3).map(instagram_post).collect();
        posts.extend((1..=3).map(|v| content_post("LinkedIn", v)));
        assert!(validate_posts(&posts, &[Platform::Instagram, Platform::LinkedIn]).is_ok());
    }
}
