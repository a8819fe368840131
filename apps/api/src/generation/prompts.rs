//! Prompt builder — deterministically renders the system and user
//! instructions for a generation request. Pure functions of their input.

use crate::generation::platform::{Platform, Tone};
use crate::profile::models::PersonaProfile;

/// Variations requested per selected platform.
pub const VARIATIONS_PER_PLATFORM: usize = 3;

/// Renders the system instruction: identity, per-platform formatting rules,
/// the variation-count policy, and the exact output JSON shape.
pub fn system_prompt(platforms: &[Platform]) -> String {
    let total = VARIATIONS_PER_PLATFORM * platforms.len();

    let platform_names = platforms
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ");

    let mut guidelines = String::new();
    for platform in platforms {
        let g = platform.guideline();
        guidelines.push_str(&format!(
            "- {}: {}. Character limit: {}. {}.\n",
            platform.label(),
            g.hashtag_guidance,
            g.char_limit,
            g.formatting_note,
        ));
    }

    let shape_rule = if platforms.iter().any(Platform::uses_caption_script) {
        "7. Each object in the array must have this exact structure: \
        { \"platform\": \"Platform Name\", \"version\": version number (1, 2, or 3), \
        \"content\": \"The generated post content...\", \
        \"humanLikenessScore\": a number from 1 to 100, \
        \"approach\": \"brief description of the approach used\" }. \
        EXCEPTION for Instagram: instead of \"content\", provide BOTH \
        \"caption\" (the post caption with hashtags) and \"script\" \
        (a short spoken reel script). Never provide \"content\" for Instagram, \
        and never provide \"caption\" or \"script\" for any other platform."
    } else {
        "7. Each object in the array must have this exact structure: \
        { \"platform\": \"Platform Name\", \"version\": version number (1, 2, or 3), \
        \"content\": \"The generated post content...\", \
        \"humanLikenessScore\": a number from 1 to 100, \
        \"approach\": \"brief description of the approach used\" }."
    };

    format!(
        "You are VibeScribe, an expert social media strategist who creates authentic, \
human-like content. Your task is to transform user input into platform-specific posts.

Platform-Specific Guidelines:
{guidelines}
Instructions:
1. Generate {VARIATIONS_PER_PLATFORM} UNIQUE variations for EACH platform ({platform_names}) - total of {total} posts.
2. Each variation must be DISTINCTLY different in structure, opening, and approach. Do NOT simply rephrase the same pattern.
3. Format the content appropriately for each platform following the guidelines above.
4. Ensure authenticity and diversity:
   - Vary sentence structure (questions, statements, exclamations, fragments)
   - Mix opening hooks (questions, facts, stories, bold statements, emojis, statistics)
   - Use conversational language, contractions, and natural flow
   - Avoid generic phrases like \"Are you ready?\", \"Let's dive in\", \"Stay tuned\", \"Don't miss out\"
   - NO robotic patterns or formulaic templates
5. Variation strategies to use across the {VARIATIONS_PER_PLATFORM} versions per platform:
   - Version 1: Story-driven or narrative approach
   - Version 2: Data/insight-led or educational angle
   - Version 3: Conversational/question-based or provocative stance
6. Return ONLY a valid JSON object with a single key \"posts\". This key should contain an array of objects. Do not include any markdown formatting like ```json or any other text outside of the JSON object.
{shape_rule}"
    )
}

/// Renders the user instruction: the literal raw text, tone, brand voice,
/// and an optional personalization block built from the persona profile.
pub fn user_prompt(
    raw_text: &str,
    tone: Tone,
    brand_voice: Option<&str>,
    platforms: &[Platform],
    profile: Option<&PersonaProfile>,
) -> String {
    let total = VARIATIONS_PER_PLATFORM * platforms.len();
    let platform_names = platforms
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ");

    let personalization = profile
        .and_then(personalization_block)
        .unwrap_or_default();

    format!(
        "Transform this into {total} diverse, human-sounding social media posts \
({VARIATIONS_PER_PLATFORM} variations each for {platform_names}):

Raw Text: \"{raw_text}\"
Desired Tone: \"{}\"
Brand Voice: \"{}\"{personalization}

Remember: Each of the {VARIATIONS_PER_PLATFORM} versions per platform should feel like it \
came from different creative angles. Avoid repetitive patterns!",
        tone.label(),
        brand_voice.unwrap_or(""),
    )
}

/// Builds the personalization preamble from populated persona fields.
/// Returns `None` when every field is blank.
fn personalization_block(profile: &PersonaProfile) -> Option<String> {
    let fields = profile.populated_fields();
    if fields.is_empty() {
        return None;
    }

    let details = fields
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!(
        "\n\nPERSONALIZATION CONTEXT:\nThis content is being created for a specific user. \
Use these details to make the content more authentic and personalized:\n{details}\n\n\
Important: Incorporate this information naturally where relevant. For platform-specific \
posts, you may reference their handles or personal context when appropriate. Make the \
content feel genuinely authored by this person.\n"
    ))
}
