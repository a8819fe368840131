//! Response repair — converts raw model output, which is not guaranteed to be
//! well-formed JSON, into a typed value.
//!
//! Repair steps are ordered and each applies only if the previous did not
//! already succeed:
//! 1. strip a fenced code block wrapper
//! 2. strip control characters (except newline / carriage return / tab)
//! 3. direct parse
//! 4. on failure, detect truncation and fail distinctly — never repair a
//!    truncated payload
//! 5. escape raw control characters inside quoted string literals, re-parse
//! 6. give up with the generic unparseable error

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepairError {
    /// The output carries structural signals of truncation — the expected
    /// top-level key is present but the document never closes.
    #[error("model output appears truncated before completion")]
    Incomplete,

    /// Both the direct parse and the repaired parse failed.
    #[error("model output is not valid JSON: {0}")]
    Unparseable(serde_json::Error),
}

/// Parses raw model output into `T`, applying the repair ladder.
/// `expected_key` is the top-level key the prompt demanded (e.g. `posts`);
/// its presence in unparseable output is the truncation signal.
pub fn parse_repaired<T: DeserializeOwned>(raw: &str, expected_key: &str) -> Result<T, RepairError> {
    let text = strip_json_fences(raw.trim());
    let text = strip_control_chars(text);

    let first_err = match serde_json::from_str::<T>(&text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if looks_truncated(&text, expected_key) {
        return Err(RepairError::Incomplete);
    }

    let repaired = escape_control_chars_in_strings(&text);
    match serde_json::from_str::<T>(&repaired) {
        Ok(value) => Ok(value),
        // Report the first parse error; positions in the rewritten text
        // would mislead.
        Err(_) => Err(RepairError::Unparseable(first_err)),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Drops control characters other than `\n`, `\r`, `\t`.
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Structural truncation signals: the expected top-level key is present but
/// the closing array bracket is missing, or the text does not end in a
/// closing brace.
fn looks_truncated(text: &str, expected_key: &str) -> bool {
    let key_marker = format!("\"{expected_key}\"");
    if !text.contains(&key_marker) {
        return false;
    }
    let has_closing_bracket = text.contains(']');
    let ends_with_brace = text.trim_end().ends_with('}');
    !has_closing_bracket || !ends_with_brace
}

/// Escapes raw control characters the model left inside quoted string
/// literals: newline becomes `\n`, tab becomes `\t`, bare carriage returns
/// are dropped. Characters outside strings and already-escaped sequences are
/// left untouched.
fn escape_control_chars_in_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            out.push(c);
            escaped = false;
            continue;
        }

        match c {
            '\\' => {
                out.push(c);
                escaped = true;
            }
            '"' => {
                out.push(c);
                in_string = false;
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => {}
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Envelope {
        posts: Vec<Post>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Post {
        platform: String,
        content: String,
    }

    const CLEAN: &str = r#"{"posts": [{"platform": "Twitter", "content": "hello"}]}"#;

    #[test]
    fn test_direct_parse_of_clean_json() {
        let parsed: Envelope = parse_repaired(CLEAN, "posts").unwrap();
        assert_eq!(parsed.posts.len(), 1);
        assert_eq!(parsed.posts[0].platform, "Twitter");
    }

    #[test]
    fn test_fenced_output_parses_same_as_unfenced() {
        let fenced = format!("```json\n{CLEAN}\n```");
        let a: Envelope = parse_repaired(&fenced, "posts").unwrap();
        let b: Envelope = parse_repaired(CLEAN, "posts").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bare_fence_without_json_tag() {
        let fenced = format!("```\n{CLEAN}\n```");
        let parsed: Envelope = parse_repaired(&fenced, "posts").unwrap();
        assert_eq!(parsed.posts[0].content, "hello");
    }

    #[test]
    fn test_control_chars_outside_strings_are_stripped() {
        let noisy = format!("\u{0}{CLEAN}\u{1f}");
        let parsed: Envelope = parse_repaired(&noisy, "posts").unwrap();
        assert_eq!(parsed.posts.len(), 1);
    }

    #[test]
    fn test_raw_newline_inside_string_is_repaired() {
        let raw = "{\"posts\": [{\"platform\": \"Twitter\", \"content\": \"line one\nline two\"}]}";
        let parsed: Envelope = parse_repaired(raw, "posts").unwrap();
        assert_eq!(parsed.posts[0].content, "line one\nline two");
    }

    #[test]
    fn test_repaired_equals_properly_escaped_equivalent() {
        let raw = "{\"posts\": [{\"platform\": \"Twitter\", \"content\": \"a\nb\"}]}";
        let escaped = r#"{"posts": [{"platform": "Twitter", "content": "a\nb"}]}"#;
        let a: Envelope = parse_repaired(raw, "posts").unwrap();
        let b: Envelope = parse_repaired(escaped, "posts").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_raw_tab_inside_string_is_repaired() {
        let raw = "{\"posts\": [{\"platform\": \"Twitter\", \"content\": \"a\tb\"}]}";
        let parsed: Envelope = parse_repaired(raw, "posts").unwrap();
        assert_eq!(parsed.posts[0].content, "a\tb");
    }

    #[test]
    fn test_carriage_return_inside_string_is_dropped() {
        let raw = "{\"posts\": [{\"platform\": \"Twitter\", \"content\": \"a\r\nb\"}]}";
        let parsed: Envelope = parse_repaired(raw, "posts").unwrap();
        assert_eq!(parsed.posts[0].content, "a\nb");
    }

    #[test]
    fn test_already_escaped_sequences_survive_repair() {
        let raw = "{\"posts\": [{\"platform\": \"Twitter\", \"content\": \"a\\nb\nc\"}]}";
        let parsed: Envelope = parse_repaired(raw, "posts").unwrap();
        assert_eq!(parsed.posts[0].content, "a\nb\nc");
    }

    #[test]
    fn test_missing_closing_bracket_fails_as_incomplete() {
        let truncated = r#"{"posts": [{"platform": "Twitter", "content": "hel"#;
        let result: Result<Envelope, _> = parse_repaired(truncated, "posts");
        assert!(matches!(result, Err(RepairError::Incomplete)));
    }

    #[test]
    fn test_missing_final_brace_fails_as_incomplete() {
        let truncated = r#"{"posts": [{"platform": "Twitter", "content": "hello"}]"#;
        let result: Result<Envelope, _> = parse_repaired(truncated, "posts");
        assert!(matches!(result, Err(RepairError::Incomplete)));
    }

    #[test]
    fn test_garbage_without_expected_key_fails_as_unparseable() {
        let garbage = "I'm sorry, I can't produce JSON for that request.";
        let result: Result<Envelope, _> = parse_repaired(garbage, "posts");
        assert!(matches!(result, Err(RepairError::Unparseable(_))));
    }

    #[test]
    fn test_wrong_shape_but_complete_fails_as_unparseable() {
        // Complete JSON without the posts key: not truncation
        let wrong = r#"{"results": []}"#;
        let result: Result<Envelope, _> = parse_repaired(wrong, "posts");
        assert!(matches!(result, Err(RepairError::Unparseable(_))));
    }
}
