/// LLM Client — the single point of entry for all OpenRouter calls in VibeScribe.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: deepseek/deepseek-r1 (hardcoded — do not make configurable to prevent drift)
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod repair;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// The model used for all LLM calls in VibeScribe.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "deepseek/deepseek-r1";
/// Raised for creative diversity across post variations.
const TEMPERATURE: f32 = 0.85;
/// Output budget per selected platform (3 variations each).
const MAX_TOKENS_PER_PLATFORM: u32 = 1500;
/// Floor so small selections still fit nine-post-sized responses.
const MIN_MAX_TOKENS: u32 = 4000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Rate limited by generation API: {message}")]
    RateLimited { message: String },

    #[error("Insufficient quota: {message}")]
    InsufficientQuota { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM response truncated (finish_reason: {finish_reason})")]
    Truncated { finish_reason: String },
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Scales the output token budget with the number of selected platforms.
pub fn max_tokens_for(platform_count: usize) -> u32 {
    (MAX_TOKENS_PER_PLATFORM * platform_count as u32).max(MIN_MAX_TOKENS)
}

/// Classifies a non-success upstream status into a distinct error kind.
fn classify_status(status: u16, message: String) -> LlmError {
    match status {
        401 | 403 => LlmError::Auth { status, message },
        402 => LlmError::InsufficientQuota { message },
        429 => LlmError::RateLimited { message },
        _ => LlmError::Api { status, message },
    }
}

/// The single LLM client used by the generation pipeline.
/// Wraps the OpenRouter chat-completions API. One request per invocation —
/// no retry, no backoff, no streaming; failures surface immediately.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    site_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, site_url: String, timeout: std::time::Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            site_url,
        }
    }

    /// Submits a system + user prompt pair and returns the raw text payload
    /// of the model's response.
    pub async fn call(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", "VibeScribe")
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the provider's error envelope for a cleaner message
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_status(status.as_u16(), message));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(LlmError::Http)?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyContent)?;

        // A "length" stop means the model ran out of output budget mid-JSON.
        // Surface it distinctly rather than handing garbage to the parser.
        if let Some(reason) = choice.finish_reason.as_deref() {
            if reason == "length" {
                return Err(LlmError::Truncated {
                    finish_reason: reason.to_string(),
                });
            }
        }

        let text = choice.message.content.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!("LLM call succeeded: {} chars of output", text.len());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_401_as_auth() {
        let e = classify_status(401, "bad key".to_string());
        assert!(matches!(e, LlmError::Auth { status: 401, .. }));
    }

    #[test]
    fn test_classify_403_as_auth() {
        let e = classify_status(403, "forbidden".to_string());
        assert!(matches!(e, LlmError::Auth { status: 403, .. }));
    }

    #[test]
    fn test_classify_402_as_insufficient_quota() {
        let e = classify_status(402, "out of credits".to_string());
        assert!(matches!(e, LlmError::InsufficientQuota { .. }));
    }

    #[test]
    fn test_classify_429_as_rate_limited() {
        let e = classify_status(429, "slow down".to_string());
        assert!(matches!(e, LlmError::RateLimited { .. }));
    }

    #[test]
    fn test_classify_500_as_generic_api_error() {
        let e = classify_status(500, "oops".to_string());
        assert!(matches!(e, LlmError::Api { status: 500, .. }));
    }

    #[test]
    fn test_max_tokens_floor_for_small_selections() {
        assert_eq!(max_tokens_for(1), MIN_MAX_TOKENS);
        assert_eq!(max_tokens_for(2), MIN_MAX_TOKENS);
    }

    #[test]
    fn test_max_tokens_scales_with_platform_count() {
        assert_eq!(max_tokens_for(4), 6000);
        assert_eq!(max_tokens_for(6), 9000);
    }

    #[test]
    fn test_chat_response_deserializes() {
        let json = r#"{
            "choices": [
                {
                    "message": {"role": "assistant", "content": "{\"posts\": []}"},
                    "finish_reason": "stop"
                }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"posts\": []}")
        );
    }
}
