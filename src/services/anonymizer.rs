use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::prompt::{user_prompt, SYSTEM_PROMPT};

/// Sampling temperature for every analysis request.
pub const TEMPERATURE: f32 = 0.7;

const REFERER: &str = "https://github.com/OpenRouterTeam/openrouter-python";
const APP_TITLE: &str = "PDF Anonymizer";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for the OpenAI-compatible completion endpoint that performs the
/// anonymization.
#[derive(Debug, Clone)]
pub struct Anonymizer {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl Anonymizer {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Sends the CV text with the redaction instructions and returns the
    /// model's answer unmodified.
    pub async fn request(&self, text: &str) -> AppResult<String> {
        let start = Instant::now();
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("OPENAI_API_KEY is not set"))?;

        let prompt = user_prompt(text);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            temperature: TEMPERATURE,
        };

        info!(model = %self.model, input_chars = text.chars().count(), "Sending CV to completion service");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "completion service returned {}: {}",
                status, error_text
            )));
        }

        let raw = response.text().await?;
        let content = parse_completion(&raw)?;

        info!(
            output_chars = content.chars().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Successfully analyzed CV data"
        );
        Ok(content)
    }
}

fn parse_completion(raw: &str) -> AppResult<String> {
    let parsed: ChatCompletionResponse = serde_json::from_str(raw).map_err(|e| {
        debug!(body = %raw, "Unexpected completion payload");
        AppError::upstream(format!("malformed completion response: {}", e))
    })?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AppError::upstream("Invalid response from completion service: no choices"))?;

    choice
        .message
        .and_then(|message| message.content)
        .ok_or_else(|| AppError::upstream("Invalid response from completion service: no message content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_content() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"[NAME]"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(parse_completion(raw).unwrap(), "[NAME]");
    }

    #[test]
    fn empty_choices_is_an_upstream_error() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, AppError::UpstreamError { .. }));

        let err = parse_completion(r#"{"object":"error"}"#).unwrap_err();
        assert!(matches!(err, AppError::UpstreamError { .. }));
    }

    #[test]
    fn missing_message_is_an_upstream_error() {
        let err = parse_completion(r#"{"choices":[{"index":0}]}"#).unwrap_err();
        assert!(matches!(err, AppError::UpstreamError { .. }));
    }

    #[test]
    fn non_json_body_is_an_upstream_error() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::UpstreamError { .. }));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let config = Config {
            api_base: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let err = Anonymizer::new(&config).request("text").await.unwrap_err();
        assert!(matches!(err, AppError::ConfigError { .. }));
    }
}
