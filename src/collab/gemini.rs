use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::{GeneratorFactory, TextGenerator};
use crate::config::LlmSettings;

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    settings: LlmSettings,
}

impl GeminiClient {
    pub fn new(api_key: &str, settings: LlmSettings) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            bail!("Gemini API key is empty");
        }
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("speakcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            settings,
        })
    }
}

pub(crate) fn generate_url(endpoint: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", endpoint.trim_end_matches('/'), model)
}

pub(crate) fn request_body(prompt: &str, max_tokens: u32) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": { "maxOutputTokens": max_tokens }
    })
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn response_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Candidate text, or an error naming why there is none (blocked prompt,
/// `MAX_TOKENS` before any text) so the reply is recorded as raw.
pub(crate) fn reply_text(body: &Value) -> Result<String> {
    if let Some(text) = response_text(body) {
        return Ok(text);
    }
    let reason = body
        .pointer("/candidates/0/finishReason")
        .or_else(|| body.pointer("/promptFeedback/blockReason"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    bail!("Gemini returned no text (reason: {}): {}", reason, body)
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        tracing::debug!("Requesting {} (max {} tokens)", self.settings.model, max_tokens);

        let response = self
            .http
            .post(generate_url(&self.settings.endpoint, &self.settings.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, max_tokens))
            .send()
            .context("Failed to reach Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("Gemini API returned {}: {}", status, body);
        }

        let body: Value = response.json().context("Failed to parse Gemini response")?;
        reply_text(&body)
    }
}

/// Creates [`GeminiClient`]s from a per-call API key.
pub struct GeminiFactory {
    settings: LlmSettings,
}

impl GeminiFactory {
    pub fn new(settings: LlmSettings) -> Self {
        Self { settings }
    }
}

impl GeneratorFactory for GeminiFactory {
    fn connect(&self, api_key: &str) -> Result<Box<dyn TextGenerator>> {
        Ok(Box::new(GeminiClient::new(api_key, self.settings.clone())?))
    }
}
