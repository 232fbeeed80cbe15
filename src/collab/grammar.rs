use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::GrammarChecker;

/// One issue reported by the grammar checker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarMatch {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    pub rule_id: String,
    pub replacements: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    message: String,
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
    rule: Option<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
}

impl From<RawMatch> for GrammarMatch {
    fn from(raw: RawMatch) -> Self {
        GrammarMatch {
            message: raw.message,
            offset: raw.offset,
            length: raw.length,
            rule_id: raw.rule.map(|r| r.id).unwrap_or_default(),
            replacements: raw.replacements.into_iter().map(|r| r.value).collect(),
        }
    }
}

pub(crate) fn parse_check_response(body: &str) -> Result<Vec<GrammarMatch>> {
    let response: CheckResponse =
        serde_json::from_str(body).context("Failed to parse LanguageTool response")?;
    Ok(response.matches.into_iter().map(GrammarMatch::from).collect())
}

pub(crate) fn check_url(server_url: &str) -> String {
    format!("{}/v2/check", server_url.trim_end_matches('/'))
}

/// Client for a LanguageTool-compatible `/v2/check` server.
pub struct LanguageToolClient {
    http: Client,
    check_url: String,
    language: String,
}

impl LanguageToolClient {
    pub fn new(server_url: &str, language: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            check_url: check_url(server_url),
            language: language.to_string(),
        })
    }
}

impl GrammarChecker for LanguageToolClient {
    fn check(&self, text: &str) -> Result<Vec<GrammarMatch>> {
        let response = self
            .http
            .post(&self.check_url)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .with_context(|| format!("Failed to reach grammar server at {}", self.check_url))?;

        let status = response.status();
        let body = response.text().context("Failed to read grammar server response")?;
        if !status.is_success() {
            bail!("Grammar server returned {}: {}", status, body);
        }
        parse_check_response(&body)
    }
}
