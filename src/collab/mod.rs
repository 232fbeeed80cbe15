//! External collaborators the scoring engine can call on.
//!
//! Each capability is a trait object injected into the analyzer through a
//! [`Collaborators`] bundle. A missing capability is `None`, and the engine
//! falls back to its documented default for that signal.

pub mod gemini;
pub mod grammar;
pub mod lexical;
pub mod llm;
pub mod sentiment;

use anyhow::Result;

use crate::config::{Config, LlmSettings};

pub use gemini::{GeminiClient, GeminiFactory};
pub use grammar::{GrammarMatch, LanguageToolClient};
pub use lexical::Mtld;
pub use llm::{extract_json, LlmReply, RAW_KEY};
pub use sentiment::VaderSentiment;

pub trait GrammarChecker: Send + Sync {
    fn check(&self, text: &str) -> Result<Vec<GrammarMatch>>;
}

pub trait SentimentAnalyzer: Send + Sync {
    /// Compound polarity in [-1, 1].
    fn polarity(&self, text: &str) -> Result<f64>;
}

pub trait LexicalDiversity: Send + Sync {
    fn diversity_index(&self, text: &str) -> Result<f64>;
}

pub trait TextGenerator {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Ask for JSON and parse it best-effort. Never fails: errors and
    /// unparseable output come back as [`LlmReply::Raw`].
    fn generate_json(&self, prompt: &str, max_tokens: u32) -> LlmReply {
        match self.generate(prompt, max_tokens) {
            Ok(text) => extract_json(&text),
            Err(e) => {
                tracing::warn!("LLM call failed: {:#}", e);
                LlmReply::Raw(format!("{:#}", e))
            }
        }
    }
}

/// Builds a generator once an API key is known.
pub trait GeneratorFactory: Send + Sync {
    fn connect(&self, api_key: &str) -> Result<Box<dyn TextGenerator>>;
}

/// Capability bundle handed to the analyzer.
#[derive(Default)]
pub struct Collaborators {
    pub grammar: Option<Box<dyn GrammarChecker>>,
    pub sentiment: Option<Box<dyn SentimentAnalyzer>>,
    pub lexical: Option<Box<dyn LexicalDiversity>>,
    pub generator: Option<Box<dyn GeneratorFactory>>,
}

impl Collaborators {
    /// No collaborators at all: every signal takes its fallback.
    pub fn none() -> Self {
        Self::default()
    }

    /// Built-in collaborators that need no external service: lexicon
    /// sentiment, MTLD, and a Gemini client used only when a key is given.
    pub fn builtin() -> Self {
        Self {
            grammar: None,
            sentiment: Some(Box::new(VaderSentiment::new())),
            lexical: Some(Box::new(Mtld::default())),
            generator: Some(Box::new(GeminiFactory::new(LlmSettings::default()))),
        }
    }

    /// Build the real collaborators enabled by the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let grammar_config = config.grammar.clone().unwrap_or_default();
        let grammar: Option<Box<dyn GrammarChecker>> = match grammar_config.server_url {
            Some(ref url) => {
                tracing::debug!("Grammar checks via LanguageTool at {}", url);
                Some(Box::new(LanguageToolClient::new(
                    url,
                    grammar_config.language(),
                    grammar_config.timeout()?,
                )?))
            }
            None => {
                tracing::info!("No grammar server configured; grammar checks are disabled");
                None
            }
        };

        let sentiment: Option<Box<dyn SentimentAnalyzer>> =
            if config.sentiment.as_ref().and_then(|s| s.enabled).unwrap_or(true) {
                Some(Box::new(VaderSentiment::new()))
            } else {
                tracing::info!("Sentiment analysis disabled; engagement uses the fallback score");
                None
            };

        let vocabulary = config.vocabulary.clone().unwrap_or_default();
        let lexical: Option<Box<dyn LexicalDiversity>> = if vocabulary.mtld.unwrap_or(true) {
            Some(Box::new(Mtld::new(vocabulary.mtld_threshold())))
        } else {
            None
        };

        let llm = config.llm.clone().unwrap_or_default();
        let generator: Option<Box<dyn GeneratorFactory>> =
            Some(Box::new(GeminiFactory::new(llm.settings()?)));

        Ok(Self {
            grammar,
            sentiment,
            lexical,
            generator,
        })
    }
}
