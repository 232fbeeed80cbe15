use crate::collab::{GeneratorFactory, LlmReply};

pub const GRAMMAR_SCORE_KEY: &str = "grammar_score";
pub const GRAMMAR_FEEDBACK_KEY: &str = "grammar_feedback";
pub const ENGAGEMENT_SCORE_KEY: &str = "engagement_score";
pub const ENGAGEMENT_FEEDBACK_KEY: &str = "engagement_feedback";

const NOT_CONFIGURED: &str = "LLM client not installed or not configured.";

pub fn build_prompt(transcript: &str) -> String {
    format!(
        "You are an objective grader. Return JSON with keys:\n\
         {GRAMMAR_SCORE_KEY} (0-100), {GRAMMAR_FEEDBACK_KEY} (short), \
         {ENGAGEMENT_SCORE_KEY} (0-100), {ENGAGEMENT_FEEDBACK_KEY} (short).\n\n\
         Transcript: '''{transcript}'''\nReturn JSON only."
    )
}

/// Ask the generative-text collaborator to grade grammar and engagement.
/// Every failure is folded into an [`LlmReply::Raw`].
pub fn request_refinement(
    factory: Option<&dyn GeneratorFactory>,
    api_key: &str,
    transcript: &str,
    max_tokens: u32,
) -> LlmReply {
    let Some(factory) = factory else {
        tracing::warn!("No LLM client configured; keeping deterministic scores");
        return LlmReply::Raw(NOT_CONFIGURED.to_string());
    };

    let generator = match factory.connect(api_key) {
        Ok(g) => g,
        Err(e) => {
            tracing::warn!("LLM scoring failed (continuing with deterministic scores): {:#}", e);
            return LlmReply::Raw(format!("{:#}", e));
        }
    };

    generator.generate_json(&build_prompt(transcript), max_tokens)
}

/// An LLM-provided sub-score, clamped to [0, 100]. Missing or non-numeric
/// values yield `None` and leave the deterministic score in place.
pub fn llm_score(reply: &LlmReply, key: &str) -> Option<f64> {
    reply.number(key).map(|v| v.clamp(0.0, 100.0))
}
