use serde::Serialize;

use crate::collab::{GrammarChecker, GrammarMatch};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarEvidence {
    pub enabled: bool,
    pub errors: Option<usize>,
    pub matches: Option<Vec<GrammarMatch>>,
}

impl GrammarEvidence {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            errors: None,
            matches: None,
        }
    }
}

/// Run the grammar checker, degrading to the disabled sentinel when there is
/// no checker or the check fails.
pub fn grammar_evidence(checker: Option<&dyn GrammarChecker>, transcript: &str) -> GrammarEvidence {
    let Some(checker) = checker else {
        return GrammarEvidence::disabled();
    };
    match checker.check(transcript) {
        Ok(matches) => GrammarEvidence {
            enabled: true,
            errors: Some(matches.len()),
            matches: Some(matches),
        },
        Err(e) => {
            tracing::warn!("Grammar check failed: {:#}", e);
            GrammarEvidence::disabled()
        }
    }
}
