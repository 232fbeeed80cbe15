use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::collab::LlmReply;
use crate::scoring::{
    total_weight, Criterion, ScoreResult, ScoreSource, ENGAGEMENT_FEEDBACK_KEY,
    GRAMMAR_FEEDBACK_KEY,
};

/// Criterion label column width, fits "Salutation & Flow" with room to spare
const LABEL_WIDTH: usize = 20;
const DEFAULT_BAR_WIDTH: usize = 20;
const MAX_BAR_WIDTH: usize = 40;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Bar width for the current terminal: whatever is left after the fixed
/// columns, between 10 and 40 cells.
fn bar_width(term_width: Option<usize>) -> usize {
    match term_width {
        Some(width) => width.saturating_sub(LABEL_WIDTH + 24).clamp(10, MAX_BAR_WIDTH),
        None => DEFAULT_BAR_WIDTH,
    }
}

/// Format a 0-100 score with one decimal ("58.0")
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Render `score` (0-100) as a fixed-width bar of filled and empty cells.
fn score_bar(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

fn source_tag(source: ScoreSource) -> &'static str {
    match source {
        ScoreSource::Rules => "",
        ScoreSource::Llm => " (llm)",
    }
}

/// Human-readable report: overall score, one line per criterion, then any
/// LLM feedback.
pub fn format_text(result: &ScoreResult, use_colors: bool) -> String {
    let width = bar_width(get_terminal_width());
    let mut lines = Vec::new();

    let overall = format!("Overall score: {} / 100", format_score(result.final_score));
    lines.push(if use_colors {
        overall.bold().to_string()
    } else {
        overall
    });
    lines.push(format!(
        "Words: {}  Speech rate: {:.0} wpm",
        result.signals.word_count, result.signals.wpm
    ));
    lines.push(String::new());

    for (criterion, entry) in &result.breakdown {
        let label = format!("{:<width$}", criterion.label(), width = LABEL_WIDTH);
        let score = format!("{:>5}", format_score(entry.score));
        let weight = format!("({:>2}%)", entry.weight);
        let bar = score_bar(entry.score, width);
        let tag = source_tag(entry.source);

        if use_colors {
            let bar = if entry.score >= 75.0 {
                bar.green().to_string()
            } else if entry.score >= 50.0 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            };
            lines.push(format!(
                "{} {} {} {}{}",
                label,
                score.bold(),
                weight.dimmed(),
                bar,
                tag.cyan()
            ));
        } else {
            lines.push(format!("{} {} {} {}{}", label, score, weight, bar, tag));
        }
    }

    if let Some(reply) = &result.signals.llm {
        lines.push(String::new());
        if let LlmReply::Raw(note) = reply {
            lines.push(format!("LLM reply not usable: {}", note));
        } else {
            for (title, key) in [
                ("Grammar feedback", GRAMMAR_FEEDBACK_KEY),
                ("Engagement feedback", ENGAGEMENT_FEEDBACK_KEY),
            ] {
                if let Some(text) = reply.text(key) {
                    if use_colors {
                        lines.push(format!("{}: {}", title.bold(), text));
                    } else {
                        lines.push(format!("{}: {}", title, text));
                    }
                }
            }
        }
    }

    lines.join("\n")
}

/// Format the full result as pretty JSON
pub fn format_json(result: &ScoreResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Format as tab-separated values for scripting
/// Columns: criterion key, score, weight, source (no headers, no colors);
/// the last line is `final\t<score>\t<total weight>\t-`
pub fn format_tsv(result: &ScoreResult) -> String {
    let mut lines: Vec<String> = result
        .breakdown
        .iter()
        .map(|(criterion, entry)| {
            let source = match entry.source {
                ScoreSource::Rules => "rules",
                ScoreSource::Llm => "llm",
            };
            format!(
                "{}\t{}\t{}\t{}",
                criterion.key(),
                format_score(entry.score),
                entry.weight,
                source
            )
        })
        .collect();
    lines.push(format!(
        "final\t{}\t{}\t-",
        format_score(result.final_score),
        total_weight()
    ));
    lines.join("\n")
}

/// The rubric table printed by `speakcheck rubric`
pub fn format_rubric(use_colors: bool) -> String {
    let mut lines: Vec<String> = Criterion::ALL
        .iter()
        .map(|criterion| {
            let label = format!("{:<width$}", criterion.label(), width = LABEL_WIDTH);
            let weight = format!("{:>3}", criterion.weight());
            if use_colors {
                format!("{} {}  {}", label, weight.bold(), criterion.key().dimmed())
            } else {
                format!("{} {}  {}", label, weight, criterion.key())
            }
        })
        .collect();
    lines.push(format!(
        "{:<width$} {:>3}",
        "Total",
        total_weight(),
        width = LABEL_WIDTH
    ));
    lines.join("\n")
}
