pub mod formatter;

pub use formatter::{
    format_json, format_rubric, format_score, format_text, format_tsv, should_use_colors,
};

/// Report format for `speakcheck analyze`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Tsv,
}
