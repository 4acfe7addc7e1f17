//! Prompt construction for the generation service.

use crate::locale::Locale;
use crate::options::SummaryOptions;

pub const PAPER_BEGIN_MARKER: &str = "\n--- PAPER TEXT BEGINS ---\n";
pub const PAPER_END_MARKER: &str = "\n--- PAPER TEXT ENDS ---";

/// A composed request: the fixed system instruction and the user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_prompt: String,
}

/// Compose the prompt for `paper_text` in `locale`.
///
/// Lines are emitted in a fixed order: header, task, length, audience,
/// focus, the optional critical-analysis line, then the paper text between
/// begin/end markers. The paper text is copied verbatim.
pub fn build_prompt(paper_text: &str, options: &SummaryOptions, locale: Locale) -> Prompt {
    let t = locale.phrases();

    let mut lines: Vec<String> = vec![
        t.header.to_string(),
        t.task.replace("{outputFormat}", t.format_label(options.output_format)),
        t.length.replace("{wordCount}", &options.word_count.to_string()),
        t.audience.replace("{audience}", t.audience_label(options.audience)),
        t.focus.to_string(),
    ];

    if options.critical_analysis {
        lines.push(t.analysis.to_string());
    }

    lines.push(PAPER_BEGIN_MARKER.to_string());
    lines.push(paper_text.to_string());
    lines.push(PAPER_END_MARKER.to_string());

    Prompt {
        system_instruction: t.system_instruction.to_string(),
        user_prompt: lines.join("\n"),
    }
}
