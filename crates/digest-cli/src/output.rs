use std::io::Write;

use digest_core::{ExtractedDocument, SummaryOptions, SummaryResult, markup};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    /// Color only when not disabled and the stream is a terminal.
    pub fn for_stream(no_color: bool, is_terminal: bool) -> Self {
        ColorMode(!no_color && is_terminal)
    }

    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// How a summary is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Render {
    /// `**bold**` spans shown with terminal bold.
    #[default]
    Terminal,
    /// Bold spans as `<strong>` tags.
    Html,
    /// Tags stripped, as copied to the clipboard.
    Plain,
}

/// Print a one-line note about what is being summarized.
pub fn print_request_summary(
    w: &mut dyn Write,
    source: &str,
    chars: usize,
    options: &SummaryOptions,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!(
        "Summarizing {} ({} chars): {} audience, {}, ~{} words{}",
        source,
        chars,
        options.audience.token(),
        options.output_format.token(),
        options.word_count,
        if options.critical_analysis {
            ", with critical analysis"
        } else {
            ""
        }
    );
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{}", line)
    }
}

/// Write the generated summary in the requested form.
pub fn print_summary(
    w: &mut dyn Write,
    summary: &SummaryResult,
    render: Render,
    color: ColorMode,
) -> std::io::Result<()> {
    let rendered = match render {
        Render::Html => summary.to_html(),
        Render::Plain => summary.to_plain_text(),
        Render::Terminal => {
            for (segment, bold) in markup::bold_segments(&summary.text) {
                if bold && color.enabled() {
                    write!(w, "{}", segment.bold())?;
                } else {
                    write!(w, "{}", segment)?;
                }
            }
            if !summary.text.ends_with('\n') {
                writeln!(w)?;
            }
            return Ok(());
        }
    };

    write!(w, "{}", rendered)?;
    if !rendered.ends_with('\n') {
        writeln!(w)?;
    }
    Ok(())
}

/// Write extracted text verbatim.
pub fn print_extracted(w: &mut dyn Write, document: &ExtractedDocument) -> std::io::Result<()> {
    w.write_all(document.text.as_bytes())?;
    if !document.text.ends_with('\n') {
        writeln!(w)?;
    }
    Ok(())
}

/// Print a user-facing error message.
pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "Error:".red().bold(), message)
    } else {
        writeln!(w, "Error: {}", message)
    }
}
