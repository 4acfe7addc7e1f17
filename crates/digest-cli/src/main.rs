use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use digest_core::client::GeminiBackend;
use digest_core::config_file;
use digest_core::{Audience, DigestError, Locale, OutputFormat, SummaryClient, WordCount};
use digest_ingest::Extractor;

mod controller;
mod output;
mod settings;

use controller::PaperInput;
use output::{ColorMode, Render};
use settings::Overrides;

/// Academia Digest - Summarize academic papers for different audiences
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a .txt, .pdf, .docx or .doc paper
    Summarize {
        /// Paper to summarize; `-` reads text from stdin
        file: Option<PathBuf>,

        /// Paper text given directly instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Target audience: academic, executive, public, student
        #[arg(long)]
        audience: Option<Audience>,

        /// Output format: paragraph, bullet-points
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Approximate summary length (100 to 500, in steps of 50)
        #[arg(long)]
        word_count: Option<WordCount>,

        /// Add a critical analysis section
        #[arg(long, overrides_with = "no_critical_analysis")]
        critical_analysis: bool,

        /// Leave out the critical analysis section, even if the config enables it
        #[arg(long, overrides_with = "critical_analysis")]
        no_critical_analysis: bool,

        /// Output language: en, zh-TW
        #[arg(long)]
        locale: Option<String>,

        /// Gemini API key
        #[arg(long)]
        api_key: Option<String>,

        /// Gemini model name
        #[arg(long)]
        model: Option<String>,

        /// How to write the summary
        #[arg(long, value_enum, default_value_t = Render::Terminal)]
        render: Render,

        /// Write the summary to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the plain text extracted from a paper
    Extract {
        /// Path to the .txt, .pdf, .docx or .doc file
        file: PathBuf,

        /// Write the text to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the platform config file path
    Path,
    /// Print the merged configuration
    Show,
    /// Write a config file with the default summary settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Summarize {
            file,
            text,
            audience,
            format,
            word_count,
            critical_analysis,
            no_critical_analysis,
            locale,
            api_key,
            model,
            render,
            output,
            no_color,
        } => {
            let overrides = Overrides {
                api_key,
                model,
                locale,
                audience,
                output_format: format,
                word_count,
                critical_analysis: settings::flag_pair(critical_analysis, no_critical_analysis),
            };
            summarize(
                PaperInput::from_args(file, text),
                overrides,
                render,
                output,
                no_color,
            )
            .await
        }
        Command::Extract {
            file,
            output,
            no_color,
        } => extract(file, output, no_color),
        Command::Config { action } => config(action),
    }
}

async fn summarize(
    input: Option<PaperInput>,
    overrides: Overrides,
    render: Render,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<ExitCode> {
    let config = config_file::load_config();
    let settings = settings::resolve(&overrides, &config, &settings::process_env);
    let locale = settings.locale;

    let color = ColorMode::for_stream(
        no_color || output.is_some(),
        std::io::stdout().is_terminal(),
    );
    let status_color = stderr_color(no_color);
    let mut stderr = std::io::stderr();

    let document = match controller::load_paper(input, &Extractor::new()) {
        Ok(document) => document,
        Err(e) => return report(&mut stderr, &e, locale, status_color),
    };

    if !document.text.trim().is_empty() {
        output::print_request_summary(
            &mut stderr,
            &document.file_name,
            document.text.chars().count(),
            &settings.options,
            status_color,
        )?;
    }

    let backend = GeminiBackend::new()
        .with_model(settings.model)
        .with_endpoint(settings.endpoint);
    let client = SummaryClient::new(Arc::new(backend), settings.credential);

    let summary =
        match controller::summarize(&client, &document.text, &settings.options, locale).await {
            Ok(summary) => summary,
            Err(e) => return report(&mut stderr, &e, locale, status_color),
        };

    let mut writer: Box<dyn Write> = if let Some(ref path) = output {
        Box::new(std::fs::File::create(path)?)
    } else {
        Box::new(std::io::stdout())
    };
    output::print_summary(&mut writer, &summary, render, color)?;
    writer.flush()?;

    if let Some(ref path) = output {
        eprintln!("Summary written to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn extract(file: PathBuf, output: Option<PathBuf>, no_color: bool) -> anyhow::Result<ExitCode> {
    let config = config_file::load_config();
    let locale = settings::resolve(&Overrides::default(), &config, &settings::process_env).locale;
    let document = match controller::extract_file(&Extractor::new(), file) {
        Ok(document) => document,
        Err(e) => return report(&mut std::io::stderr(), &e, locale, stderr_color(no_color)),
    };

    let mut writer: Box<dyn Write> = if let Some(ref path) = output {
        Box::new(std::fs::File::create(path)?)
    } else {
        Box::new(std::io::stdout())
    };
    output::print_extracted(&mut writer, &document)?;
    writer.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn config(action: ConfigAction) -> anyhow::Result<ExitCode> {
    match action {
        ConfigAction::Path => match config_file::config_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine config directory"),
        },
        ConfigAction::Show => {
            let mut config = config_file::load_config();
            if let Some(keys) = config.api_keys.as_mut()
                && keys.gemini_api_key.is_some()
            {
                keys.gemini_api_key = Some("***".to_string());
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            if let Some(path) = config_file::config_path()
                && path.exists()
                && !force
            {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite it.",
                    path.display()
                );
            }
            let path = config_file::save_config(&config_file::default_config())
                .map_err(anyhow::Error::msg)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Color for status and error lines on stderr.
fn stderr_color(no_color: bool) -> ColorMode {
    ColorMode::for_stream(no_color, std::io::stderr().is_terminal())
}

/// Print the localized message for `err` and signal failure.
fn report(
    w: &mut dyn Write,
    err: &DigestError,
    locale: Locale,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    tracing::debug!(kind = err.kind().key(), error = ?err, "request failed");
    output::print_error(w, err.localized(locale), color)?;
    Ok(ExitCode::FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("academia-digest").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    fn critical_override(args: &[&str]) -> Option<bool> {
        match parse(args) {
            Command::Summarize {
                critical_analysis,
                no_critical_analysis,
                ..
            } => settings::flag_pair(critical_analysis, no_critical_analysis),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn critical_analysis_flags_override_each_other() {
        assert_eq!(critical_override(&["summarize", "a.txt"]), None);
        assert_eq!(
            critical_override(&["summarize", "a.txt", "--critical-analysis"]),
            Some(true)
        );
        assert_eq!(
            critical_override(&["summarize", "a.txt", "--no-critical-analysis"]),
            Some(false)
        );
        assert_eq!(
            critical_override(&[
                "summarize",
                "a.txt",
                "--critical-analysis",
                "--no-critical-analysis"
            ]),
            Some(false)
        );
    }

    #[test]
    fn extract_accepts_no_color() {
        match parse(&["extract", "paper.pdf", "--no-color"]) {
            Command::Extract { file, no_color, .. } => {
                assert_eq!(file, PathBuf::from("paper.pdf"));
                assert!(no_color);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn illegal_word_count_is_a_usage_error() {
        let err = Cli::try_parse_from(["academia-digest", "summarize", "--word-count", "125"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
