//! Resolve effective settings: CLI flags > env vars > config file > defaults.

use digest_core::client::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use digest_core::config_file::ConfigFile;
use digest_core::{Audience, Locale, OutputFormat, SummaryOptions, WordCount};

/// Values given on the command line; `None` defers to lower layers.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub locale: Option<String>,
    pub audience: Option<Audience>,
    pub output_format: Option<OutputFormat>,
    pub word_count: Option<WordCount>,
    pub critical_analysis: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credential: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub locale: Locale,
    pub options: SummaryOptions,
}

/// Environment variables holding the Gemini key, in lookup order.
const CREDENTIAL_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Locale variables, in POSIX lookup order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Combine an `--x` / `--no-x` flag pair into an optional override.
pub fn flag_pair(enabled: bool, disabled: bool) -> Option<bool> {
    match (enabled, disabled) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// The session locale from the environment, e.g. `zh_TW.UTF-8` -> `zh-TW`.
///
/// `C` / `POSIX` and unknown languages resolve to English.
fn system_locale(env: &dyn Fn(&str) -> Option<String>) -> Option<Locale> {
    let value = LOCALE_VARS.iter().find_map(|name| env(name))?;
    let tag = value.split(['.', '@']).next().unwrap_or_default();
    Some(Locale::from_tag(tag))
}

/// Read a process environment variable, treating blank values as unset.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn resolve(
    overrides: &Overrides,
    config: &ConfigFile,
    env: &dyn Fn(&str) -> Option<String>,
) -> Settings {
    let credential = overrides
        .api_key
        .clone()
        .or_else(|| CREDENTIAL_VARS.iter().find_map(|name| env(name)))
        .or_else(|| config.gemini_api_key());

    let model = overrides
        .model
        .clone()
        .or_else(|| env("DIGEST_MODEL"))
        .or_else(|| config.model())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let endpoint = env("DIGEST_ENDPOINT")
        .or_else(|| config.endpoint())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let locale = overrides
        .locale
        .as_deref()
        .map(Locale::from_tag)
        .or_else(|| config.locale())
        .or_else(|| system_locale(env))
        .unwrap_or_default();

    let base = config.summary_options();
    let options = SummaryOptions {
        word_count: overrides.word_count.unwrap_or(base.word_count),
        output_format: overrides.output_format.unwrap_or(base.output_format),
        audience: overrides.audience.unwrap_or(base.audience),
        critical_analysis: overrides.critical_analysis.unwrap_or(base.critical_analysis),
    };

    tracing::debug!(
        model = %model,
        endpoint = %endpoint,
        locale = %locale,
        has_credential = credential.is_some(),
        "resolved settings"
    );

    Settings {
        credential,
        model,
        endpoint,
        locale,
        options,
    }
}
