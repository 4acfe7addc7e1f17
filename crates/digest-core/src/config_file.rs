use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::options::{Audience, OutputFormat, SummaryOptions, WordCount};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api_keys: Option<ApiKeysConfig>,
    pub generation: Option<GenerationConfig>,
    pub summary: Option<SummaryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub word_count: Option<u16>,
    pub output_format: Option<OutputFormat>,
    pub audience: Option<Audience>,
    pub critical_analysis: Option<bool>,
    pub locale: Option<String>,
}

impl ConfigFile {
    /// Summary defaults from the `[summary]` table.
    ///
    /// An illegal `word_count` is ignored with a warning rather than
    /// rejecting the whole file.
    pub fn summary_options(&self) -> SummaryOptions {
        let defaults = SummaryOptions::default();
        let Some(summary) = self.summary.as_ref() else {
            return defaults;
        };

        let word_count = match summary.word_count {
            Some(n) => WordCount::new(n).unwrap_or_else(|| {
                tracing::warn!(word_count = n, "ignoring illegal word_count in config");
                defaults.word_count
            }),
            None => defaults.word_count,
        };

        SummaryOptions {
            word_count,
            output_format: summary.output_format.unwrap_or(defaults.output_format),
            audience: summary.audience.unwrap_or(defaults.audience),
            critical_analysis: summary
                .critical_analysis
                .unwrap_or(defaults.critical_analysis),
        }
    }

    pub fn locale(&self) -> Option<Locale> {
        self.summary
            .as_ref()
            .and_then(|s| s.locale.as_deref())
            .map(Locale::from_tag)
    }

    pub fn gemini_api_key(&self) -> Option<String> {
        self.api_keys.as_ref().and_then(|a| a.gemini_api_key.clone())
    }

    pub fn model(&self) -> Option<String> {
        self.generation.as_ref().and_then(|g| g.model.clone())
    }

    pub fn endpoint(&self) -> Option<String> {
        self.generation.as_ref().and_then(|g| g.endpoint.clone())
    }
}

/// Platform config directory path: `<config_dir>/academia-digest/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("academia-digest").join("config.toml"))
}

/// Load config by cascading CWD `.academia-digest.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".academia-digest.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api_keys: Some(ApiKeysConfig {
            gemini_api_key: overlay
                .api_keys
                .as_ref()
                .and_then(|a| a.gemini_api_key.clone())
                .or_else(|| base.api_keys.as_ref().and_then(|a| a.gemini_api_key.clone())),
        }),
        generation: Some(GenerationConfig {
            model: overlay
                .generation
                .as_ref()
                .and_then(|g| g.model.clone())
                .or_else(|| base.generation.as_ref().and_then(|g| g.model.clone())),
            endpoint: overlay
                .generation
                .as_ref()
                .and_then(|g| g.endpoint.clone())
                .or_else(|| base.generation.as_ref().and_then(|g| g.endpoint.clone())),
        }),
        summary: Some(SummaryConfig {
            word_count: overlay
                .summary
                .as_ref()
                .and_then(|s| s.word_count)
                .or_else(|| base.summary.as_ref().and_then(|s| s.word_count)),
            output_format: overlay
                .summary
                .as_ref()
                .and_then(|s| s.output_format)
                .or_else(|| base.summary.as_ref().and_then(|s| s.output_format)),
            audience: overlay
                .summary
                .as_ref()
                .and_then(|s| s.audience)
                .or_else(|| base.summary.as_ref().and_then(|s| s.audience)),
            critical_analysis: overlay
                .summary
                .as_ref()
                .and_then(|s| s.critical_analysis)
                .or_else(|| base.summary.as_ref().and_then(|s| s.critical_analysis)),
            locale: overlay
                .summary
                .as_ref()
                .and_then(|s| s.locale.clone())
                .or_else(|| base.summary.as_ref().and_then(|s| s.locale.clone())),
        }),
    }
}

/// A starter config: the default model and summary settings, no API key.
pub fn default_config() -> ConfigFile {
    let options = SummaryOptions::default();
    ConfigFile {
        api_keys: None,
        generation: Some(GenerationConfig {
            model: Some(crate::client::gemini::DEFAULT_MODEL.to_string()),
            endpoint: None,
        }),
        summary: Some(SummaryConfig {
            word_count: Some(options.word_count.get()),
            output_format: Some(options.output_format),
            audience: Some(options.audience),
            critical_analysis: Some(options.critical_analysis),
            locale: Some(Locale::default().tag().to_string()),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}
