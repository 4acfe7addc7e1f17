//! Summary options chosen by the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested summary length in words.
///
/// Only values in `[100, 500]` that are a multiple of 50 can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct WordCount(u16);

impl WordCount {
    pub const MIN: u16 = 100;
    pub const MAX: u16 = 500;
    pub const STEP: u16 = 50;
    pub const DEFAULT: WordCount = WordCount(250);

    pub fn new(value: u16) -> Option<Self> {
        let in_range = (Self::MIN..=Self::MAX).contains(&value);
        (in_range && value % Self::STEP == 0).then_some(Self(value))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Every legal value, ascending.
    pub fn all() -> impl Iterator<Item = WordCount> {
        (Self::MIN..=Self::MAX)
            .step_by(Self::STEP as usize)
            .map(WordCount)
    }
}

impl Default for WordCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for WordCount {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        WordCount::new(value).ok_or_else(|| {
            format!(
                "word count must be between {} and {} in steps of {} (got {})",
                WordCount::MIN,
                WordCount::MAX,
                WordCount::STEP,
                value
            )
        })
    }
}

impl From<WordCount> for u16 {
    fn from(value: WordCount) -> Self {
        value.0
    }
}

impl FromStr for WordCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u16 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid word count: {s:?}"))?;
        WordCount::try_from(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Paragraph,
    BulletPoints,
}

impl OutputFormat {
    pub fn token(self) -> &'static str {
        match self {
            OutputFormat::Paragraph => "paragraph",
            OutputFormat::BulletPoints => "bullet-points",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "paragraph" => Ok(OutputFormat::Paragraph),
            "bullet-points" | "bullets" => Ok(OutputFormat::BulletPoints),
            other => Err(format!(
                "unknown output format {other:?} (expected paragraph or bullet-points)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    #[default]
    Academic,
    Executive,
    Public,
    Student,
}

impl Audience {
    pub const ALL: [Audience; 4] = [
        Audience::Academic,
        Audience::Executive,
        Audience::Public,
        Audience::Student,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Audience::Academic => "academic",
            Audience::Executive => "executive",
            Audience::Public => "public",
            Audience::Student => "student",
        }
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Audience::ALL
            .into_iter()
            .find(|a| a.token() == lower)
            .ok_or_else(|| {
                format!("unknown audience {s:?} (expected academic, executive, public or student)")
            })
    }
}

/// Parameters for one summary request.
///
/// A value object: edits go through the `with_*` methods, which return a new
/// value instead of mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub word_count: WordCount,
    pub output_format: OutputFormat,
    pub audience: Audience,
    pub critical_analysis: bool,
}

impl SummaryOptions {
    pub fn with_word_count(self, word_count: WordCount) -> Self {
        Self { word_count, ..self }
    }

    pub fn with_output_format(self, output_format: OutputFormat) -> Self {
        Self {
            output_format,
            ..self
        }
    }

    pub fn with_audience(self, audience: Audience) -> Self {
        Self { audience, ..self }
    }

    pub fn with_critical_analysis(self, critical_analysis: bool) -> Self {
        Self {
            critical_analysis,
            ..self
        }
    }
}
