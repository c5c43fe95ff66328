//! Core domain types for pageforge runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for generation-run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Article language, applied uniformly to every keyword of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Italian,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Self; 5] = [
        Self::English,
        Self::Spanish,
        Self::French,
        Self::German,
        Self::Italian,
    ];

    /// English name of the language, as spelled in synthesis prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Italian => "Italian",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "spanish" | "es" => Ok(Self::Spanish),
            "french" | "fr" => Ok(Self::French),
            "german" | "de" => Ok(Self::German),
            "italian" | "it" => Ok(Self::Italian),
            other => Err(format!(
                "unsupported language '{other}' (expected one of: english, spanish, french, german, italian)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// KeywordOutcome
// ---------------------------------------------------------------------------

/// Per-keyword status record accumulated during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordOutcome {
    /// The raw keyword as loaded (trimmed).
    pub keyword: String,
    /// Slug derived from the keyword; base name of both artifacts.
    pub slug: String,
    /// Whether the HTML article entry was written.
    pub html_written: bool,
    /// Whether the JSON descriptor entry was written.
    pub descriptor_written: bool,
    /// Whether this keyword's slug collided with an earlier keyword's.
    pub slug_collision: bool,
    /// Error detail when synthesis or rendering failed for this keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KeywordOutcome {
    /// Whether this keyword produced full content (HTML + descriptor).
    pub fn is_complete(&self) -> bool {
        self.html_written && self.descriptor_written
    }
}
