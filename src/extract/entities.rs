//! Entity recognition over a lexicon model.
//!
//! A lexicon model is a JSON file of labelled regular expressions:
//!
//! ```text
//! {
//!   "name": "builtin-date-lexicon",
//!   "entities": [
//!     { "label": "DATE", "regex": "\\b(?:19|20)\\d{2}\\b" },
//!     { "label": "TIME", "regex": "\\b\\d{1,2}:\\d{2}\\b" }
//!   ]
//! }
//! ```
//!
//! Every entry is run over the text, overlapping spans are resolved
//! leftmost-longest, and the survivors are returned in document order. A
//! model is compiled once at startup and shared read-only for the run.
//!
//! The date spans this produces are a diagnostic signal. They are stored on
//! each record but the retirement date comes from [`crate::extract::patterns`].

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

/// Label of the spans [`extract_date_entities`] keeps.
pub const DATE_LABEL: &str = "DATE";

const BUILTIN_LEXICON: &str = include_str!("../../assets/date_lexicon.json");

/// A labelled span of the input text, as byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Something that can tag spans of text with entity labels.
///
/// Built once per run and passed by reference to whoever needs it, so tests
/// can hand in a stub instead of a real model.
pub trait EntityRecognizer {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// All recognized spans in document order, without overlaps.
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;
}

/// Errors raised while loading a lexicon model. All of them are fatal.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read entity model {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("entity model {origin} is not valid JSON: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("entity model {origin}: invalid {label} pattern {regex:?}: {source}")]
    Pattern {
        origin: String,
        label: String,
        regex: String,
        #[source]
        source: regex::Error,
    },

    #[error("entity model {origin} defines no entities")]
    Empty { origin: String },
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    entities: Vec<LexiconEntry>,
}

#[derive(Debug, Deserialize)]
struct LexiconEntry {
    label: String,
    regex: String,
}

/// A compiled lexicon model.
#[derive(Debug)]
pub struct LexiconModel {
    name: String,
    entries: Vec<(String, Regex)>,
}

impl LexiconModel {
    /// The lexicon embedded in the binary.
    pub fn builtin() -> Result<Self, ModelError> {
        Self::from_json_str(BUILTIN_LEXICON, "builtin")
    }

    /// Load and compile a lexicon model from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if the file cannot be read, is not a lexicon
    /// document, holds an invalid pattern, or defines no entities.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    /// Compile a lexicon model from its JSON text. `origin` names the source in errors.
    pub fn from_json_str(raw: &str, origin: &str) -> Result<Self, ModelError> {
        let file: LexiconFile = serde_json::from_str(raw).map_err(|source| ModelError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        if file.entities.is_empty() {
            return Err(ModelError::Empty {
                origin: origin.to_string(),
            });
        }

        let mut entries = Vec::with_capacity(file.entities.len());
        for entry in file.entities {
            let regex = Regex::new(&entry.regex).map_err(|source| ModelError::Pattern {
                origin: origin.to_string(),
                label: entry.label.clone(),
                regex: entry.regex.clone(),
                source,
            })?;
            entries.push((entry.label, regex));
        }

        let name = file.name.unwrap_or_else(|| origin.to_string());
        Ok(Self { name, entries })
    }

    /// Number of labelled patterns in the model. Never zero.
    pub fn pattern_count(&self) -> usize {
        self.entries.len()
    }
}

impl EntityRecognizer for LexiconModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        let mut candidates: Vec<EntitySpan> = self
            .entries
            .iter()
            .flat_map(|(label, regex)| {
                regex.find_iter(text).map(move |m| EntitySpan {
                    label: label.clone(),
                    start: m.start(),
                    end: m.end(),
                    text: m.as_str().to_string(),
                })
            })
            .filter(|span| span.end > span.start)
            .collect();

        // leftmost first, longest first on ties; stable so earlier entries win exact ties
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut spans = Vec::with_capacity(candidates.len());
        let mut cursor = 0;
        for span in candidates {
            if span.start >= cursor {
                cursor = span.end;
                spans.push(span);
            }
        }
        spans
    }
}

/// Every date-labelled span of `text`, as written, in document order.
///
/// An empty vector means the recognizer tagged no dates.
pub fn extract_date_entities(recognizer: &dyn EntityRecognizer, text: &str) -> Vec<String> {
    let dates: Vec<String> = recognizer
        .recognize(text)
        .into_iter()
        .filter(|span| span.label == DATE_LABEL)
        .map(|span| span.text)
        .collect();
    debug!(recognizer = recognizer.name(), ?dates, "Date entities");
    dates
}
