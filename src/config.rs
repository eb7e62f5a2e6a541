//! Run settings: built-in defaults, overlaid by a YAML file, overlaid by the CLI.
//!
//! # Example file
//!
//! ```yaml
//! feed_base_url: https://aztty.azurewebsites.net/rss/updates
//! category: retirements
//! output_dir: ./report
//! formats: [html, csv, json]
//! dedupe_by_link: false
//! fetch:
//!   timeout_secs: 30
//!   max_retries: 3
//!   base_delay_ms: 1000
//! ner:
//!   enabled: true
//!   model: ./assets/date_lexicon.json
//! ```
//!
//! Every key is optional.

use crate::cli::Cli;
use crate::outputs::Format;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_FEED_BASE_URL: &str = "https://aztty.azurewebsites.net/rss/updates";
pub const DEFAULT_CATEGORY: &str = "retirements";
pub const DEFAULT_REPORT_NAME: &str = "azure_service_retirements";
pub const DEFAULT_REPORT_TITLE: &str = "Azure Service Retirements";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid feed URL {url:?}: {source}")]
    FeedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Feed request behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub base_delay_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// The diagnostic entity pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NerSettings {
    pub enabled: bool,
    /// Lexicon model file; the built-in model is used when unset.
    pub model: Option<PathBuf>,
}

impl Default for NerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Explicit feed URL. When unset, built from `feed_base_url` and `category`.
    pub feed_url: Option<String>,
    pub feed_base_url: String,
    pub category: String,
    /// Saved RSS file to read instead of fetching.
    pub feed_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub report_name: String,
    pub report_title: String,
    pub formats: Vec<Format>,
    pub dedupe_by_link: bool,
    pub fetch: FetchSettings,
    pub ner: NerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: None,
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            feed_file: None,
            output_dir: PathBuf::from("."),
            report_name: DEFAULT_REPORT_NAME.to_string(),
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            formats: vec![Format::Html],
            dedupe_by_link: false,
            fetch: FetchSettings::default(),
            ner: NerSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. `origin` names the source in errors.
    pub fn from_yaml_str(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        // an empty file deserializes to unit, not a map
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Yaml {
            origin: origin.to_string(),
            source,
        })
    }

    /// Load settings from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw, &path.display().to_string())
    }

    /// Build the run settings from the command line.
    ///
    /// Loads the `--config` file when given, applies every flag that was set
    /// on top of it, and validates the result.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let base = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let settings = base.with_cli(cli);
        settings.validate()?;
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    /// Overlay flags that were set on the command line.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.feed_url {
            self.feed_url = Some(url.clone());
            self.feed_file = None;
        }
        if let Some(category) = &cli.category {
            self.category = category.clone();
        }
        if let Some(path) = &cli.feed_file {
            self.feed_file = Some(path.clone());
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(name) = &cli.report_name {
            self.report_name = name.clone();
        }
        if !cli.formats.is_empty() {
            self.formats = cli.formats.clone();
        }
        if let Some(model) = &cli.ner_model {
            self.ner.enabled = true;
            self.ner.model = Some(model.clone());
        }
        if cli.no_ner {
            self.ner.enabled = false;
        }
        if cli.dedupe {
            self.dedupe_by_link = true;
        }
        if let Some(secs) = cli.timeout_secs {
            self.fetch.timeout_secs = secs;
        }
        if let Some(retries) = cli.max_retries {
            self.fetch.max_retries = retries;
        }
        self
    }

    /// Check settings that would otherwise fail halfway through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.formats.is_empty() {
            return Err(ConfigError::Invalid("no output formats selected".into()));
        }
        if self.report_name.trim().is_empty()
            || self.report_name.contains(['/', '\\'])
        {
            return Err(ConfigError::Invalid(format!(
                "report_name {:?} must be a plain file name",
                self.report_name
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.feed_file.is_none() {
            self.feed_url()?;
        }
        Ok(())
    }

    /// The feed URL to fetch.
    ///
    /// An explicit `feed_url` wins; otherwise the category is URL-encoded onto
    /// `feed_base_url` as the `category` query parameter.
    pub fn feed_url(&self) -> Result<Url, ConfigError> {
        let raw = match &self.feed_url {
            Some(url) => url.clone(),
            None => {
                let sep = if self.feed_base_url.contains('?') { '&' } else { '?' };
                format!(
                    "{}{sep}category={}",
                    self.feed_base_url,
                    urlencoding::encode(&self.category)
                )
            }
        };

        let url = Url::parse(&raw).map_err(|source| ConfigError::FeedUrl {
            url: raw.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "feed URL {raw:?} must use http or https"
            )));
        }
        Ok(url)
    }

    /// Where the report entries come from, for logs and the report footer.
    pub fn feed_source_label(&self) -> String {
        match (&self.feed_file, self.feed_url()) {
            (Some(path), _) => path.display().to_string(),
            (None, Ok(url)) => url.to_string(),
            (None, Err(_)) => self.feed_url.clone().unwrap_or_default(),
        }
    }
}
