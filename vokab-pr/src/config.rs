//! Bootstrap configuration for vokab-pr
//!
//! Loaded once from TOML at startup, then overridden by command-line
//! arguments and environment variables. Cannot change while running.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use vokab_common::config::LoggingConfig;

/// Default HTTP port for vokab-pr
pub const DEFAULT_PORT: u16 = 5731;

/// TOML bootstrap configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the database and recording blobs (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dictionary: DictionaryConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            logging: LoggingConfig::default(),
            dictionary: DictionaryConfig::default(),
        }
    }
}

/// External dictionary website settings
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryConfig {
    /// Site origin, e.g. `https://dictionary.cambridge.org`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix of word pages; the word slug is appended as the last segment
    #[serde(default = "default_page_path")]
    pub page_path: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Transport timeout per request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub markup: MarkupConfig,
}

impl DictionaryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_path: default_page_path(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            markup: MarkupConfig::default(),
        }
    }
}

/// CSS selectors describing the dictionary page layout
///
/// The site's markup drifts over time; these can be adjusted without a rebuild.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    /// Node whose text is an entry's headword
    #[serde(default = "default_headword_selector")]
    pub headword_selector: String,

    /// Part-of-speech label inside the block following the headword
    #[serde(default = "default_pos_selector")]
    pub pos_selector: String,

    /// US pronunciation block inside the entry
    #[serde(default = "default_us_pronunciation_selector")]
    pub us_pronunciation_selector: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            headword_selector: default_headword_selector(),
            pos_selector: default_pos_selector(),
            us_pronunciation_selector: default_us_pronunciation_selector(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_base_url() -> String {
    "https://dictionary.cambridge.org".to_string()
}

fn default_page_path() -> String {
    "/dictionary/english".to_string()
}

fn default_user_agent() -> String {
    format!("vokab-pr/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_headword_selector() -> String {
    ".di-title".to_string()
}

fn default_pos_selector() -> String {
    ".pos".to_string()
}

fn default_us_pronunciation_selector() -> String {
    ".us".to_string()
}
