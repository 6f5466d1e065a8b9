//! Word vocabulary shared by every Vokab service
//!
//! Word-type classification, word sanitization and the request validation that
//! runs before any recording lookup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Maximum accepted word length, in characters, before sanitization
pub const MAX_WORD_LENGTH: usize = 100;

/// Grammatical word type
///
/// `None` means "unclassified". It never matches a cached recording nor an
/// entry parsed from a dictionary page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordType {
    None,
    Noun,
    Verb,
    Adjective,
    Adverb,
    Other,
}

impl WordType {
    /// Map a label from the fixed vocabulary to a word type.
    ///
    /// Matching is case-sensitive: `"noun"` maps to `Noun`, `"Noun"` maps to `None`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "noun" => WordType::Noun,
            "verb" => WordType::Verb,
            "adjective" => WordType::Adjective,
            "adverb" => WordType::Adverb,
            _ => WordType::None,
        }
    }

    /// Lowercase label used for persistence and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            WordType::None => "none",
            WordType::Noun => "noun",
            WordType::Verb => "verb",
            WordType::Adjective => "adjective",
            WordType::Adverb => "adverb",
            WordType::Other => "other",
        }
    }

    /// Parse a persisted label back into a word type
    pub fn from_db_str(value: &str) -> Self {
        match value {
            "other" => WordType::Other,
            _ => WordType::from_label(value),
        }
    }

    pub fn is_classified(&self) -> bool {
        *self != WordType::None
    }
}

impl fmt::Display for WordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip every character that is not a letter, digit, underscore or space, then trim.
pub fn sanitize_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a raw word and optional word-type label.
///
/// Pure: unknown labels become [`WordType::None`] and the word may come back empty.
pub fn normalize(raw_word: &str, raw_type: Option<&str>) -> (String, WordType) {
    let word_type = raw_type.map(WordType::from_label).unwrap_or(WordType::None);
    (sanitize_word(raw_word), word_type)
}

/// Validate and normalize an inbound recording request.
///
/// Rejects, in order:
/// 1. words longer than [`MAX_WORD_LENGTH`] characters (checked before sanitization)
/// 2. a word-type label outside the fixed vocabulary
/// 3. words that sanitize to an empty string
pub fn validate_request(raw_word: &str, raw_type: Option<&str>) -> Result<(String, WordType)> {
    let length = raw_word.chars().count();
    if length > MAX_WORD_LENGTH {
        return Err(Error::InvalidInput(format!(
            "word is {} characters long (maximum {})",
            length, MAX_WORD_LENGTH
        )));
    }

    if let Some(label) = raw_type {
        if !WordType::from_label(label).is_classified() {
            return Err(Error::InvalidInput(format!("unknown word type '{}'", label)));
        }
    }

    let (word, word_type) = normalize(raw_word, raw_type);
    if word.is_empty() {
        return Err(Error::InvalidInput(
            "word contains no letters or digits".to_string(),
        ));
    }

    Ok((word, word_type))
}

/// Word-type classification capability
///
/// Consulted when a request does not name a word type.
#[async_trait]
pub trait WordClassifier: Send + Sync {
    async fn classify(&self, word: &str) -> WordType;
}

/// Classifier that never classifies anything
#[derive(Debug, Default, Clone, Copy)]
pub struct UnclassifiedClassifier;

#[async_trait]
impl WordClassifier for UnclassifiedClassifier {
    async fn classify(&self, _word: &str) -> WordType {
        WordType::None
    }
}
