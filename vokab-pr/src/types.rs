//! Core Types and Trait Definitions for vokab-pr
//!
//! The recording orchestrator coordinates four collaborators, each behind a
//! trait so that any of them can be swapped (or faked in tests):
//! - [`RecordingIndex`]: (word, word type) → file id
//! - [`BlobStore`]: file id → audio bytes
//! - [`DictionarySource`]: dictionary page fetch and audio download
//! - [`AudioLinkResolver`]: dictionary page markup → audio link

use async_trait::async_trait;
use vokab_common::WordType;

use crate::error::DictionaryError;

// ============================================================================
// Audio payload
// ============================================================================

/// Content type of every recording served by this module
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Raw recording bytes, always `audio/mpeg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn content_type(&self) -> &'static str {
        AUDIO_CONTENT_TYPE
    }

    /// User-facing file name, independent of the internal file id
    pub fn file_name(word: &str) -> String {
        format!("{}.mp3", word)
    }
}

// ============================================================================
// Recording metadata index
// ============================================================================

/// Maps (word, word type) to the blob store key of its cached recording.
///
/// Lookups are case- and type-exact: an entry recorded under `(word, Verb)` is
/// never returned for `(word, Noun)`.
#[async_trait]
pub trait RecordingIndex: Send + Sync {
    async fn lookup(&self, word: &str, word_type: WordType) -> vokab_common::Result<Option<String>>;

    /// Record a mapping. A second record for the same key replaces the first.
    async fn record(&self, word: &str, word_type: WordType, file_id: &str) -> vokab_common::Result<()>;
}

// ============================================================================
// Recording blob store
// ============================================================================

/// Stores recording bytes by file id.
///
/// `get` returning `Ok(None)` is not an error: it means the bytes are gone.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, file_id: &str) -> vokab_common::Result<Option<Vec<u8>>>;

    async fn put(&self, file_id: &str, bytes: &[u8]) -> vokab_common::Result<()>;
}

// ============================================================================
// Dictionary source
// ============================================================================

/// Outcome of fetching a word's dictionary page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page markup for the requested word
    Page(String),
    /// The site answered "not found"
    NotFound,
    /// The site served a different resource than the one requested.
    /// Its content cannot be trusted to describe the requested word.
    Redirected { requested: String, landed: String },
}

/// External dictionary website
///
/// Non-success responses other than "not found" are terminal errors.
#[async_trait]
pub trait DictionarySource: Send + Sync {
    async fn fetch_page(&self, word: &str) -> Result<PageOutcome, DictionaryError>;

    /// Download a resolved audio path (relative to the site, or absolute)
    async fn download(&self, path: &str) -> Result<Vec<u8>, DictionaryError>;
}

// ============================================================================
// Audio link resolver
// ============================================================================

/// Result of scanning a dictionary page for an audio link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    /// Audio source path of the first qualifying entry
    Found(String),
    /// The page has entries but none qualifies
    NotFound,
    /// The page does not have the expected structure at all
    Malformed,
}

/// Extracts the audio link for (word, word type) from page markup.
///
/// Synchronous: parsed documents are not `Send` and must not live across an
/// await point.
pub trait AudioLinkResolver: Send + Sync {
    fn resolve(&self, page: &str, word: &str, word_type: WordType) -> LinkResolution;
}
