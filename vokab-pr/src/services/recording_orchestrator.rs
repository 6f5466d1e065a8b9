//! Recording orchestrator
//!
//! Cache-aside retrieval of pronunciation recordings:
//!
//! ```text
//! CacheLookup → BlobLookup → Hit
//!      │             │
//!      └── miss ─────┴──→ Scrape → Resolve → Download → Persist → Fetched
//! ```
//!
//! `NotFound` and `Error` are terminal from any step. Nothing is retried: one
//! run makes at most one page fetch and one download.
//!
//! Persistence is two independent writes, blob first, then index. They are not
//! atomic. A failed index write after a successful blob write leaves an
//! orphaned blob and the next request re-fetches under a new file id. Nothing
//! here reconciles orphans.
//!
//! Concurrent misses for the same key each run the full fetch; the index keeps
//! whichever record lands last.

use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vokab_common::WordType;

use crate::error::RecordingError;
use crate::types::{
    AudioLinkResolver, AudioPayload, BlobStore, DictionarySource, LinkResolution, PageOutcome,
    RecordingIndex,
};

/// Where a served recording came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingSource {
    Cache,
    Dictionary,
}

impl RecordingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingSource::Cache => "cache",
            RecordingSource::Dictionary => "dictionary",
        }
    }
}

/// Why no recording could be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The word type is unclassified
    Unclassified,
    /// The dictionary has no page for the word
    NoEntry,
    /// The dictionary redirected the page request elsewhere
    Redirected,
    /// The page has no entry matching word and word type with US audio
    NoAudioLink,
    /// The page does not look like a dictionary entry page
    MalformedPage,
}

impl NotFoundReason {
    pub fn describe(&self) -> &'static str {
        match self {
            NotFoundReason::Unclassified => "word type is unclassified",
            NotFoundReason::NoEntry => "dictionary has no entry",
            NotFoundReason::Redirected => "dictionary redirected the request",
            NotFoundReason::NoAudioLink => "no matching entry with US pronunciation",
            NotFoundReason::MalformedPage => "dictionary page has no entries",
        }
    }
}

/// Non-error outcome of one orchestration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingOutcome {
    Found {
        payload: AudioPayload,
        source: RecordingSource,
    },
    NotFound(NotFoundReason),
}

/// Glues the index, blob store, dictionary and resolver together
pub struct RecordingOrchestrator {
    index: Arc<dyn RecordingIndex>,
    blobs: Arc<dyn BlobStore>,
    dictionary: Arc<dyn DictionarySource>,
    resolver: Arc<dyn AudioLinkResolver>,
}

impl RecordingOrchestrator {
    pub fn new(
        index: Arc<dyn RecordingIndex>,
        blobs: Arc<dyn BlobStore>,
        dictionary: Arc<dyn DictionarySource>,
        resolver: Arc<dyn AudioLinkResolver>,
    ) -> Self {
        Self {
            index,
            blobs,
            dictionary,
            resolver,
        }
    }

    /// Produce the recording for a sanitized word and its word type.
    ///
    /// The word must already be validated (non-empty, at most 100 characters).
    /// `cancel` is checked at every suspension point.
    pub async fn get_recording(
        &self,
        word: &str,
        word_type: WordType,
        cancel: &CancellationToken,
    ) -> Result<RecordingOutcome, RecordingError> {
        if !word_type.is_classified() {
            tracing::debug!(word = %word, "Unclassified word type, no recording");
            return Ok(RecordingOutcome::NotFound(NotFoundReason::Unclassified));
        }

        let key = word.to_lowercase();

        // CacheLookup + BlobLookup
        if let Some(payload) = self.cached(&key, word_type, cancel).await? {
            tracing::debug!(word = %word, word_type = %word_type, "Recording served from cache");
            return Ok(RecordingOutcome::Found {
                payload,
                source: RecordingSource::Cache,
            });
        }

        // Scrape
        let page = match until_cancelled(cancel, self.dictionary.fetch_page(word)).await?? {
            PageOutcome::Page(page) => page,
            PageOutcome::NotFound => {
                return Ok(RecordingOutcome::NotFound(NotFoundReason::NoEntry));
            }
            PageOutcome::Redirected { .. } => {
                return Ok(RecordingOutcome::NotFound(NotFoundReason::Redirected));
            }
        };

        // Resolve
        let link = match self.resolver.resolve(&page, word, word_type) {
            LinkResolution::Found(link) => link,
            LinkResolution::NotFound => {
                tracing::info!(word = %word, word_type = %word_type, "No matching audio link on page");
                return Ok(RecordingOutcome::NotFound(NotFoundReason::NoAudioLink));
            }
            LinkResolution::Malformed => {
                tracing::warn!(word = %word, "Dictionary page has no headwords, markup may have changed");
                return Ok(RecordingOutcome::NotFound(NotFoundReason::MalformedPage));
            }
        };

        // Download
        let bytes = until_cancelled(cancel, self.dictionary.download(&link)).await??;
        if bytes.is_empty() {
            return Err(RecordingError::EmptyPayload(word.to_string()));
        }

        // Persist
        self.persist(&key, word_type, &bytes, cancel).await?;

        Ok(RecordingOutcome::Found {
            payload: AudioPayload::new(bytes),
            source: RecordingSource::Dictionary,
        })
    }

    /// Index lookup followed by blob read. Store failures count as misses.
    async fn cached(
        &self,
        key: &str,
        word_type: WordType,
        cancel: &CancellationToken,
    ) -> Result<Option<AudioPayload>, RecordingError> {
        let file_id = match until_cancelled(cancel, self.index.lookup(key, word_type)).await? {
            Ok(Some(file_id)) => file_id,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(word = %key, word_type = %word_type, error = %e, "Recording index lookup failed, treating as miss");
                return Ok(None);
            }
        };

        match until_cancelled(cancel, self.blobs.get(&file_id)).await? {
            Ok(Some(bytes)) if !bytes.is_empty() => Ok(Some(AudioPayload::new(bytes))),
            Ok(_) => {
                tracing::warn!(
                    word = %key,
                    word_type = %word_type,
                    file_id = %file_id,
                    "Indexed recording blob is missing, re-fetching"
                );
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(file_id = %file_id, error = %e, "Recording blob read failed, re-fetching");
                Ok(None)
            }
        }
    }

    /// Blob write, then index write under a fresh file id.
    ///
    /// Store failures are logged and absorbed; only cancellation is an error.
    async fn persist(
        &self,
        key: &str,
        word_type: WordType,
        bytes: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), RecordingError> {
        let file_id = Uuid::new_v4().to_string();

        if let Err(e) = until_cancelled(cancel, self.blobs.put(&file_id, bytes)).await? {
            tracing::warn!(file_id = %file_id, error = %e, "Failed to store recording blob, not indexing");
            return Ok(());
        }

        if let Err(e) = until_cancelled(cancel, self.index.record(key, word_type, &file_id)).await? {
            tracing::warn!(
                word = %key,
                word_type = %word_type,
                file_id = %file_id,
                error = %e,
                "Failed to index stored recording, blob is orphaned"
            );
            return Ok(());
        }

        tracing::info!(word = %key, word_type = %word_type, file_id = %file_id, "Cached new recording");
        Ok(())
    }
}

async fn until_cancelled<F>(cancel: &CancellationToken, future: F) -> Result<F::Output, RecordingError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RecordingError::Cancelled),
        output = future => Ok(output),
    }
}
