//! Shared test helpers: in-memory collaborators and dictionary page builders

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vokab_common::WordType;
use vokab_pr::config::MarkupConfig;
use vokab_pr::error::DictionaryError;
use vokab_pr::services::{HeadwordResolver, RecordingOrchestrator};
use vokab_pr::types::{BlobStore, DictionarySource, PageOutcome, RecordingIndex};

// ============================================================================
// Recording index
// ============================================================================

#[derive(Default)]
pub struct MemoryIndex {
    entries: Mutex<HashMap<(String, WordType), String>>,
    pub fail_lookup: bool,
    pub fail_record: bool,
    pub record_calls: AtomicUsize,
}

impl MemoryIndex {
    pub fn failing_record() -> Self {
        Self {
            fail_record: true,
            ..Self::default()
        }
    }

    pub fn failing_lookup() -> Self {
        Self {
            fail_lookup: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, word: &str, word_type: WordType, file_id: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert((word.to_string(), word_type), file_id.to_string());
    }

    pub fn get(&self, word: &str, word_type: WordType) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(&(word.to_string(), word_type))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordingIndex for MemoryIndex {
    async fn lookup(&self, word: &str, word_type: WordType) -> vokab_common::Result<Option<String>> {
        if self.fail_lookup {
            return Err(vokab_common::Error::Index(sqlx::Error::PoolClosed));
        }
        Ok(self.get(word, word_type))
    }

    async fn record(&self, word: &str, word_type: WordType, file_id: &str) -> vokab_common::Result<()> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_record {
            return Err(vokab_common::Error::Index(sqlx::Error::PoolTimedOut));
        }
        self.seed(word, word_type, file_id);
        Ok(())
    }
}

// ============================================================================
// Blob store
// ============================================================================

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_put: bool,
}

impl MemoryBlobStore {
    pub fn failing_put() -> Self {
        Self {
            fail_put: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, file_id: &str, bytes: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(file_id.to_string(), bytes.to_vec());
    }

    pub fn contains(&self, file_id: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(file_id)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, file_id: &str) -> vokab_common::Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(file_id).cloned())
    }

    async fn put(&self, file_id: &str, bytes: &[u8]) -> vokab_common::Result<()> {
        if self.fail_put {
            return Err(vokab_common::Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.seed(file_id, bytes);
        Ok(())
    }
}

// ============================================================================
// Dictionary source
// ============================================================================

/// Scripted dictionary: fixed page outcome per word and fixed download per path
#[derive(Default)]
pub struct FakeDictionary {
    pages: Mutex<HashMap<String, ScriptedPage>>,
    downloads: Mutex<HashMap<String, ScriptedDownload>>,
    pub page_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
    pub downloaded_paths: Mutex<VecDeque<String>>,
}

#[derive(Clone)]
pub enum ScriptedPage {
    Outcome(PageOutcome),
    Status(u16),
}

#[derive(Clone)]
pub enum ScriptedDownload {
    Bytes(Vec<u8>),
    Status(u16),
}

impl FakeDictionary {
    pub fn with_page(self, word: &str, html: &str) -> Self {
        self.pages.lock().unwrap().insert(
            word.to_string(),
            ScriptedPage::Outcome(PageOutcome::Page(html.to_string())),
        );
        self
    }

    pub fn with_outcome(self, word: &str, outcome: PageOutcome) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(word.to_string(), ScriptedPage::Outcome(outcome));
        self
    }

    pub fn with_page_status(self, word: &str, status: u16) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(word.to_string(), ScriptedPage::Status(status));
        self
    }

    pub fn with_download(self, path: &str, bytes: &[u8]) -> Self {
        self.downloads
            .lock()
            .unwrap()
            .insert(path.to_string(), ScriptedDownload::Bytes(bytes.to_vec()));
        self
    }

    pub fn with_download_status(self, path: &str, status: u16) -> Self {
        self.downloads
            .lock()
            .unwrap()
            .insert(path.to_string(), ScriptedDownload::Status(status));
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DictionarySource for FakeDictionary {
    async fn fetch_page(&self, word: &str) -> Result<PageOutcome, DictionaryError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        // Suspend like a real network call so concurrent requests interleave
        tokio::task::yield_now().await;
        let scripted = self.pages.lock().unwrap().get(word).cloned();
        match scripted {
            Some(ScriptedPage::Outcome(outcome)) => Ok(outcome),
            Some(ScriptedPage::Status(status)) => Err(DictionaryError::UnexpectedStatus {
                status,
                url: format!("/dictionary/english/{}", word),
            }),
            None => Ok(PageOutcome::NotFound),
        }
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, DictionaryError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        self.downloaded_paths
            .lock()
            .unwrap()
            .push_back(path.to_string());
        let scripted = self.downloads.lock().unwrap().get(path).cloned();
        match scripted {
            Some(ScriptedDownload::Bytes(bytes)) => Ok(bytes),
            Some(ScriptedDownload::Status(status)) => Err(DictionaryError::UnexpectedStatus {
                status,
                url: path.to_string(),
            }),
            None => Err(DictionaryError::UnexpectedStatus {
                status: 404,
                url: path.to_string(),
            }),
        }
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub index: Arc<MemoryIndex>,
    pub blobs: Arc<MemoryBlobStore>,
    pub dictionary: Arc<FakeDictionary>,
    pub orchestrator: Arc<RecordingOrchestrator>,
}

impl Harness {
    pub fn new(index: MemoryIndex, blobs: MemoryBlobStore, dictionary: FakeDictionary) -> Self {
        let index = Arc::new(index);
        let blobs = Arc::new(blobs);
        let dictionary = Arc::new(dictionary);
        let resolver = HeadwordResolver::new(&MarkupConfig::default()).unwrap();

        let orchestrator = Arc::new(RecordingOrchestrator::new(
            index.clone(),
            blobs.clone(),
            dictionary.clone(),
            Arc::new(resolver),
        ));

        Self {
            index,
            blobs,
            dictionary,
            orchestrator,
        }
    }

    pub fn with_dictionary(dictionary: FakeDictionary) -> Self {
        Self::new(MemoryIndex::default(), MemoryBlobStore::default(), dictionary)
    }
}

// ============================================================================
// Dictionary page markup
// ============================================================================

/// One dictionary entry block with a US `audio/mpeg` source at `us_src`
pub fn entry_html(headword: &str, pos: &str, us_src: &str) -> String {
    format!(
        r#"<div class="pos-header dpos-h">
             <div class="di-title"><span class="headword"><span class="hw dhw">{headword}</span></span></div>
             <div class="posgram dpos-g"><span class="pos dpos">{pos}</span></div>
             <span class="uk dpron-i"><span class="daud"><audio>
               <source type="audio/mpeg" src="/media/english/uk_pron/{headword}_uk.mp3"/>
             </audio></span></span>
             <span class="us dpron-i"><span class="daud"><audio>
               <source type="audio/ogg" src="{us_src}.ogg"/>
               <source type="audio/mpeg" src="{us_src}"/>
             </audio></span></span>
           </div>"#
    )
}

pub fn page_html(entries: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Dictionary</title></head><body><div class=\"page\">{}</div></body></html>",
        entries.concat()
    )
}

pub const APPLE_AUDIO: &[u8] = b"ID3\x03\x00\x00\x00apple-us";
pub const RUN_VERB_AUDIO: &[u8] = b"ID3\x03\x00\x00\x00run-verb-us";
pub const RUN_NOUN_AUDIO: &[u8] = b"ID3\x03\x00\x00\x00run-noun-us";

/// Dictionary knowing "apple" (noun) and "run" (verb, then noun)
pub fn standard_dictionary() -> FakeDictionary {
    FakeDictionary::default()
        .with_page(
            "apple",
            &page_html(&[entry_html("apple", "noun", "/media/us/apple.mp3")]),
        )
        .with_download("/media/us/apple.mp3", APPLE_AUDIO)
        .with_page(
            "run",
            &page_html(&[
                entry_html("run", "verb", "/media/us/run_verb.mp3"),
                entry_html("run", "noun", "/media/us/run_noun.mp3"),
            ]),
        )
        .with_download("/media/us/run_verb.mp3", RUN_VERB_AUDIO)
        .with_download("/media/us/run_noun.mp3", RUN_NOUN_AUDIO)
}
