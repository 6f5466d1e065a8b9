//! Recording retrieval services
//!
//! - `dictionary_client`: HTTP access to the dictionary website
//! - `headword_resolver`: page markup → US pronunciation audio link
//! - `recording_orchestrator`: cache-aside control flow over all collaborators

pub mod dictionary_client;
pub mod headword_resolver;
pub mod recording_orchestrator;

pub use dictionary_client::DictionaryClient;
pub use headword_resolver::HeadwordResolver;
pub use recording_orchestrator::{
    NotFoundReason, RecordingOrchestrator, RecordingOutcome, RecordingSource,
};
