//! Errors shared by the vokab crates
//!
//! Only [`Error::InvalidInput`] is caused by the caller. The rest come from the
//! recording stores or from startup configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Word or word type rejected before any lookup
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Recording index query failed
    #[error("Recording index error: {0}")]
    Index(#[from] sqlx::Error),

    /// Blob or config file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bootstrap configuration unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Index row whose stored values cannot be decoded
    #[error("Corrupt index record: {0}")]
    CorruptRecord(String),
}
