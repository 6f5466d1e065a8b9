//! # Vokab Common Library
//!
//! Shared code for the Vokab microservices including:
//! - Error types
//! - Word vocabulary (word types, normalization, request validation)
//! - Bootstrap configuration loading and root folder resolution

pub mod config;
pub mod error;
pub mod word;

pub use error::{Error, Result};
pub use word::{WordClassifier, WordType};
