//! faqdb-core
//!
//! Domain types, error taxonomy, configuration and collaborator traits
//! shared by the embedding, ranking and search crates.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
