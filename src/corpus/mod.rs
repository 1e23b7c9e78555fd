/*!
 * Word corpus module for persistent storage of donor word occurrences.
 *
 * This module provides SQLite-based persistence for the corpus built from
 * transcribed donor recordings. One normalized word maps to many entries;
 * ranking among them is the selector's job, not the corpus's.
 */

pub mod schema;
pub mod connection;
pub mod store;
pub mod models;

// Re-export main types
pub use connection::CorpusConnection;
pub use models::{CorpusEntry, NewCorpusEntry};
pub use store::WordCorpus;
