//! Word Storage Module
//!
//! The persistent word table the suggestion index is hydrated from.
//!
//! ## Core Concepts
//! - **`WordRecord`**: `(word, frequency)`, unique by `word`.
//! - **`WordStore`**: the two-operation contract the service consumes
//!   (`list_all` at startup, `upsert_increment` on every recorded occurrence).
//! - **Backends**: `MemoryWordStore` (sharded in-memory map) and `FileWordStore`
//!   (JSON file, rewritten atomically on every upsert).

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileWordStore;
pub use memory::MemoryWordStore;
pub use store::{WordRecord, WordStore};

#[cfg(test)]
mod tests;
