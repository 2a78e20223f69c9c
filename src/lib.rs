//! Autocomplete Suggestion Engine Library
//!
//! An in-memory prefix index over a vocabulary of words, each with a usage
//! counter, kept in step with a persistent word store.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`trie`**: The prefix trie. Insert-or-increment and frequency-ranked completion
//!   of every stored word under a prefix.
//! - **`storage`**: The persistent word table (`WordStore`) and its in-memory and
//!   JSON-file backends.
//! - **`autocomplete`**: The service that hydrates the trie at startup, guards it
//!   with a readers-writer lock, writes recorded words through to the store, and
//!   exposes it over HTTP.

pub mod autocomplete;
pub mod storage;
pub mod trie;
