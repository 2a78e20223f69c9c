//! Autocomplete Service Module
//!
//! Ties the prefix trie to the word store and serves it over HTTP.
//!
//! ## Overview
//! At startup the service hydrates the trie from the store and only then reports
//! `Ready`. Suggest requests read the trie under a shared lock; record requests
//! increment the trie under the exclusive lock and queue a write-through upsert
//! for the store.
//!
//! ## Submodules
//! - **`service`**: `AutocompleteService`, lifecycle, locking and normalization.
//! - **`persistence`**: bounded write-through queue with timeout, retry and counters.
//! - **`handlers`**: Axum handlers and the router.
//! - **`protocol`**: endpoint paths and request/response DTOs.
//! - **`types`**: configuration, lifecycle state and reporting types.

pub mod handlers;
pub mod persistence;
pub mod protocol;
pub mod service;
pub mod types;

pub use handlers::router;
pub use service::AutocompleteService;
pub use types::{HydrationPolicy, ServiceConfig, ServiceState};
