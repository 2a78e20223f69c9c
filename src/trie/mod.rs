//! Prefix Trie Module
//!
//! The in-memory index behind the suggestion engine.
//!
//! ## Overview
//! Every path from the root spells a prefix; terminal nodes mark complete words and
//! carry a usage-frequency counter. The trie is a derived cache of the persistent
//! word store: replaying all stored `(word, frequency)` pairs in any order rebuilds it.
//!
//! ## Submodules
//! - **`node`**: `PrefixNode`, a single trie node owning its children.
//! - **`prefix_trie`**: `PrefixTrie`, insert-or-increment and ranked prefix enumeration.
//!
//! The trie is not synchronized; `AutocompleteService` wraps it in a readers-writer lock.

pub mod node;
pub mod prefix_trie;

pub use node::PrefixNode;
pub use prefix_trie::PrefixTrie;

#[cfg(test)]
mod tests;
