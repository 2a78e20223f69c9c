//! Trie Module Tests
//!
//! ## Test Scopes
//! - **Insert**: lazy node creation, increment-or-create, no-op inputs.
//! - **Lookup**: prefix walks and exact-word frequencies.
//! - **Suggestions**: prefix property, frequency ranking, deterministic ties.

#[cfg(test)]
mod tests {
    use crate::trie::{PrefixNode, PrefixTrie};

    // ============================================================
    // NODE TESTS
    // ============================================================

    #[test]
    fn test_node_starts_non_terminal() {
        let node = PrefixNode::new();

        assert!(!node.is_terminal());
        assert_eq!(node.frequency(), 0);
        assert_eq!(node.children().count(), 0);
    }

    #[test]
    fn test_node_child_created_once() {
        let mut node = PrefixNode::new();
        node.child_or_insert('a');
        node.child_or_insert('a');

        assert_eq!(node.children().count(), 1);
        assert!(node.child('a').is_some());
        assert!(node.child('b').is_none());
    }

    #[test]
    fn test_node_mark_terminal_accumulates() {
        let mut node = PrefixNode::new();
        node.mark_terminal(2);
        node.mark_terminal(3);

        assert!(node.is_terminal());
        assert_eq!(node.frequency(), 5);
    }

    // ============================================================
    // INSERT TESTS
    // ============================================================

    #[test]
    fn test_insert_new_word() {
        let mut trie = PrefixTrie::new();
        trie.insert("apple", 1);

        assert_eq!(trie.frequency("apple"), Some(1));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_insert_increments_existing_word() {
        let mut trie = PrefixTrie::new();
        trie.insert("apple", 1);
        trie.insert("apple", 4);

        assert_eq!(trie.frequency("apple"), Some(5));
        assert_eq!(trie.len(), 1, "Same word must not be counted twice");
    }

    #[test]
    fn test_insert_prefix_of_existing_word() {
        let mut trie = PrefixTrie::new();
        trie.insert("apple", 1);

        // "app" exists as a path but is not a word yet
        assert_eq!(trie.frequency("app"), None);

        trie.insert("app", 1);
        assert_eq!(trie.frequency("app"), Some(1));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_insert_empty_word_is_noop() {
        let mut trie = PrefixTrie::new();
        trie.insert("", 3);

        assert!(trie.is_empty());
        let root = trie.lookup_node("").unwrap();
        assert!(!root.is_terminal(), "Root is never terminal");
    }

    #[test]
    fn test_insert_zero_increment_is_noop() {
        let mut trie = PrefixTrie::new();
        trie.insert("cat", 0);

        assert!(trie.is_empty());
        assert_eq!(trie.frequency("cat"), None);
    }

    #[test]
    fn test_insert_multibyte_characters() {
        let mut trie = PrefixTrie::new();
        trie.insert("żółw", 2);
        trie.insert("żaba", 1);

        assert_eq!(trie.suggestions("ż"), vec!["żółw", "żaba"]);
        assert_eq!(trie.frequency("żółw"), Some(2));
    }

    // ============================================================
    // LOOKUP TESTS
    // ============================================================

    #[test]
    fn test_lookup_node_found_and_missing() {
        let mut trie = PrefixTrie::new();
        trie.insert("car", 1);

        assert!(trie.lookup_node("ca").is_some());
        assert!(trie.lookup_node("car").unwrap().is_terminal());
        assert!(trie.lookup_node("cat").is_none());
        assert!(trie.lookup_node("cars").is_none());
    }

    // ============================================================
    // SUGGESTION TESTS
    // ============================================================

    #[test]
    fn test_suggestions_scenario_apple_app() {
        let mut trie = PrefixTrie::new();
        trie.insert("apple", 1);
        trie.insert("app", 1);
        trie.insert("apple", 1);

        assert_eq!(trie.suggestions("app"), vec!["apple", "app"]);
    }

    #[test]
    fn test_suggestions_unknown_prefix_is_empty() {
        let mut trie = PrefixTrie::new();
        trie.insert("apple", 2);
        trie.insert("app", 1);

        assert!(trie.suggestions("xyz").is_empty());
    }

    #[test]
    fn test_suggestions_all_start_with_prefix() {
        let mut trie = PrefixTrie::new();
        for word in ["tea", "team", "tear", "ten", "to", "toast", "a", "ant"] {
            trie.insert(word, 1);
        }

        for prefix in ["t", "te", "tea", "to", "a", "an"] {
            for word in trie.suggestions(prefix) {
                assert!(
                    word.starts_with(prefix),
                    "{} does not start with {}",
                    word,
                    prefix
                );
            }
        }
        assert_eq!(trie.suggestions("t").len(), 6);
    }

    #[test]
    fn test_suggestions_ranked_by_frequency() {
        let mut trie = PrefixTrie::new();
        trie.insert("rust", 3);
        trie.insert("rusty", 10);
        trie.insert("rush", 1);

        assert_eq!(trie.suggestions("ru"), vec!["rusty", "rust", "rush"]);
    }

    #[test]
    fn test_suggestions_ties_are_lexicographic() {
        let mut trie = PrefixTrie::new();
        trie.insert("bed", 2);
        trie.insert("bad", 2);
        trie.insert("bid", 2);
        trie.insert("bud", 5);

        assert_eq!(trie.suggestions("b"), vec!["bud", "bad", "bed", "bid"]);
    }

    #[test]
    fn test_suggestions_include_prefix_itself() {
        let mut trie = PrefixTrie::new();
        trie.insert("go", 7);
        trie.insert("gone", 1);

        assert_eq!(trie.suggestions("go"), vec!["go", "gone"]);
    }

    #[test]
    fn test_suggestions_empty_prefix_lists_everything() {
        let mut trie = PrefixTrie::new();
        trie.insert("x", 1);
        trie.insert("y", 2);

        // The trie itself is unconstrained; the service applies the minimum length.
        assert_eq!(trie.suggestions(""), vec!["y", "x"]);
    }

    #[test]
    fn test_ranked_completions_carry_frequencies() {
        let mut trie = PrefixTrie::new();
        trie.insert("hello", 4);
        trie.insert("help", 9);

        let ranked = trie.ranked_completions("hel");
        assert_eq!(
            ranked,
            vec![("help".to_string(), 9), ("hello".to_string(), 4)]
        );
    }

    #[test]
    fn test_insert_order_does_not_change_results() {
        let records = [("alpha", 3), ("alps", 1), ("altitude", 3), ("also", 2)];

        let mut forward = PrefixTrie::new();
        for (word, freq) in records.iter() {
            forward.insert(word, *freq);
        }

        // Reverse order, and one unit at a time
        let mut backward = PrefixTrie::new();
        for (word, freq) in records.iter().rev() {
            for _ in 0..*freq {
                backward.insert(word, 1);
            }
        }

        assert_eq!(forward.suggestions("al"), backward.suggestions("al"));
        assert_eq!(
            forward.suggestions("al"),
            vec!["alpha", "altitude", "also", "alps"]
        );
    }

    #[test]
    fn test_long_word_round_trips_through_traversal() {
        let mut trie = PrefixTrie::new();
        let long_word = "a".repeat(2_000);
        trie.insert(&long_word, 1);

        let results = trie.suggestions("a");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].len(), 2_000);
    }
}
