//! Ranked prefix enumeration over `PrefixNode`s.
//!
//! Insert walks the word one `char` at a time and creates missing nodes lazily.
//! Suggestions run an iterative depth-first traversal over the subtree under the
//! prefix, reusing one `String` buffer (push on descent, pop on backtrack), then
//! rank by frequency descending with ties broken by the word in ascending order.

use super::node::PrefixNode;

#[derive(Debug, Default, Clone)]
pub struct PrefixTrie {
    root: PrefixNode,
    word_count: usize,
}

/// One step of the explicit DFS stack.
enum Step<'a> {
    Enter(char, &'a PrefixNode),
    Leave,
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `word`, or bumps its frequency by `increment_by` if already present.
    ///
    /// An empty word or a zero increment is a no-op, so the root is never terminal.
    pub fn insert(&mut self, word: &str, increment_by: u64) {
        if word.is_empty() || increment_by == 0 {
            return;
        }

        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.child_or_insert(ch);
        }

        if !node.is_terminal() {
            self.word_count += 1;
        }
        node.mark_terminal(increment_by);
    }

    /// Returns the node reached by walking `prefix` from the root.
    pub fn lookup_node(&self, prefix: &str) -> Option<&PrefixNode> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.child(ch)?;
        }
        Some(node)
    }

    /// Frequency of an exact stored word.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.lookup_node(word)
            .filter(|node| node.is_terminal())
            .map(|node| node.frequency())
    }

    /// All stored words starting with `prefix`, paired with their frequency, ranked.
    pub fn ranked_completions(&self, prefix: &str) -> Vec<(String, u64)> {
        let Some(start) = self.lookup_node(prefix) else {
            return Vec::new();
        };

        let mut found: Vec<(String, u64)> = Vec::new();
        let mut buf = prefix.to_string();

        if start.is_terminal() {
            found.push((buf.clone(), start.frequency()));
        }

        let mut stack: Vec<Step<'_>> = start
            .children()
            .map(|(ch, child)| Step::Enter(ch, child))
            .collect();

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(ch, node) => {
                    buf.push(ch);
                    if node.is_terminal() {
                        found.push((buf.clone(), node.frequency()));
                    }
                    // Leave sits below the children so it pops after the whole subtree.
                    stack.push(Step::Leave);
                    stack.extend(node.children().map(|(ch, child)| Step::Enter(ch, child)));
                }
                Step::Leave => {
                    buf.pop();
                }
            }
        }

        found.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        found
    }

    /// Words starting with `prefix`, most frequent first.
    pub fn suggestions(&self, prefix: &str) -> Vec<String> {
        self.ranked_completions(prefix)
            .into_iter()
            .map(|(word, _)| word)
            .collect()
    }

    /// Number of distinct stored words.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}
