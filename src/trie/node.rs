use std::collections::HashMap;

/// A node of the prefix trie.
///
/// Children are exclusively owned by their parent, so the trie is a strict tree.
/// `frequency` is only meaningful while `is_terminal` is set.
#[derive(Debug, Default, Clone)]
pub struct PrefixNode {
    children: HashMap<char, PrefixNode>,
    is_terminal: bool,
    frequency: u64,
}

impl PrefixNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the child for `ch`, creating it on first traversal.
    pub fn child_or_insert(&mut self, ch: char) -> &mut PrefixNode {
        self.children.entry(ch).or_default()
    }

    pub fn child(&self, ch: char) -> Option<&PrefixNode> {
        self.children.get(&ch)
    }

    pub fn children(&self) -> impl Iterator<Item = (char, &PrefixNode)> {
        self.children.iter().map(|(ch, node)| (*ch, node))
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Frequency of the word ending here, or 0 for a pure prefix node.
    pub fn frequency(&self) -> u64 {
        if self.is_terminal {
            self.frequency
        } else {
            0
        }
    }

    /// Marks the node as the end of a word and adds `increment_by` to its counter.
    pub fn mark_terminal(&mut self, increment_by: u64) {
        self.is_terminal = true;
        self.frequency = self.frequency.saturating_add(increment_by);
    }
}
