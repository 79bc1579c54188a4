use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::iter::FusedIterator;

use crate::tree::multiway::MultiwayTree;
use crate::tree::node::Node;
use crate::tree::policy::BalancePolicy;

/// Rendering of an empty tree.
pub const EMPTY_TREE: &str = "(empty)";

/// One level of a breadth-first dump: the key groups of every node on that
/// level, left to right.
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Level<'a, K> {
    /// Zero for the root.
    pub depth: usize,
    pub nodes: Vec<&'a [K]>,
}

impl<K: Clone> Level<'_, K> {
    pub fn to_vec(&self) -> Vec<Vec<K>> {
        self.nodes.iter().map(|keys| keys.to_vec()).collect()
    }
}

impl<K: Display> Display for Level<'_, K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, keys) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str("[ ")?;
            for key in keys.iter() {
                write!(f, "{} ", key)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Level-order traversal of a tree. Each call to `next` drains the current
/// level and queues the one below it.
pub struct Levels<'a, K> {
    depth: usize,
    queue: VecDeque<&'a Node<K>>,
}

impl<'a, K> Levels<'a, K> {
    pub(crate) fn new(root: Option<&'a Node<K>>) -> Self {
        Levels {
            depth: 0,
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, K> Iterator for Levels<'a, K> {
    type Item = Level<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.queue.is_empty() {
            return None;
        }
        let mut next_queue = VecDeque::new();
        let mut nodes = Vec::with_capacity(self.queue.len());
        while let Some(node) = self.queue.pop_front() {
            nodes.push(node.keys());
            next_queue.extend(node.children().iter());
        }
        let level = Level::new(self.depth, nodes);
        self.depth += 1;
        self.queue = next_queue;
        Some(level)
    }
}

impl<K> FusedIterator for Levels<'_, K> {}

/// In-order traversal yielding keys in ascending order.
pub struct Iter<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: Option<&'a Node<K>>, len: usize) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: len,
        };
        if let Some(root) = root {
            iter.descend_left(root);
        }
        iter
    }

    fn descend_left(&mut self, node: &'a Node<K>) {
        let mut current = node;
        loop {
            self.stack.push((current, 0));
            match current.children().first() {
                Some(child) => current = child,
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, idx)) = self.stack.pop() {
            if idx < node.len() {
                self.stack.push((node, idx + 1));
                if let Some(child) = node.children().get(idx + 1) {
                    self.descend_left(child);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return Some(&node.keys()[idx]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K: Display, P: BalancePolicy> Display for MultiwayTree<K, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str(EMPTY_TREE);
        }
        for (i, level) in self.levels().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", level)?;
        }
        Ok(())
    }
}
