use std::cmp::Ordering;

use log::{debug, trace};

use crate::tree::policy::{BalancePolicy, Rebalance};

/// A node of a multiway search tree.
///
/// Internal nodes own exactly one more child than they hold keys; leaves own
/// none. Leaf-ness is derived from the child list only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<Node<K>>,
}

impl<K> Node<K> {
    pub fn leaf(keys: Vec<K>) -> Self {
        Node {
            keys,
            children: Vec::new(),
        }
    }

    pub fn internal(keys: Vec<K>, children: Vec<Node<K>>) -> Self {
        debug_assert_eq!(children.len(), keys.len() + 1);
        Node { keys, children }
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn children(&self) -> &[Node<K>] {
        &self.children
    }

    /// Number of keys held by this node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Smallest key of the subtree rooted here.
    pub fn min_key(&self) -> Option<&K> {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = child;
        }
        node.keys.first()
    }

    /// Largest key of the subtree rooted here.
    pub fn max_key(&self) -> Option<&K> {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = child;
        }
        node.keys.last()
    }

    /// Largest key of a subtree known to hold keys.
    fn rightmost_key(&self) -> &K {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = child;
        }
        &node.keys[node.keys.len() - 1]
    }

    /// Smallest key of a subtree known to hold keys.
    fn leftmost_key(&self) -> &K {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = child;
        }
        &node.keys[0]
    }

    /// Splits off the upper half around the key at `at`.
    ///
    /// This node keeps `keys[..at]` and `children[..=at]`; the returned
    /// sibling receives `keys[at+1..]` and `children[at+1..]`.
    pub(crate) fn split_off(&mut self, at: usize) -> (K, Node<K>) {
        debug_assert!(at < self.keys.len());
        let mut right_keys = self.keys.split_off(at);
        let median = right_keys.remove(0);
        let right_children = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.split_off(at + 1)
        };
        (
            median,
            Node {
                keys: right_keys,
                children: right_children,
            },
        )
    }

    /// Appends `separator` and all of `right` to this node.
    pub(crate) fn absorb(&mut self, separator: K, right: Node<K>) {
        debug_assert_eq!(self.is_leaf(), right.is_leaf());
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }

    /// Splits `children[idx]`, promoting its median into this node.
    pub(crate) fn split_child<P: BalancePolicy>(&mut self, idx: usize, policy: &P) {
        let at = policy.split_index();
        let (median, right) = self.children[idx].split_off(at);
        debug!(
            "split child {} into {} + 1 + {} keys",
            idx,
            self.children[idx].len(),
            right.len()
        );
        self.keys.insert(idx, median);
        self.children.insert(idx + 1, right);
    }

    /// Merges `children[idx + 1]` and the separator `keys[idx]` into
    /// `children[idx]`. The right sibling is dropped.
    fn merge_children(&mut self, idx: usize) {
        let right = self.children.remove(idx + 1);
        let separator = self.keys.remove(idx);
        let left = &mut self.children[idx];
        left.absorb(separator, right);
        debug!("merged children {} and {} into {} keys", idx, idx + 1, left.len());
    }

    /// Rotates the last key of `children[idx - 1]` through the parent into
    /// `children[idx]`.
    fn borrow_from_left(&mut self, idx: usize) {
        let (head, tail) = self.children.split_at_mut(idx);
        let left = &mut head[idx - 1];
        let child = &mut tail[0];
        debug_assert!(!left.is_empty(), "left sibling has no key to lend");
        let last = left.keys.len() - 1;
        let lent = left.keys.remove(last);
        let separator = std::mem::replace(&mut self.keys[idx - 1], lent);
        child.keys.insert(0, separator);
        if !left.is_leaf() {
            let last = left.children.len() - 1;
            child.children.insert(0, left.children.remove(last));
        }
        debug!("child {} borrowed a key from its left sibling", idx);
    }

    /// Rotates the first key of `children[idx + 1]` through the parent into
    /// `children[idx]`.
    fn borrow_from_right(&mut self, idx: usize) {
        let (head, tail) = self.children.split_at_mut(idx + 1);
        let child = &mut head[idx];
        let right = &mut tail[0];
        debug_assert!(!right.is_empty(), "right sibling has no key to lend");
        let lent = right.keys.remove(0);
        let separator = std::mem::replace(&mut self.keys[idx], lent);
        child.keys.push(separator);
        if !right.is_leaf() {
            child.children.push(right.children.remove(0));
        }
        debug!("child {} borrowed a key from its right sibling", idx);
    }

    /// Brings `children[idx]` back above the minimum: borrow from the left
    /// sibling, else from the right sibling, else merge with a neighbour.
    ///
    /// Returns the index of the child now covering the range `children[idx]`
    /// covered.
    fn rebalance_child<P: BalancePolicy>(&mut self, idx: usize, policy: &P) -> usize {
        if idx > 0 && policy.can_lend(self.children[idx - 1].len()) {
            self.borrow_from_left(idx);
            idx
        } else if idx + 1 < self.children.len() && policy.can_lend(self.children[idx + 1].len()) {
            self.borrow_from_right(idx);
            idx
        } else if idx > 0 {
            self.merge_children(idx - 1);
            idx - 1
        } else {
            self.merge_children(idx);
            idx
        }
    }

    /// Repairs `children[idx]` if it dropped below the minimum.
    fn repair_child<P: BalancePolicy>(&mut self, idx: usize, policy: &P) {
        if self.children.len() > 1 && policy.is_underflowing(self.children[idx].len()) {
            self.rebalance_child(idx, policy);
        }
    }
}

impl<K: Ord + Clone> Node<K> {
    /// Returns `Ok(idx)` if `key` is held here, otherwise `Err(idx)` with the
    /// index of the child whose range covers `key`.
    pub(crate) fn search(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        let mut node = self;
        loop {
            match node.search(key) {
                Ok(_) => return true,
                Err(idx) => match node.children.get(idx) {
                    Some(child) => node = child,
                    None => return false,
                },
            }
        }
    }

    /// Inserts `key` into the subtree rooted here. Returns `false` if the key
    /// is already present.
    ///
    /// The caller guarantees this node is not full under a preemptive policy.
    /// Under a reactive policy this node may overflow by one key, which the
    /// caller splits.
    pub(crate) fn insert<P: BalancePolicy>(&mut self, key: K, policy: &P) -> bool {
        let mut idx = match self.search(&key) {
            Ok(_) => return false,
            Err(idx) => idx,
        };
        if self.is_leaf() {
            self.keys.insert(idx, key);
            return true;
        }

        if policy.rebalance() == Rebalance::Preemptive && policy.is_full(self.children[idx].len()) {
            self.split_child(idx, policy);
            match key.cmp(&self.keys[idx]) {
                Ordering::Less => {}
                Ordering::Equal => return false,
                Ordering::Greater => idx += 1,
            }
        }
        trace!("insert descends into child {}", idx);
        let inserted = self.children[idx].insert(key, policy);
        if policy.is_overflowing(self.children[idx].len()) {
            self.split_child(idx, policy);
        }
        inserted
    }

    /// Removes `key` from the subtree rooted here. Returns `false` if the key
    /// is absent.
    ///
    /// Under a preemptive policy the caller guarantees this node holds more
    /// than the minimum (or is the root). Under a reactive policy this node
    /// may end one key short, which the caller repairs.
    pub(crate) fn remove<P: BalancePolicy>(&mut self, key: &K, policy: &P) -> bool {
        match self.search(key) {
            Ok(idx) if self.is_leaf() => {
                self.keys.remove(idx);
                true
            }
            Ok(idx) => {
                self.remove_separator(idx, policy);
                true
            }
            Err(_) if self.is_leaf() => false,
            Err(mut idx) => {
                if policy.rebalance() == Rebalance::Preemptive
                    && policy.at_minimum(self.children[idx].len())
                {
                    idx = self.rebalance_child(idx, policy);
                }
                trace!("remove descends into child {}", idx);
                let removed = self.children[idx].remove(key, policy);
                self.repair_child(idx, policy);
                removed
            }
        }
    }

    /// Removes the separator `keys[idx]` of an internal node.
    fn remove_separator<P: BalancePolicy>(&mut self, idx: usize, policy: &P) {
        let left_spare = policy.can_lend(self.children[idx].len());
        let right_spare = policy.can_lend(self.children[idx + 1].len());
        let reactive = policy.rebalance() == Rebalance::Reactive;

        if left_spare || (reactive && !right_spare) {
            let predecessor = self.children[idx].rightmost_key().clone();
            let removed = self.children[idx].remove(&predecessor, policy);
            debug_assert!(removed, "predecessor vanished from the left subtree");
            self.keys[idx] = predecessor;
            self.repair_child(idx, policy);
        } else if right_spare {
            let successor = self.children[idx + 1].leftmost_key().clone();
            let removed = self.children[idx + 1].remove(&successor, policy);
            debug_assert!(removed, "successor vanished from the right subtree");
            self.keys[idx] = successor;
            self.repair_child(idx + 1, policy);
        } else {
            let key = self.keys[idx].clone();
            self.merge_children(idx);
            let removed = self.children[idx].remove(&key, policy);
            debug_assert!(removed, "separator missing from the merged child");
            self.repair_child(idx, policy);
        }
    }
}
