use log::debug;

use crate::config::TreeConfig;
use crate::error::TreeResult;
use crate::tree::node::Node;
use crate::tree::policy::{AnyPolicy, BalancePolicy, MinDegree, Order, Rebalance};
use crate::tree::traversal::{Iter, Levels};

/// B-tree parameterized by minimum degree `t`.
pub type BTree<K> = MultiwayTree<K, MinDegree>;
/// m-way search tree parameterized by order `m`.
pub type MWayTree<K> = MultiwayTree<K, Order>;

/// Balanced multiway search tree holding a set of ordered keys.
///
/// The tree owns its nodes outright. Occupancy bounds come from the policy
/// `P`, which is fixed at construction.
#[derive(Debug, Clone)]
pub struct MultiwayTree<K, P> {
    pub(crate) root: Option<Node<K>>,
    pub(crate) policy: P,
    pub(crate) len: usize,
}

impl<K> MultiwayTree<K, MinDegree> {
    /// Creates an empty B-tree. Fails if `t < 2`.
    pub fn btree(t: usize) -> TreeResult<Self> {
        Ok(Self::with_policy(MinDegree::new(t)?))
    }
}

impl<K> MultiwayTree<K, Order> {
    /// Creates an empty m-way search tree. Fails if `m < 3`.
    pub fn mway(m: usize) -> TreeResult<Self> {
        Ok(Self::with_policy(Order::new(m)?))
    }
}

impl<K> MultiwayTree<K, AnyPolicy> {
    pub fn from_config(config: &TreeConfig) -> TreeResult<Self> {
        Ok(Self::with_policy(AnyPolicy::try_from(config)?))
    }
}

impl<K, P: BalancePolicy> MultiwayTree<K, P> {
    pub fn with_policy(policy: P) -> Self {
        MultiwayTree {
            root: None,
            policy,
            len: 0,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_ref()
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels; zero for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_ref();
        while let Some(current) = node {
            height += 1;
            node = current.children.first();
        }
        height
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.levels().map(|level| level.nodes.len()).sum()
    }

    /// Breadth-first dump of the tree, one item per level.
    pub fn levels(&self) -> Levels<'_, K> {
        Levels::new(self.root.as_ref())
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root.as_ref(), self.len)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Replaces the root by a new one holding the root's promoted median.
    fn grow_root(&mut self) {
        if let Some(old_root) = self.root.take() {
            let mut new_root = Node::internal(Vec::new(), vec![old_root]);
            new_root.split_child(0, &self.policy);
            self.root = Some(new_root);
            debug!("root split, tree grows to height {}", self.height());
        }
    }

    /// Drops a root left without keys: an empty leaf empties the tree, an
    /// empty internal root is replaced by its only child.
    fn collapse_root(&mut self) {
        let Some(mut root) = self.root.take() else {
            return;
        };
        if !root.is_empty() {
            self.root = Some(root);
            return;
        }
        if root.is_leaf() {
            debug!("last key removed, tree is empty");
        } else {
            debug_assert_eq!(root.children.len(), 1);
            let child = root.children.remove(0);
            debug!("root collapsed into its only child");
            self.root = Some(child);
        }
    }
}

impl<K: Ord + Clone, P: BalancePolicy> MultiwayTree<K, P> {
    /// Adds `key` to the tree. Returns `false` and leaves the tree untouched if
    /// the key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        if self.root.is_none() {
            self.root = Some(Node::leaf(vec![key]));
            self.len = 1;
            return true;
        }
        if self.contains(&key) {
            return false;
        }

        let root_full = self
            .root
            .as_ref()
            .is_some_and(|root| self.policy.is_full(root.len()));
        if self.policy.rebalance() == Rebalance::Preemptive && root_full {
            self.grow_root();
        }

        let inserted = match self.root.as_mut() {
            Some(root) => root.insert(key, &self.policy),
            None => false,
        };

        let root_overflowing = self
            .root
            .as_ref()
            .is_some_and(|root| self.policy.is_overflowing(root.len()));
        if root_overflowing {
            self.grow_root();
        }

        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes `key` from the tree. Returns `false` if it was absent, which is
    /// not an error.
    pub fn delete(&mut self, key: &K) -> bool {
        let removed = match self.root.as_mut() {
            Some(root) => root.remove(key, &self.policy),
            None => return false,
        };
        self.collapse_root();

        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn contains(&self, key: &K) -> bool {
        self.root.as_ref().is_some_and(|root| root.contains(key))
    }

    pub fn min(&self) -> Option<&K> {
        self.root.as_ref().and_then(|root| root.min_key())
    }

    pub fn max(&self) -> Option<&K> {
        self.root.as_ref().and_then(|root| root.max_key())
    }
}

impl<K: Ord + Clone, P: BalancePolicy> Extend<K> for MultiwayTree<K, P> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

impl<'a, K, P: BalancePolicy> IntoIterator for &'a MultiwayTree<K, P> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
