use crate::error::{TreeError, TreeResult};
use crate::tree::multiway::MultiwayTree;
use crate::tree::node::Node;
use crate::tree::policy::BalancePolicy;

struct Walk<'p, P> {
    policy: &'p P,
    leaf_depth: Option<usize>,
    keys: usize,
}

impl<K: Ord + Clone, P: BalancePolicy> MultiwayTree<K, P> {
    /// Walks the whole tree and reports the first structural violation.
    ///
    /// Checks ordering, separator bounds, key and child counts, occupancy bounds
    /// of the policy, uniform leaf depth and the stored key count.
    pub fn check_invariants(&self) -> TreeResult<()> {
        let Some(root) = self.root.as_ref() else {
            if self.len != 0 {
                return Err(TreeError::Corrupted(format!(
                    "empty tree reports {} keys",
                    self.len
                )));
            }
            return Ok(());
        };
        if root.is_empty() {
            return Err(TreeError::Corrupted("root holds no keys".to_string()));
        }

        let mut walk = Walk {
            policy: &self.policy,
            leaf_depth: None,
            keys: 0,
        };
        walk.visit(root, true, None, None, 0)?;

        if walk.keys != self.len {
            return Err(TreeError::Corrupted(format!(
                "tree holds {} keys but reports {}",
                walk.keys, self.len
            )));
        }
        Ok(())
    }
}

impl<P: BalancePolicy> Walk<'_, P> {
    fn visit<K: Ord>(
        &mut self,
        node: &Node<K>,
        is_root: bool,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
    ) -> TreeResult<()> {
        let len = node.len();
        if len > self.policy.max_keys() {
            return Err(TreeError::Corrupted(format!(
                "node at depth {} holds {} keys, maximum is {}",
                depth,
                len,
                self.policy.max_keys()
            )));
        }
        if !is_root && len < self.policy.min_keys() {
            return Err(TreeError::Corrupted(format!(
                "node at depth {} holds {} keys, minimum is {}",
                depth,
                len,
                self.policy.min_keys()
            )));
        }
        if node.keys().windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(TreeError::Corrupted(format!(
                "keys of node at depth {} are not strictly increasing",
                depth
            )));
        }
        let below_lower = match (lower, node.keys().first()) {
            (Some(bound), Some(first)) => first <= bound,
            _ => false,
        };
        let above_upper = match (upper, node.keys().last()) {
            (Some(bound), Some(last)) => last >= bound,
            _ => false,
        };
        if below_lower || above_upper {
            return Err(TreeError::Corrupted(format!(
                "node at depth {} holds keys outside its separators",
                depth
            )));
        }
        self.keys += len;

        if node.is_leaf() {
            return match self.leaf_depth {
                None => {
                    self.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected == depth => Ok(()),
                Some(expected) => Err(TreeError::Corrupted(format!(
                    "leaf at depth {} but other leaves at depth {}",
                    depth, expected
                ))),
            };
        }

        let children = node.child_count();
        if children > self.policy.max_children() {
            return Err(TreeError::Corrupted(format!(
                "internal node at depth {} has {} children, maximum is {}",
                depth,
                children,
                self.policy.max_children()
            )));
        }
        if !is_root && children < self.policy.min_children() {
            return Err(TreeError::Corrupted(format!(
                "internal node at depth {} has {} children, minimum is {}",
                depth,
                children,
                self.policy.min_children()
            )));
        }
        if children != len + 1 {
            return Err(TreeError::Corrupted(format!(
                "internal node at depth {} has {} keys and {} children",
                depth,
                len,
                children
            )));
        }
        for (i, child) in node.children().iter().enumerate() {
            let child_lower = if i == 0 { lower } else { node.keys().get(i - 1) };
            let child_upper = node.keys().get(i).or(upper);
            self.visit(child, false, child_lower, child_upper, depth + 1)?;
        }
        Ok(())
    }
}
