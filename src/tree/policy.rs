use std::fmt::Debug;

use crate::config::{TreeConfig, Variant};
use crate::error::{TreeError, TreeResult};

/// Where the tree restores balance relative to the recursive descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebalance {
    /// Split full children and top up children at minimum occupancy before
    /// descending into them. Requires `max_keys >= 2 * min_keys + 1`.
    Preemptive,
    /// Descend first, then split children that overflowed and repair children
    /// that underflowed on the way back up.
    Reactive,
}

/// Occupancy rules of a multiway tree.
///
/// The tree algorithms are written once against this trait; an implementation
/// only decides thresholds. Every occupancy check derives from
/// [`BalancePolicy::max_keys`] and [`BalancePolicy::min_keys`], so the split
/// trigger, the rebalance trigger and borrow eligibility can never disagree.
pub trait BalancePolicy: Debug + Clone {
    /// Most keys a node may hold once an operation has returned.
    fn max_keys(&self) -> usize;

    /// Fewest keys a non-root node may hold once an operation has returned.
    fn min_keys(&self) -> usize;

    /// Index of the key promoted out of a node being split.
    fn split_index(&self) -> usize;

    fn rebalance(&self) -> Rebalance;

    /// Short human readable description, e.g. `B-tree (t = 2)`.
    fn describe(&self) -> String;

    fn max_children(&self) -> usize {
        self.max_keys() + 1
    }

    fn min_children(&self) -> usize {
        self.min_keys() + 1
    }

    /// A node this full is split before the tree descends into it.
    fn is_full(&self, keys: usize) -> bool {
        keys >= self.max_keys()
    }

    fn is_overflowing(&self, keys: usize) -> bool {
        keys > self.max_keys()
    }

    /// A child this small is rebalanced before the tree descends into it.
    fn at_minimum(&self, keys: usize) -> bool {
        keys <= self.min_keys()
    }

    fn is_underflowing(&self, keys: usize) -> bool {
        keys < self.min_keys()
    }

    /// Whether a node can give a key to a sibling and stay within bounds.
    fn can_lend(&self, keys: usize) -> bool {
        keys > self.min_keys()
    }
}

/// B-tree balance: every non-root node holds `t-1 ..= 2t-1` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinDegree {
    t: usize,
}

impl MinDegree {
    pub fn new(t: usize) -> TreeResult<Self> {
        TreeConfig::btree(t).validate()?;
        Ok(MinDegree { t })
    }
}

impl BalancePolicy for MinDegree {
    fn max_keys(&self) -> usize {
        2 * self.t - 1
    }

    fn min_keys(&self) -> usize {
        self.t - 1
    }

    // t-1 of 2t-1 keys leaves t-1 keys on either side.
    fn split_index(&self) -> usize {
        self.t - 1
    }

    fn rebalance(&self) -> Rebalance {
        Rebalance::Preemptive
    }

    fn describe(&self) -> String {
        format!("B-tree (t = {})", self.t)
    }
}

/// m-way balance: every node holds at most `m-1` keys, non-root nodes at
/// least `ceil(m/2) - 1`.
///
/// A full node of `m-1` keys cannot always be split into two halves that meet
/// the minimum (the 2-3 tree is the smallest example), so this policy splits
/// reactively: a node is split once it holds `m` keys, at index `m/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    m: usize,
}

impl Order {
    pub fn new(m: usize) -> TreeResult<Self> {
        TreeConfig::mway(m).validate()?;
        Ok(Order { m })
    }
}

impl BalancePolicy for Order {
    fn max_keys(&self) -> usize {
        self.m - 1
    }

    fn min_keys(&self) -> usize {
        self.m.div_ceil(2) - 1
    }

    // m/2 of m keys leaves m/2 on the left and ceil(m/2)-1 on the right.
    fn split_index(&self) -> usize {
        self.m / 2
    }

    fn rebalance(&self) -> Rebalance {
        Rebalance::Reactive
    }

    fn describe(&self) -> String {
        format!("m-way tree (m = {})", self.m)
    }
}

/// Policy chosen at runtime from a [`TreeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyPolicy {
    MinDegree(MinDegree),
    Order(Order),
}

impl TryFrom<&TreeConfig> for AnyPolicy {
    type Error = TreeError;

    fn try_from(config: &TreeConfig) -> Result<Self, Self::Error> {
        match config.variant {
            Variant::BTree => Ok(AnyPolicy::MinDegree(MinDegree::new(config.parameter)?)),
            Variant::MWay => Ok(AnyPolicy::Order(Order::new(config.parameter)?)),
        }
    }
}

impl BalancePolicy for AnyPolicy {
    fn max_keys(&self) -> usize {
        match self {
            AnyPolicy::MinDegree(policy) => policy.max_keys(),
            AnyPolicy::Order(policy) => policy.max_keys(),
        }
    }

    fn min_keys(&self) -> usize {
        match self {
            AnyPolicy::MinDegree(policy) => policy.min_keys(),
            AnyPolicy::Order(policy) => policy.min_keys(),
        }
    }

    fn split_index(&self) -> usize {
        match self {
            AnyPolicy::MinDegree(policy) => policy.split_index(),
            AnyPolicy::Order(policy) => policy.split_index(),
        }
    }

    fn rebalance(&self) -> Rebalance {
        match self {
            AnyPolicy::MinDegree(policy) => policy.rebalance(),
            AnyPolicy::Order(policy) => policy.rebalance(),
        }
    }

    fn describe(&self) -> String {
        match self {
            AnyPolicy::MinDegree(policy) => policy.describe(),
            AnyPolicy::Order(policy) => policy.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnyPolicy, BalancePolicy, MinDegree, Order, Rebalance};
    use crate::config::TreeConfig;

    #[test]
    fn min_degree_bounds() {
        let policy = MinDegree::new(2).unwrap();
        assert_eq!(policy.max_keys(), 3);
        assert_eq!(policy.min_keys(), 1);
        assert_eq!(policy.split_index(), 1);
        assert_eq!(policy.max_children(), 4);
        assert_eq!(policy.min_children(), 2);
        assert_eq!(policy.rebalance(), Rebalance::Preemptive);

        let policy = MinDegree::new(5).unwrap();
        assert_eq!(policy.max_keys(), 9);
        assert_eq!(policy.min_keys(), 4);
        assert_eq!(policy.split_index(), 4);
    }

    #[test]
    fn order_bounds() {
        let expected = [(3, 2, 1, 1), (4, 3, 1, 2), (5, 4, 2, 2), (6, 5, 2, 3), (7, 6, 3, 3)];
        for (m, max, min, split) in expected {
            let policy = Order::new(m).unwrap();
            assert_eq!(policy.max_keys(), max, "max keys for m = {m}");
            assert_eq!(policy.min_keys(), min, "min keys for m = {m}");
            assert_eq!(policy.split_index(), split, "split index for m = {m}");
            assert_eq!(policy.rebalance(), Rebalance::Reactive);
        }
    }

    #[test]
    fn split_halves_meet_minimum() {
        // Preemptive policies split a full node, reactive ones an overflowing one.
        for t in 2..10 {
            let policy = MinDegree::new(t).unwrap();
            let left = policy.split_index();
            let right = policy.max_keys() - left - 1;
            assert!(left >= policy.min_keys() && right >= policy.min_keys());
            // merging two minimal siblings around their separator must fit
            assert!(2 * policy.min_keys() + 1 <= policy.max_keys());
        }
        for m in 3..20 {
            let policy = Order::new(m).unwrap();
            let left = policy.split_index();
            let right = policy.max_keys() + 1 - left - 1;
            assert!(left >= policy.min_keys() && right >= policy.min_keys());
            assert!(left <= policy.max_keys() && right <= policy.max_keys());
            // an underflowing child merged with a minimal sibling must fit
            assert!(2 * policy.min_keys() <= policy.max_keys());
        }
    }

    #[test]
    fn trigger_and_eligibility_share_minimum() {
        for m in 3..12 {
            let policy = Order::new(m).unwrap();
            let min = policy.min_keys();
            assert!(policy.at_minimum(min));
            assert!(!policy.can_lend(min));
            assert!(policy.can_lend(min + 1));
            assert!(!policy.at_minimum(min + 1));
            assert!(!policy.is_underflowing(min));
            if min > 0 {
                assert!(policy.is_underflowing(min - 1));
            }
        }
    }

    #[test]
    fn reject_degenerate_parameters() {
        assert!(MinDegree::new(0).is_err());
        assert!(MinDegree::new(1).is_err());
        assert!(Order::new(2).is_err());
        assert!(Order::new(3).is_ok());
    }

    #[test]
    fn any_policy_from_config() {
        let policy = AnyPolicy::try_from(&TreeConfig::mway(4)).unwrap();
        assert_eq!(policy, AnyPolicy::Order(Order::new(4).unwrap()));
        assert_eq!(policy.describe(), "m-way tree (m = 4)");
        assert!(AnyPolicy::try_from(&TreeConfig::btree(1)).is_err());
    }
}
