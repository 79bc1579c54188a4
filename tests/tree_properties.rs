use std::collections::BTreeSet;

use multiway_tree::config::TreeConfig;
use multiway_tree::tree::{AnyPolicy, BTree, BalancePolicy, MWayTree, MultiwayTree};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn keys<P: BalancePolicy>(tree: &MultiwayTree<i64, P>) -> Vec<i64> {
    tree.iter().copied().collect()
}

fn assert_matches<P: BalancePolicy>(tree: &MultiwayTree<i64, P>, model: &BTreeSet<i64>) {
    tree.check_invariants()
        .unwrap_or_else(|e| panic!("{}: {}\n{}", tree.policy().describe(), e, tree));
    assert_eq!(keys(tree), model.iter().copied().collect::<Vec<_>>());
    assert_eq!(tree.len(), model.len());
    assert_eq!(tree.is_empty(), model.is_empty());
}

/// Every policy the suite exercises, including both parities of m.
fn policies() -> Vec<AnyPolicy> {
    let mut configs: Vec<TreeConfig> = (2..=5).map(TreeConfig::btree).collect();
    configs.extend((3..=8).map(TreeConfig::mway));
    configs
        .iter()
        .map(|config| AnyPolicy::try_from(config).unwrap())
        .collect()
}

#[test]
fn random_interleavings_keep_invariants() {
    for (seed, policy) in policies().into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let mut tree = MultiwayTree::with_policy(policy);
        let mut model = BTreeSet::new();

        for _ in 0..2_000 {
            let key = rng.random_range(0..300);
            if rng.random_bool(0.6) {
                assert_eq!(tree.insert(key), model.insert(key));
            } else {
                assert_eq!(tree.delete(&key), model.remove(&key));
            }
            assert_matches(&tree, &model);
        }
    }
}

#[test]
fn insert_then_delete_removes_exactly_one_key() {
    for policy in policies() {
        let mut tree = MultiwayTree::with_policy(policy);
        tree.extend((0..200).map(|key| key * 3));
        let before = keys(&tree);

        assert!(tree.insert(301));
        assert!(tree.delete(&301));
        assert!(!tree.contains(&301));
        assert_eq!(keys(&tree), before);
        tree.check_invariants().unwrap();
    }
}

#[test]
fn deleting_absent_keys_keeps_contents() {
    for policy in policies() {
        let mut tree = MultiwayTree::with_policy(policy);
        tree.extend((0..100).map(|key| key * 2));
        let before = keys(&tree);

        for key in (-5..205).filter(|key| key % 2 != 0) {
            assert!(!tree.delete(&key));
            tree.check_invariants().unwrap();
        }
        assert_eq!(keys(&tree), before);
    }
}

#[test]
fn duplicate_inserts_keep_structure() {
    for (seed, policy) in policies().into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(seed as u64 + 100);
        let mut tree: MultiwayTree<i64, AnyPolicy> = MultiwayTree::with_policy(policy);
        let mut present: Vec<i64> = (0..150).map(|_| rng.random_range(0..1_000)).collect();
        tree.extend(present.iter().copied());
        present.sort();
        present.dedup();

        let before: Vec<_> = tree.levels().map(|level| level.to_vec()).collect();
        present.shuffle(&mut rng);
        for key in &present {
            assert!(!tree.insert(*key));
        }
        let after: Vec<_> = tree.levels().map(|level| level.to_vec()).collect();
        assert_eq!(after, before, "{}", tree.policy().describe());
        assert_eq!(tree.len(), present.len());
    }
}

#[test]
fn delete_all_in_any_order_empties_the_tree() {
    let mut rng = StdRng::seed_from_u64(7);
    for policy in policies() {
        for round in 0..3 {
            let mut inserted: Vec<i64> = (0..150).collect();
            inserted.shuffle(&mut rng);
            let mut tree = MultiwayTree::with_policy(policy);
            tree.extend(inserted.iter().copied());

            let mut order = inserted.clone();
            match round {
                0 => order.sort(),
                1 => order.sort_by(|a, b| b.cmp(a)),
                _ => order.shuffle(&mut rng),
            }
            let mut model: BTreeSet<i64> = inserted.into_iter().collect();
            for key in order {
                assert!(tree.delete(&key));
                model.remove(&key);
                assert_matches(&tree, &model);
            }

            assert!(tree.is_empty());
            assert!(tree.root().is_none());
            assert_eq!(tree.levels().count(), 0);
            assert_eq!(tree.to_string(), "(empty)");
        }
    }
}

#[test]
fn occupancy_never_drops_below_minimum() {
    // Sweeps the boundary where a child holds exactly the minimum number of keys.
    for m in 3..=9 {
        let mut tree = MWayTree::mway(m).unwrap();
        let min = tree.policy().min_keys();
        let max = tree.policy().max_keys();
        tree.extend(0..400);
        for key in (0..400).step_by(2) {
            tree.delete(&key);
            for level in tree.levels().skip(1) {
                for node in level.nodes {
                    assert!(
                        (min..=max).contains(&node.len()),
                        "m = {m}: node holds {} keys outside [{min}, {max}]",
                        node.len()
                    );
                }
            }
        }
        assert_eq!(keys(&tree), (0..400i64).filter(|key| key % 2 == 1).collect::<Vec<_>>());
    }
}

#[test]
fn two_three_tree_shape() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut tree = MWayTree::mway(3).unwrap();
    for _ in 0..1_000 {
        let key: i64 = rng.random_range(0..120);
        if rng.random_bool(0.55) {
            tree.insert(key);
        } else {
            tree.delete(&key);
        }
        for level in tree.levels() {
            for node in level.nodes {
                assert!((1..=2).contains(&node.len()));
            }
        }
        tree.check_invariants().unwrap();
    }
}

#[test]
fn root_collapse_from_minimal_two_level_tree() {
    let mut tree = BTree::btree(3).unwrap();
    // 1..=6 splits the root once: [3] over [1 2] and [4 5 6]
    tree.extend(1..=6);
    assert_eq!(tree.height(), 2);
    tree.delete(&6);
    assert_eq!(tree.height(), 2);

    // both children are now minimal, so the next delete merges them
    tree.delete(&1);
    assert_eq!(tree.height(), 1);
    assert_eq!(keys(&tree), vec![2, 3, 4, 5]);
    assert_eq!(tree.levels().count(), 1);

    let mut tree = MWayTree::mway(3).unwrap();
    tree.extend([1, 2, 3]);
    assert_eq!(tree.height(), 2);
    tree.delete(&3);
    assert_eq!(tree.height(), 1);
    assert_eq!(keys(&tree), vec![1, 2]);
}

#[test]
fn height_stays_logarithmic() {
    let mut tree = BTree::btree(2).unwrap();
    tree.extend(0..10_000);
    // a B-tree of minimum degree t has height at most log_t((n + 1) / 2) + 1
    assert!(tree.height() <= 14, "height {}", tree.height());

    let mut tree = MWayTree::mway(3).unwrap();
    tree.extend(0..10_000);
    assert!(tree.height() <= 14, "height {}", tree.height());
    tree.check_invariants().unwrap();
}
