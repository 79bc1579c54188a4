use comfy_table::Cell;
use std::fmt::Display;

use crate::tree::{BalancePolicy, MultiwayTree, EMPTY_TREE};

const TABLE_PRESET: &str = "||--+-++|    ++++++";

/// Renders the tree level by level, one table per level and one cell per
/// node, each headed by its position and occupancy.
pub fn pretty_format_tree<K: Display, P: BalancePolicy>(tree: &MultiwayTree<K, P>) -> String {
    let mut display = String::new();

    if tree.is_empty() {
        display.push_str(EMPTY_TREE);
        return display;
    }

    display.push_str(&format!(
        "{}, {} keys, height {}\n",
        tree.policy().describe(),
        tree.len(),
        tree.height()
    ));

    let max_keys = tree.policy().max_keys();
    for level in tree.levels() {
        display.push_str(&format!("Level No.{}:\n", level.depth + 1));

        let mut level_table = comfy_table::Table::new();
        level_table.load_preset(TABLE_PRESET);
        let mut level_header = Vec::with_capacity(level.nodes.len());
        let mut level_row = Vec::with_capacity(level.nodes.len());

        for (position, keys) in level.nodes.iter().enumerate() {
            level_header.push(Cell::new(format!(
                "node {}, size: {}/{}",
                position,
                keys.len(),
                max_keys
            )));
            level_row.push(Cell::new(
                keys.iter()
                    .map(|key| format!("{key}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }
        level_table.set_header(level_header);
        level_table.add_row(level_row);
        display.push_str(&format!("{level_table}\n"));
    }
    display
}

#[cfg(test)]
mod tests {
    use super::pretty_format_tree;
    use crate::tree::{BTree, MWayTree};

    #[test]
    fn format_empty_tree() {
        let tree = BTree::<i32>::btree(2).unwrap();
        assert_eq!(pretty_format_tree(&tree), "(empty)");
    }

    #[test]
    fn format_levels() {
        let mut tree = MWayTree::mway(3).unwrap();
        tree.extend(1..=7);
        let display = pretty_format_tree(&tree);

        assert!(display.starts_with("m-way tree (m = 3), 7 keys, height 3\n"));
        assert!(display.contains("Level No.1:"));
        assert!(display.contains("Level No.3:"));
        assert!(!display.contains("Level No.4:"));
        assert!(display.contains("node 3, size: 1/2"));
    }
}
