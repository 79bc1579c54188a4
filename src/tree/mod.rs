mod multiway;
mod node;
mod policy;
mod traversal;
mod validate;

pub use multiway::{BTree, MWayTree, MultiwayTree};
pub use node::Node;
pub use policy::{AnyPolicy, BalancePolicy, MinDegree, Order, Rebalance};
pub use traversal::{Iter, Level, Levels, EMPTY_TREE};
