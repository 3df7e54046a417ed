pub mod predict;
pub mod tree;

pub use tree::{leaf_value, DecisionTree};
