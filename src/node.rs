use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of a fitted tree.
///
/// Children are referenced by their id in the tree's node arena, and every
/// id is held by exactly one parent slot.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub enum Node {
    Leaf {
        value: f64,
        n_obs: usize,
        depth: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        gain: f64,
        n_obs: usize,
        depth: usize,
        left: usize,
        right: usize,
    },
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { depth, .. } | Node::Split { depth, .. } => *depth,
        }
    }

    /// Prediction of a leaf, `None` for a split.
    pub fn leaf_value(&self) -> Option<f64> {
        match self {
            Node::Leaf { value, .. } => Some(*value),
            Node::Split { .. } => None,
        }
    }

    /// Number of training rows that reached the node.
    pub fn n_obs(&self) -> usize {
        match self {
            Node::Leaf { n_obs, .. } | Node::Split { n_obs, .. } => *n_obs,
        }
    }

    /// Get the path that should be traveled down, given a row of features.
    ///
    /// Returns `None` for a leaf.
    #[inline]
    pub fn get_child_idx(&self, features: &[f64]) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } => {
                if features[*feature] <= *threshold {
                    Some(*left)
                } else {
                    Some(*right)
                }
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Leaf { value, n_obs, .. } => write!(f, "leaf: value={}, n_obs={}", value, n_obs),
            Node::Split {
                feature,
                threshold,
                gain,
                n_obs,
                left,
                right,
                ..
            } => write!(
                f,
                "split: [x{} <= {}] yes={}, no={}, gain={}, n_obs={}",
                feature, threshold, left, right, gain, n_obs
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_child_idx() {
        let n = Node::Split {
            feature: 1,
            threshold: 2.5,
            gain: 0.5,
            n_obs: 4,
            depth: 0,
            left: 1,
            right: 2,
        };
        assert_eq!(n.get_child_idx(&[10.0, 2.5]), Some(1));
        assert_eq!(n.get_child_idx(&[-10.0, 2.6]), Some(2));
        assert!(!n.is_leaf());
        assert_eq!(n.n_obs(), 4);

        let leaf = Node::Leaf {
            value: 1.0,
            n_obs: 2,
            depth: 1,
        };
        assert_eq!(leaf.get_child_idx(&[0.0, 0.0]), None);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.leaf_value(), Some(1.0));
        assert_eq!(n.leaf_value(), None);
        assert_eq!(leaf.depth(), 1);
        assert_eq!(leaf.to_string(), "leaf: value=1, n_obs=2");
    }
}
