use crate::config::{Task, TreeConfig};
use crate::data::DataFrame;
use crate::errors::CanopyError;
use crate::loss::{ClassCounts, Entropy, GiniImpurity, Impurity, LabelStats, Loss, Variance};
use crate::node::Node;
use crate::sampler::FeatureSampler;
use crate::splitter::{best_split, has_varying_feature, pivot_on_split, SplitInfo};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Gains at or below this fraction of the parent impurity count as no gain.
const MIN_RELATIVE_GAIN: f64 = 1e-10;

/// A fitted binary decision tree.
///
/// Nodes live in an arena, the root is node 0 and every split owns the ids
/// of its two children.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    config: TreeConfig,
    task: Task,
    n_features: usize,
}

impl DecisionTree {
    /// Fit a tree.
    ///
    /// * `data` - Training frame, the last column is the label.
    /// * `config` - Hyperparameters, validated before any work is done.
    /// * `task` - Whether leaves hold the majority class or the mean label.
    pub fn fit(data: &DataFrame, config: &TreeConfig, task: Task) -> Result<Self, CanopyError> {
        config.validate()?;
        if data.n_features() == 0 {
            return Err(CanopyError::InsufficientData(
                "the frame has no feature columns".to_string(),
            ));
        }
        if !data.is_empty() && data.rows() < config.min_obs_per_leaf {
            return Err(CanopyError::InsufficientData(format!(
                "{} rows provided but min_obs_per_leaf is {}",
                data.rows(),
                config.min_obs_per_leaf
            )));
        }

        let mut tree = DecisionTree {
            nodes: Vec::new(),
            config: config.clone(),
            task,
            n_features: data.n_features(),
        };
        match config.loss {
            Loss::GiniImpurity => tree.grow::<GiniImpurity>(data),
            Loss::Entropy => tree.grow::<Entropy>(data),
            Loss::Variance => tree.grow::<Variance>(data),
        }
        debug!(
            "Fitted tree on {} rows, size {}, height {}, leaves {}.",
            data.rows(),
            tree.size(),
            tree.height(),
            tree.n_leaves()
        );
        Ok(tree)
    }

    fn grow<I: Impurity>(&mut self, data: &DataFrame) {
        let sampler = FeatureSampler::new(self.config.mtry);
        let root_index: Vec<usize> = (0..data.rows()).collect();
        let mut n_leaves = 1;

        // Ids are assigned when a node is popped. Left children are popped
        // first, so the ids follow pre-order and a left child is its
        // parent's id plus one.
        let mut stack: Vec<(Option<(usize, bool)>, Vec<usize>, usize)> = vec![(None, root_index, 0)];
        while let Some((parent, index, depth)) = stack.pop() {
            let id = self.nodes.len();
            if let Some((parent_id, is_left)) = parent {
                self.link_child(parent_id, is_left, id);
            }
            let labels: Vec<f64> = index.iter().map(|i| data.label(*i)).collect();
            let split = if self.should_stop(data, &index, &labels, depth, n_leaves) {
                None
            } else {
                let features = sampler.sample(self.config.seed, id, data.n_features());
                let parent_impurity = I::impurity(&labels);
                best_split::<I>(data, &index, &features, parent_impurity)
                    .filter(|s| self.is_admissible(s, index.len(), parent_impurity))
            };

            match split {
                Some(s) => {
                    let (left_index, right_index) = pivot_on_split(data, &index, s.feature, s.threshold);
                    // Child ids are filled in by `link_child` once they are popped.
                    self.nodes.push(Node::Split {
                        feature: s.feature,
                        threshold: s.threshold,
                        gain: s.gain,
                        n_obs: index.len(),
                        depth,
                        left: id,
                        right: id,
                    });
                    n_leaves += 1;
                    stack.push((Some((id, false)), right_index, depth + 1));
                    stack.push((Some((id, true)), left_index, depth + 1));
                }
                None => {
                    self.nodes.push(Node::Leaf {
                        value: leaf_value(&labels, self.task),
                        n_obs: index.len(),
                        depth,
                    });
                }
            }
        }
    }

    fn link_child(&mut self, parent_id: usize, is_left: bool, child: usize) {
        if let Node::Split { left, right, .. } = &mut self.nodes[parent_id] {
            if is_left {
                *left = child;
            } else {
                *right = child;
            }
        }
    }

    fn should_stop(&self, data: &DataFrame, index: &[usize], labels: &[f64], depth: usize, n_leaves: usize) -> bool {
        if index.len() < 2 * self.config.min_obs_per_leaf {
            return true;
        }
        if self.config.max_depth.is_some_and(|d| depth >= d) {
            return true;
        }
        // A split turns one leaf into two.
        if self.config.max_leaves.is_some_and(|m| n_leaves + 1 > m) {
            return true;
        }
        if labels.iter().all(|l| *l == labels[0]) {
            return true;
        }
        !has_varying_feature(data, index)
    }

    fn is_admissible(&self, split: &SplitInfo, n: usize, parent_impurity: f64) -> bool {
        // Parent and children accumulate in different orders, so a split
        // that separates nothing can still show a gain of a few ulps.
        if split.gain <= parent_impurity * MIN_RELATIVE_GAIN {
            return false;
        }
        let min_obs = self.config.min_obs_per_leaf;
        if split.left_count < min_obs || split.right_count < min_obs {
            return false;
        }
        match self.config.max_split_proportion {
            Some(p) => (split.left_count.max(split.right_count) as f64) <= p * n as f64,
            None => true,
        }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node, 0 for a single leaf.
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|n| n.depth()).max().unwrap_or(0)
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn task(&self) -> Task {
        self.task
    }

    /// Number of features the tree was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Dump a tree as a json object.
    pub fn json_dump(&self) -> Result<String, CanopyError> {
        serde_json::to_string(self).map_err(|e| CanopyError::UnableToWrite(e.to_string()))
    }

    /// Load a tree from a json string.
    ///
    /// The node arena is checked to be a tree rooted at node 0 whose splits
    /// only use features the tree knows about.
    pub fn from_json(json_str: &str) -> Result<Self, CanopyError> {
        let tree =
            serde_json::from_str::<DecisionTree>(json_str).map_err(|e| CanopyError::UnableToRead(e.to_string()))?;
        tree.check_arena().map_err(CanopyError::UnableToRead)?;
        Ok(tree)
    }

    fn check_arena(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("the tree has no nodes".to_string());
        }
        let mut referenced = vec![false; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature, left, right, ..
            } = node
            {
                if *feature >= self.n_features {
                    return Err(format!(
                        "node {} splits on feature {}, the tree has {} features",
                        id, feature, self.n_features
                    ));
                }
                for child in [*left, *right] {
                    // Children after their parent rule out cycles.
                    if child <= id || child >= self.nodes.len() {
                        return Err(format!("node {} has an invalid child {}", id, child));
                    }
                    if referenced[child] {
                        return Err(format!("node {} is the child of more than one split", child));
                    }
                    referenced[child] = true;
                }
            }
        }
        match referenced.iter().skip(1).position(|r| !r) {
            Some(i) => Err(format!("node {} is unreachable from the root", i + 1)),
            None => Ok(()),
        }
    }
}

/// Majority class (smallest label on ties) or mean label, `NaN` when empty.
pub fn leaf_value(labels: &[f64], task: Task) -> f64 {
    if labels.is_empty() {
        return f64::NAN;
    }
    match task {
        Task::Classification => {
            let mut counts = ClassCounts::default();
            for l in labels {
                counts.add(*l);
            }
            let mut best = (f64::NAN, 0);
            for (label, count) in counts.sorted() {
                if count > best.1 {
                    best = (label, count);
                }
            }
            best.0
        }
        Task::Regression => labels.iter().sum::<f64>() / labels.len() as f64,
    }
}

impl Display for DecisionTree {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<usize> = vec![0];
        let mut r = String::new();
        while let Some(idx) = print_buffer.pop() {
            let node = &self.nodes[idx];
            r += format!("{}{}: {}\n", "      ".repeat(node.depth()), idx, node).as_str();
            if let Node::Split { left, right, .. } = node {
                print_buffer.push(*right);
                print_buffer.push(*left);
            }
        }
        write!(f, "{}", r)
    }
}
