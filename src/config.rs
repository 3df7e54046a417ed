//! Tree Configuration
//!
//! Hyperparameters of a single decision tree and the learning task.
use crate::errors::CanopyError;
use crate::loss::Loss;
use crate::utils::{validate_float_parameter, validate_positive_usize_parameter};
use serde::{Deserialize, Serialize};

/// Learning task, decides what a leaf predicts.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Task {
    /// Leaves predict the majority class.
    #[default]
    Classification,
    /// Leaves predict the mean label.
    Regression,
}

fn default_max_depth() -> Option<usize> {
    Some(5)
}
fn default_min_obs_per_leaf() -> usize {
    1
}
fn default_seed() -> u64 {
    42
}

/// Hyperparameters used to fit one `DecisionTree`.
///
/// `None` means unbounded for the limits, and all features for `mtry`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct TreeConfig {
    /// Maximum depth of a leaf, the root is at depth 0.
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,
    /// Maximum number of leaves.
    #[serde(default)]
    pub max_leaves: Option<usize>,
    /// Minimum number of rows a split may leave on either side.
    #[serde(default = "default_min_obs_per_leaf")]
    pub min_obs_per_leaf: usize,
    /// Largest share of a node's rows the bigger child may receive.
    #[serde(default)]
    pub max_split_proportion: Option<f64>,
    /// Number of features drawn at every node.
    #[serde(default)]
    pub mtry: Option<usize>,
    /// Impurity measure used to score splits.
    #[serde(default)]
    pub loss: Loss,
    /// Seed for feature subsampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            max_depth: default_max_depth(),
            max_leaves: None,
            min_obs_per_leaf: default_min_obs_per_leaf(),
            max_split_proportion: None,
            mtry: None,
            loss: Loss::default(),
            seed: default_seed(),
        }
    }
}

fn unbounded_if_negative(v: i64) -> Option<usize> {
    if v < 0 {
        None
    } else {
        Some(v as usize)
    }
}

impl TreeConfig {
    /// Default configuration with the given depth limit.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        TreeConfig {
            max_depth,
            ..Default::default()
        }
    }

    /// Build a configuration from the signed convention where `-1` means unbounded.
    ///
    /// * `mtry` - Features drawn per node, negative draws all features.
    /// * `max_depth` - Depth limit, negative for no limit.
    /// * `max_leaves` - Leaf limit, negative for no limit.
    /// * `min_obs_per_leaf` - Rows required on each side of a split, must be at least 1.
    /// * `max_split_proportion` - Largest child share, negative for no limit.
    /// * `loss` - Impurity measure.
    /// * `seed` - Seed for feature subsampling.
    pub fn from_signed(
        mtry: i64,
        max_depth: i64,
        max_leaves: i64,
        min_obs_per_leaf: i64,
        max_split_proportion: f64,
        loss: Loss,
        seed: u64,
    ) -> Result<Self, CanopyError> {
        if min_obs_per_leaf <= 0 {
            return Err(CanopyError::InvalidHyperparameter(
                "min_obs_per_leaf".to_string(),
                "integer value of at least 1".to_string(),
                min_obs_per_leaf.to_string(),
            ));
        }
        let cfg = TreeConfig {
            max_depth: unbounded_if_negative(max_depth),
            max_leaves: unbounded_if_negative(max_leaves),
            min_obs_per_leaf: min_obs_per_leaf as usize,
            max_split_proportion: if max_split_proportion < 0.0 {
                None
            } else {
                Some(max_split_proportion)
            },
            mtry: unbounded_if_negative(mtry),
            loss,
            seed,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that the hyperparameters can be used to fit a tree.
    pub fn validate(&self) -> Result<(), CanopyError> {
        validate_positive_usize_parameter(self.min_obs_per_leaf, "min_obs_per_leaf")?;
        if let Some(max_leaves) = self.max_leaves {
            validate_positive_usize_parameter(max_leaves, "max_leaves")?;
        }
        if let Some(mtry) = self.mtry {
            validate_positive_usize_parameter(mtry, "mtry")?;
        }
        if let Some(p) = self.max_split_proportion {
            validate_float_parameter(p, f64::MIN_POSITIVE, 1.0, "max_split_proportion")?;
        }
        Ok(())
    }

    /// Dump the configuration as a json object.
    pub fn json_dump(&self) -> Result<String, CanopyError> {
        serde_json::to_string(self).map_err(|e| CanopyError::UnableToWrite(e.to_string()))
    }

    /// Load a configuration from a json string, omitted fields take their defaults.
    pub fn from_json(json_str: &str) -> Result<Self, CanopyError> {
        let cfg = serde_json::from_str::<TreeConfig>(json_str).map_err(|e| CanopyError::UnableToRead(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = TreeConfig::default();
        assert_eq!(cfg.max_depth, Some(5));
        assert_eq!(cfg.min_obs_per_leaf, 1);
        assert_eq!(cfg.loss, Loss::GiniImpurity);
        assert!(cfg.validate().is_ok());
        assert_eq!(TreeConfig::with_max_depth(None).max_depth, None);
    }

    #[test]
    fn test_from_signed() {
        let cfg = TreeConfig::from_signed(-1, 3, -1, 2, -1.0, Loss::Variance, 7).unwrap();
        assert_eq!(cfg.mtry, None);
        assert_eq!(cfg.max_depth, Some(3));
        assert_eq!(cfg.max_leaves, None);
        assert_eq!(cfg.min_obs_per_leaf, 2);
        assert_eq!(cfg.max_split_proportion, None);
        assert_eq!(cfg.seed, 7);

        assert!(matches!(
            TreeConfig::from_signed(-1, 3, -1, 0, -1.0, Loss::GiniImpurity, 7),
            Err(CanopyError::InvalidHyperparameter(..))
        ));
    }

    #[test]
    fn test_validate() {
        let bad = [
            TreeConfig {
                min_obs_per_leaf: 0,
                ..Default::default()
            },
            TreeConfig {
                max_leaves: Some(0),
                ..Default::default()
            },
            TreeConfig {
                mtry: Some(0),
                ..Default::default()
            },
            TreeConfig {
                max_split_proportion: Some(0.0),
                ..Default::default()
            },
            TreeConfig {
                max_split_proportion: Some(1.5),
                ..Default::default()
            },
        ];
        for cfg in bad.iter() {
            assert!(matches!(cfg.validate(), Err(CanopyError::InvalidHyperparameter(..))));
        }
        let ok = TreeConfig {
            max_split_proportion: Some(1.0),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_and_defaults() {
        let cfg = TreeConfig {
            max_depth: None,
            mtry: Some(2),
            loss: Loss::Entropy,
            ..Default::default()
        };
        let s = cfg.json_dump().unwrap();
        assert_eq!(TreeConfig::from_json(&s).unwrap(), cfg);

        let partial = TreeConfig::from_json(r#"{"max_depth": 3, "loss": "Variance"}"#).unwrap();
        assert_eq!(partial.max_depth, Some(3));
        assert_eq!(partial.loss, Loss::Variance);
        assert_eq!(partial.min_obs_per_leaf, 1);
        assert_eq!(partial.seed, 42);

        assert!(matches!(
            TreeConfig::from_json(r#"{"min_obs_per_leaf": 0}"#),
            Err(CanopyError::InvalidHyperparameter(..))
        ));
        assert!(matches!(TreeConfig::from_json("{"), Err(CanopyError::UnableToRead(_))));
    }
}
