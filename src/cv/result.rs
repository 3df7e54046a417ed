use crate::config::TreeConfig;
use crate::errors::CanopyError;
use crate::utils::mean_std;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of cross-validating one set of hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvResult {
    /// Name of the dataset, for reporting.
    pub dataset: String,
    pub max_depth: Option<usize>,
    /// Hyperparameters that were evaluated, with the seed the caller passed.
    pub params: TreeConfig,
    /// Validation accuracy of every fold, in fold order.
    pub fold_scores: Vec<f64>,
    pub mean_accuracy: f64,
    /// Population standard deviation of `fold_scores`.
    pub std_accuracy: f64,
    /// Wall time spent training and scoring the folds.
    pub elapsed: Duration,
}

impl CvResult {
    pub fn new(dataset: &str, params: &TreeConfig, fold_scores: Vec<f64>, elapsed: Duration) -> Self {
        let (mean_accuracy, std_accuracy) = mean_std(&fold_scores);
        CvResult {
            dataset: dataset.to_string(),
            max_depth: params.max_depth,
            params: params.clone(),
            fold_scores,
            mean_accuracy,
            std_accuracy,
            elapsed,
        }
    }

    /// Dump a result as a json object.
    pub fn json_dump(&self) -> Result<String, CanopyError> {
        serde_json::to_string(self).map_err(|e| CanopyError::UnableToWrite(e.to_string()))
    }
}
