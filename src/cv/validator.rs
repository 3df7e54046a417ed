use crate::config::{Task, TreeConfig};
use crate::cv::folds::{create_k_folds, Fold};
use crate::cv::result::CvResult;
use crate::data::DataFrame;
use crate::errors::CanopyError;
use crate::metric::{accuracy, is_comparison_better};
use crate::tree::DecisionTree;
use crate::utils::validate_positive_usize_parameter;
use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How the folds of one cross-validation run are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Execution {
    /// One fold after the other on the calling thread.
    Sequential,
    /// Folds spread over a pool of exactly `num_threads` workers.
    FoldParallel { num_threads: usize },
}

/// K-fold cross-validation of decision trees over a fixed dataset.
///
/// Both execution modes give identical results: every fold writes its score
/// to its own slot and the statistics are computed in fold order once all
/// folds are done.
pub struct CrossValidator {
    data: DataFrame,
    k_folds: usize,
    seed: u64,
    task: Task,
}

impl CrossValidator {
    /// Create a cross-validator.
    ///
    /// * `data` - The full dataset, the last column is the label.
    /// * `k_folds` - Number of folds, more than 1 and at most the number of rows.
    /// * `seed` - Seed of the shuffle, fold `i` also trains with seed `seed + i`.
    /// * `task` - Classification or regression trees.
    pub fn new(data: DataFrame, k_folds: usize, seed: u64, task: Task) -> Result<Self, CanopyError> {
        if k_folds <= 1 || data.rows() < k_folds {
            return Err(CanopyError::InvalidFoldCount(k_folds, data.rows()));
        }
        Ok(CrossValidator {
            data,
            k_folds,
            seed,
            task,
        })
    }

    pub fn k_folds(&self) -> usize {
        self.k_folds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// The k train/validation pairs, identical on every call.
    pub fn create_folds(&self) -> Vec<Fold> {
        create_k_folds(&self.data, self.k_folds, self.seed)
    }

    fn build_pool(execution: Execution) -> Result<Option<ThreadPool>, CanopyError> {
        match execution {
            Execution::Sequential => Ok(None),
            Execution::FoldParallel { num_threads } => {
                validate_positive_usize_parameter(num_threads, "num_threads")?;
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| CanopyError::ThreadPool(e.to_string()))?;
                Ok(Some(pool))
            }
        }
    }

    fn score_fold(&self, params: &TreeConfig, fold: &Fold) -> Result<f64, CanopyError> {
        let cfg = TreeConfig {
            seed: self.seed.wrapping_add(fold.index as u64),
            ..params.clone()
        };
        let tree = DecisionTree::fit(&fold.train, &cfg, self.task)?;
        let predictions = tree.predict(&fold.validation)?;
        let score = accuracy(&fold.validation.labels(), &predictions)?;
        debug!(
            "Fold {}: trained on {} rows, tree size {}, accuracy {:.4}.",
            fold.index,
            fold.train.rows(),
            tree.size(),
            score
        );
        Ok(score)
    }

    fn evaluate(
        &self,
        params: &TreeConfig,
        dataset_name: &str,
        folds: &[Fold],
        pool: Option<&ThreadPool>,
    ) -> Result<CvResult, CanopyError> {
        let start = Instant::now();
        let mut fold_scores = vec![0.0; folds.len()];
        match pool {
            None => {
                for (slot, fold) in fold_scores.iter_mut().zip(folds) {
                    *slot = self.score_fold(params, fold)?;
                }
            }
            Some(pool) => {
                // Returns once every fold is scored.
                pool.install(|| {
                    fold_scores
                        .par_iter_mut()
                        .zip(folds.par_iter())
                        .try_for_each(|(slot, fold)| -> Result<(), CanopyError> {
                            *slot = self.score_fold(params, fold)?;
                            Ok(())
                        })
                })?;
            }
        }
        let result = CvResult::new(dataset_name, params, fold_scores, start.elapsed());
        info!(
            "Cross-validated {} with max_depth {:?}: mean accuracy {:.4}, std {:.4}, {} ms.",
            if dataset_name.is_empty() { "dataset" } else { dataset_name },
            result.max_depth,
            result.mean_accuracy,
            result.std_accuracy,
            result.elapsed.as_millis()
        );
        Ok(result)
    }

    /// Cross-validate one set of hyperparameters.
    ///
    /// * `params` - Hyperparameters, validated before any fold is trained.
    /// * `dataset_name` - Name copied into the result.
    /// * `execution` - Sequential or fold-parallel scheduling.
    pub fn validate_single_hyperparameter(
        &self,
        params: &TreeConfig,
        dataset_name: &str,
        execution: Execution,
    ) -> Result<CvResult, CanopyError> {
        params.validate()?;
        let pool = Self::build_pool(execution)?;
        let folds = self.create_folds();
        self.evaluate(params, dataset_name, &folds, pool.as_ref())
    }

    /// Cross-validate one set of hyperparameters, one fold per worker.
    pub fn validate_single_hyperparameter_parallel(
        &self,
        params: &TreeConfig,
        dataset_name: &str,
        num_threads: usize,
    ) -> Result<CvResult, CanopyError> {
        self.validate_single_hyperparameter(params, dataset_name, Execution::FoldParallel { num_threads })
    }

    /// Cross-validate the default hyperparameters with the given depth limit.
    pub fn validate_depth(
        &self,
        max_depth: Option<usize>,
        dataset_name: &str,
        execution: Execution,
    ) -> Result<CvResult, CanopyError> {
        self.validate_single_hyperparameter(&TreeConfig::with_max_depth(max_depth), dataset_name, execution)
    }

    /// Cross-validate every entry of `param_grid`, results are in input order.
    pub fn grid_search_cv(
        &self,
        param_grid: &[TreeConfig],
        dataset_name: &str,
        execution: Execution,
    ) -> Result<Vec<CvResult>, CanopyError> {
        for params in param_grid {
            params.validate()?;
        }
        let pool = Self::build_pool(execution)?;
        let folds = self.create_folds();
        param_grid
            .iter()
            .map(|params| self.evaluate(params, dataset_name, &folds, pool.as_ref()))
            .collect()
    }

    /// Cross-validate the default hyperparameters for every depth limit.
    pub fn validate_depths(
        &self,
        depths: &[Option<usize>],
        dataset_name: &str,
        execution: Execution,
    ) -> Result<Vec<CvResult>, CanopyError> {
        let param_grid: Vec<TreeConfig> = depths.iter().map(|d| TreeConfig::with_max_depth(*d)).collect();
        self.grid_search_cv(&param_grid, dataset_name, execution)
    }

    /// Hyperparameters with the highest mean accuracy, the first one on ties.
    ///
    /// Returns `None` when `cv_results` is empty.
    pub fn get_best_params(&self, cv_results: &[CvResult]) -> Option<TreeConfig> {
        let mut best = cv_results.first()?;
        for result in &cv_results[1..] {
            if is_comparison_better(best.mean_accuracy, result.mean_accuracy, true) {
                best = result;
            }
        }
        info!(
            "Best hyperparameters: max_depth {:?}, mean accuracy {:.3}.",
            best.max_depth, best.mean_accuracy
        );
        Some(best.params.clone())
    }
}
