//! Canopy
//!
//! Decision tree classifiers and regressors grown by exhaustive impurity
//! driven splitting, evaluated with k-fold cross-validation that runs either
//! sequentially or with one fold per worker thread.
//!
//! ```
//! use canopy::{CrossValidator, DataFrame, Execution, Task, TreeConfig};
//!
//! let rows = (0..40).map(|i| vec![i as f64, (i % 3) as f64, (i >= 20) as u8 as f64]).collect();
//! let df = DataFrame::from_rows(rows).unwrap();
//! let cv = CrossValidator::new(df, 4, 42, Task::Classification).unwrap();
//! let res = cv
//!     .validate_single_hyperparameter(&TreeConfig::default(), "toy", Execution::FoldParallel { num_threads: 2 })
//!     .unwrap();
//! assert_eq!(res.fold_scores.len(), 4);
//! ```

// Modules
pub mod config;
pub mod cv;
pub mod data;
pub mod errors;
pub mod loss;
pub mod metric;
pub mod node;
pub mod sampler;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use config::{Task, TreeConfig};
pub use cv::{CrossValidator, CvResult, Execution};
pub use data::DataFrame;
pub use errors::CanopyError;
pub use loss::Loss;
pub use tree::DecisionTree;
