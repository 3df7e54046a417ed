//! Cross-validation
//!
//! K-fold evaluation of decision trees, sequentially or one fold per worker.
pub mod folds;
pub mod result;
pub mod validator;

pub use folds::{create_k_folds, fold_sizes, Fold};
pub use result::CvResult;
pub use validator::{CrossValidator, Execution};
