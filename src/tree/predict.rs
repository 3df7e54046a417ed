use crate::data::DataFrame;
use crate::errors::CanopyError;
use crate::tree::tree::DecisionTree;
use rayon::prelude::*;

impl DecisionTree {
    /// Predict a single row of features.
    ///
    /// # Panics
    ///
    /// Panics when `features` holds fewer values than the tree has features.
    /// `predict` checks the width and returns `InvalidShape` instead.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        debug_assert!(features.len() >= self.n_features());
        let mut node = &self.nodes[0];
        while let Some(child) = node.get_child_idx(features) {
            node = &self.nodes[child];
        }
        node.leaf_value().unwrap_or(f64::NAN)
    }

    fn check_width(&self, data: &DataFrame) -> Result<(), CanopyError> {
        if data.n_features() < self.n_features() {
            return Err(CanopyError::InvalidShape(format!(
                "the tree was trained on {} features, the frame has {}",
                self.n_features(),
                data.n_features()
            )));
        }
        Ok(())
    }

    /// Predict every row of a frame, in row order.
    pub fn predict(&self, data: &DataFrame) -> Result<Vec<f64>, CanopyError> {
        self.check_width(data)?;
        Ok((0..data.rows()).map(|i| self.predict_row(data.features(i))).collect())
    }

    /// Same as `predict`, spreading the rows over the current rayon pool.
    pub fn par_predict(&self, data: &DataFrame) -> Result<Vec<f64>, CanopyError> {
        self.check_width(data)?;
        Ok((0..data.rows())
            .into_par_iter()
            .map(|i| self.predict_row(data.features(i)))
            .collect())
    }
}
