//! Splitter
//!
//! Exhaustive threshold search over the candidate features of a node.
use crate::data::DataFrame;
use crate::loss::{Impurity, LabelStats};

/// Best split found for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    pub feature: usize,
    pub threshold: f64,
    /// Impurity reduction, `impurity(parent) - weighted impurity(children)`.
    pub gain: f64,
    pub left_count: usize,
    pub right_count: usize,
}

/// Midpoint of two consecutive distinct values, kept in `[lo, hi)` so that
/// `lo` goes left and `hi` goes right under the `<=` test.
#[inline]
pub fn midpoint(lo: f64, hi: f64) -> f64 {
    let t = lo / 2.0 + hi / 2.0;
    if t >= lo && t < hi {
        t
    } else {
        lo
    }
}

/// Search every threshold of every candidate feature.
///
/// Features are visited in the given order and thresholds in ascending
/// order, a candidate replaces the current best only when its gain is
/// strictly larger, so ties resolve to the first feature then the lowest
/// threshold when `features` is sorted.
///
/// * `data` - The training frame.
/// * `index` - Rows reaching the node.
/// * `features` - Candidate features.
/// * `parent_impurity` - Impurity of the labels of `index`.
pub fn best_split<I: Impurity>(
    data: &DataFrame,
    index: &[usize],
    features: &[usize],
    parent_impurity: f64,
) -> Option<SplitInfo> {
    let n = index.len();
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let mut best: Option<SplitInfo> = None;
    let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);
    let mut right_impurity: Vec<f64> = vec![0.0; n];

    for feature in features {
        pairs.clear();
        pairs.extend(index.iter().map(|i| (data.get(*i, *feature), data.label(*i))));
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        if pairs[0].0 == pairs[n - 1].0 {
            continue;
        }

        // right_impurity[i] holds the impurity of pairs[i + 1..].
        let mut right = I::Stats::default();
        for i in (0..n - 1).rev() {
            right.add(pairs[i + 1].1);
            right_impurity[i] = right.impurity();
        }

        let mut left = I::Stats::default();
        for i in 0..n - 1 {
            left.add(pairs[i].1);
            let (lo, hi) = (pairs[i].0, pairs[i + 1].0);
            if lo == hi {
                continue;
            }
            let n_left = left.count();
            let n_right = n - n_left;
            let weighted = (n_left as f64 * left.impurity() + n_right as f64 * right_impurity[i]) / n_f;
            let gain = parent_impurity - weighted;
            let better = match &best {
                Some(b) => gain > b.gain,
                None => !gain.is_nan(),
            };
            if better {
                best = Some(SplitInfo {
                    feature: *feature,
                    threshold: midpoint(lo, hi),
                    gain,
                    left_count: n_left,
                    right_count: n_right,
                });
            }
        }
    }
    best
}

/// Whether at least one feature takes more than one value over `index`.
pub fn has_varying_feature(data: &DataFrame, index: &[usize]) -> bool {
    let first = match index.first() {
        Some(i) => *i,
        None => return false,
    };
    (0..data.n_features()).any(|j| {
        let v = data.get(first, j);
        index.iter().any(|i| data.get(*i, j) != v)
    })
}

/// Split `index` into the rows going left and right of `threshold`.
pub fn pivot_on_split(data: &DataFrame, index: &[usize], feature: usize, threshold: f64) -> (Vec<usize>, Vec<usize>) {
    index.iter().partition(|i| data.get(**i, feature) <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::{GiniImpurity, Variance};

    fn frame(rows: Vec<Vec<f64>>) -> DataFrame {
        DataFrame::from_rows(rows).unwrap()
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint(1.0, 2.0), 1.5);
        assert_eq!(midpoint(-3.0, 1.0), -1.0);
        let lo = 1.0_f64;
        let hi = f64::from_bits(lo.to_bits() + 1);
        let t = midpoint(lo, hi);
        assert!(lo <= t && t < hi);
    }

    #[test]
    fn test_best_split_separates_classes() {
        // Feature 0 is noise, feature 1 separates the classes at 2.5.
        let df = frame(vec![
            vec![5.0, 1.0, 0.0],
            vec![1.0, 2.0, 0.0],
            vec![4.0, 3.0, 1.0],
            vec![2.0, 4.0, 1.0],
        ]);
        let index: Vec<usize> = (0..4).collect();
        let parent = GiniImpurity::impurity(&df.labels());
        let s = best_split::<GiniImpurity>(&df, &index, &[0, 1], parent).unwrap();
        assert_eq!(s.feature, 1);
        assert_eq!(s.threshold, 2.5);
        assert_eq!(s.gain, 0.5);
        assert_eq!((s.left_count, s.right_count), (2, 2));
    }

    #[test]
    fn test_tie_break_lowest_feature_then_threshold() {
        // Both features separate the classes equally well.
        let df = frame(vec![
            vec![1.0, 1.0, 0.0],
            vec![2.0, 2.0, 1.0],
            vec![3.0, 3.0, 1.0],
        ]);
        let index: Vec<usize> = (0..3).collect();
        let parent = GiniImpurity::impurity(&df.labels());
        let s = best_split::<GiniImpurity>(&df, &index, &[0, 1], parent).unwrap();
        assert_eq!(s.feature, 0);
        assert_eq!(s.threshold, 1.5);

        // Labels alternate in a way where two thresholds tie.
        let df = frame(vec![vec![1.0, 0.0], vec![2.0, 1.0], vec![3.0, 0.0]]);
        let parent = GiniImpurity::impurity(&df.labels());
        let s = best_split::<GiniImpurity>(&df, &index, &[0], parent).unwrap();
        assert_eq!(s.threshold, 1.5);
    }

    #[test]
    fn test_constant_features_yield_no_split() {
        let df = frame(vec![vec![1.0, 0.0], vec![1.0, 1.0]]);
        assert!(best_split::<GiniImpurity>(&df, &[0, 1], &[0], 0.5).is_none());
        assert!(!has_varying_feature(&df, &[0, 1]));
        assert!(!has_varying_feature(&df, &[]));
        let df = frame(vec![vec![1.0, 0.0], vec![2.0, 1.0]]);
        assert!(has_varying_feature(&df, &[0, 1]));
    }

    #[test]
    fn test_variance_split_and_pivot() {
        let df = frame(vec![
            vec![1.0, 10.0],
            vec![2.0, 11.0],
            vec![3.0, 30.0],
            vec![4.0, 31.0],
        ]);
        let index: Vec<usize> = (0..4).collect();
        let parent = Variance::impurity(&df.labels());
        let s = best_split::<Variance>(&df, &index, &[0], parent).unwrap();
        assert_eq!(s.threshold, 2.5);
        assert!(s.gain > 0.0);
        let (l, r) = pivot_on_split(&df, &index, 0, s.threshold);
        assert_eq!(l, vec![0, 1]);
        assert_eq!(r, vec![2, 3]);
    }
}
