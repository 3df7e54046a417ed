//! Loss
//!
//! Impurity measures used by the splitter to score candidate splits.
use crate::errors::CanopyError;
use crate::utils::items_to_strings;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type ImpurityFn = fn(&[f64]) -> f64;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loss {
    #[default]
    GiniImpurity,
    Entropy,
    Variance,
}

impl FromStr for Loss {
    type Err = CanopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gini_impurity" | "GiniImpurity" => Ok(Loss::GiniImpurity),
            "entropy" | "Entropy" => Ok(Loss::Entropy),
            "variance" | "Variance" => Ok(Loss::Variance),
            _ => Err(CanopyError::ParseString(
                s.to_string(),
                "Loss".to_string(),
                items_to_strings(vec!["gini_impurity", "entropy", "variance"]),
            )),
        }
    }
}

pub fn impurity_callable(loss: &Loss) -> ImpurityFn {
    match loss {
        Loss::GiniImpurity => GiniImpurity::impurity,
        Loss::Entropy => Entropy::impurity,
        Loss::Variance => Variance::impurity,
    }
}

/// Running summary of a set of labels, updated one label at a time.
pub trait LabelStats: Default + Clone {
    fn add(&mut self, label: f64);
    fn count(&self) -> usize;
    /// Impurity of the labels added so far, 0 for an empty set.
    fn impurity(&self) -> f64;
}

/// A heterogeneity measure over labels.
///
/// Implementations must return 0 for a pure set of labels. The splitter
/// trusts the measure and does not check it.
pub trait Impurity {
    type Stats: LabelStats;

    fn impurity(labels: &[f64]) -> f64 {
        let mut stats = Self::Stats::default();
        for l in labels {
            stats.add(*l);
        }
        stats.impurity()
    }
}

/// Key under which a class label is counted, `-0.0` and `0.0` share a class.
#[inline]
pub(crate) fn class_key(label: f64) -> u64 {
    if label == 0.0 {
        0.0_f64.to_bits()
    } else {
        label.to_bits()
    }
}

#[derive(Default, Clone, Debug)]
pub struct ClassCounts {
    counts: HashMap<u64, usize>,
    n: usize,
    sum_sq: usize,
}

impl ClassCounts {
    /// Counts sorted by ascending label.
    pub fn sorted(&self) -> Vec<(f64, usize)> {
        let mut v: Vec<(f64, usize)> = self.counts.iter().map(|(k, c)| (f64::from_bits(*k), *c)).collect();
        v.sort_by(|a, b| a.0.total_cmp(&b.0));
        v
    }
}

impl LabelStats for ClassCounts {
    #[inline]
    fn add(&mut self, label: f64) {
        let c = self.counts.entry(class_key(label)).or_insert(0);
        // (c + 1)^2 - c^2
        self.sum_sq += 2 * *c + 1;
        *c += 1;
        self.n += 1;
    }

    fn count(&self) -> usize {
        self.n
    }

    #[inline]
    fn impurity(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let n = self.n as f64;
        1.0 - self.sum_sq as f64 / (n * n)
    }
}

#[derive(Default, Clone, Debug)]
pub struct EntropyCounts(ClassCounts);

impl LabelStats for EntropyCounts {
    #[inline]
    fn add(&mut self, label: f64) {
        self.0.add(label);
    }

    fn count(&self) -> usize {
        self.0.n
    }

    fn impurity(&self) -> f64 {
        if self.0.n <= 1 || self.0.counts.len() == 1 {
            return 0.0;
        }
        let n = self.0.n as f64;
        -self
            .0
            .sorted()
            .iter()
            .map(|(_, c)| {
                let p = *c as f64 / n;
                p * p.log2()
            })
            .sum::<f64>()
    }
}

/// Welford accumulator of the population variance.
#[derive(Default, Clone, Debug)]
pub struct Moments {
    n: usize,
    mean: f64,
    m2: f64,
}

impl Moments {
    pub fn mean(&self) -> f64 {
        self.mean
    }
}

impl LabelStats for Moments {
    #[inline]
    fn add(&mut self, label: f64) {
        self.n += 1;
        let delta = label - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (label - self.mean);
    }

    fn count(&self) -> usize {
        self.n
    }

    #[inline]
    fn impurity(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        (self.m2 / self.n as f64).max(0.0)
    }
}

/// Gini impurity, `1 - sum(p_c^2)` over the class proportions.
pub struct GiniImpurity {}
impl Impurity for GiniImpurity {
    type Stats = ClassCounts;
}

/// Shannon entropy in bits over the class proportions.
pub struct Entropy {}
impl Impurity for Entropy {
    type Stats = EntropyCounts;
}

/// Population variance of the labels.
pub struct Variance {}
impl Impurity for Variance {
    type Stats = Moments;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::precision_round;

    #[test]
    fn test_gini_impurity() {
        assert_eq!(GiniImpurity::impurity(&[1., 1., 1.]), 0.0);
        assert_eq!(GiniImpurity::impurity(&[]), 0.0);
        assert_eq!(GiniImpurity::impurity(&[0., 1., 0., 1.]), 0.5);
        assert_eq!(precision_round(GiniImpurity::impurity(&[0., 1., 2.]), 6), 0.666667);
        assert_eq!(GiniImpurity::impurity(&[-0., 0.]), 0.0);
    }

    #[test]
    fn test_entropy() {
        assert_eq!(Entropy::impurity(&[2., 2.]), 0.0);
        assert_eq!(Entropy::impurity(&[0., 1.]), 1.0);
        assert_eq!(Entropy::impurity(&[0., 1., 2., 3.]), 2.0);
    }

    #[test]
    fn test_variance() {
        assert_eq!(Variance::impurity(&[0.1, 0.1, 0.1]), 0.0);
        assert_eq!(Variance::impurity(&[]), 0.0);
        assert_eq!(Variance::impurity(&[1., 3.]), 1.0);
        assert_eq!(precision_round(Variance::impurity(&[1., 2., 3., 4.]), 6), 1.25);
    }

    #[test]
    fn test_loss_from_str() {
        assert_eq!(Loss::from_str("gini_impurity").unwrap(), Loss::GiniImpurity);
        assert_eq!(Loss::from_str("variance").unwrap(), Loss::Variance);
        assert_eq!(Loss::from_str("Entropy").unwrap(), Loss::Entropy);
        assert!(matches!(Loss::from_str("mse"), Err(CanopyError::ParseString(..))));
    }

    #[test]
    fn test_impurity_callable() {
        let f = impurity_callable(&Loss::Variance);
        assert_eq!(f(&[1., 3.]), 1.0);
        let f = impurity_callable(&Loss::GiniImpurity);
        assert_eq!(f(&[0., 1.]), 0.5);
    }
}
