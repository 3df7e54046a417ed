//! Sampler
//!
//! Feature subsampling at every node, decorrelating the split search.
use crate::utils::mix_seed;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Chooses the features a node is allowed to split on.
pub enum FeatureSampler {
    /// Every feature is a candidate.
    All,
    /// Draw this many features without replacement at every node.
    Random(usize),
}

impl FeatureSampler {
    pub fn new(mtry: Option<usize>) -> Self {
        match mtry {
            Some(m) => FeatureSampler::Random(m),
            None => FeatureSampler::All,
        }
    }

    /// Candidate features for a node, in ascending order.
    ///
    /// The draw depends only on `(seed, node)`, never on the order in
    /// which nodes are visited or on the thread doing the work.
    pub fn sample(&self, seed: u64, node: usize, n_features: usize) -> Vec<usize> {
        match self {
            FeatureSampler::All => (0..n_features).collect(),
            FeatureSampler::Random(m) if *m >= n_features => (0..n_features).collect(),
            FeatureSampler::Random(m) => {
                let mut rng = StdRng::seed_from_u64(mix_seed(seed, node as u64));
                let mut chosen = index::sample(&mut rng, n_features, *m).into_vec();
                chosen.sort_unstable();
                chosen
            }
        }
    }
}
