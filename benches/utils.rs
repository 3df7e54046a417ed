#![allow(dead_code)]
use canopy::DataFrame;
use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Rows of uniform features, labelled by the sign of a random
// linear model plus uniform noise.
pub(crate) fn create_data(n_samples: usize, n_features: usize) -> DataFrame {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    // feature distributions
    let feature_distribution = Uniform::new(0.0, 1.0);
    let noise_distribution = Uniform::new(-0.5, 0.5);
    let weight_distribution = Uniform::new(-1.0, 1.0);

    // generate random weights for the linear model
    let weights: Vec<f64> = (0..n_features).map(|_| rng.sample(weight_distribution)).collect();
    let offset = weights.iter().sum::<f64>() / 2.0;

    let mut data = Vec::with_capacity(n_samples * (n_features + 1));
    for _ in 0..n_samples {
        let x_sample: Vec<f64> = (0..n_features).map(|_| rng.sample(feature_distribution)).collect();

        // linear model + uniform noise
        let linear: f64 = x_sample.iter().zip(weights.iter()).map(|(x, w)| x * w).sum();
        let y = if linear + rng.sample(noise_distribution) > offset { 1.0 } else { 0.0 };
        data.extend(x_sample);
        data.push(y);
    }

    DataFrame::new(data, n_samples, n_features + 1).unwrap()
}
