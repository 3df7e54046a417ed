use crate::errors::CanopyError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

// Validation
pub fn validate_positive_usize_parameter(value: usize, parameter: &str) -> Result<(), CanopyError> {
    if value == 0 {
        Err(CanopyError::InvalidHyperparameter(
            parameter.to_string(),
            "integer value of at least 1".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), CanopyError> {
    if !value.is_finite() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(CanopyError::InvalidHyperparameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Mean and population standard deviation, summed in slice order.
///
/// An empty slice yields `(0.0, 0.0)`.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mut sum = 0.0;
    for v in values {
        sum += *v;
    }
    let mean = sum / n;
    let mut variance_sum = 0.0;
    for v in values {
        let diff = *v - mean;
        variance_sum += diff * diff;
    }
    (mean, (variance_sum / n).sqrt())
}

/// Mix a root seed with a node number into an independent stream seed.
///
/// Uses the splitmix64 finalizer so neighbouring node numbers map to
/// unrelated seeds.
#[inline]
pub fn mix_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed ^ stream.wrapping_add(0x9E37_79B9_7F4A_7C15).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}
