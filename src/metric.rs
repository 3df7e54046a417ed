use crate::errors::CanopyError;
use crate::utils::items_to_strings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type MetricFn = fn(&[f64], &[f64]) -> Result<f64, CanopyError>;

/// Compare to metric values, determining if b is better.
/// If one of them is NaN favor the non NaN value.
/// If both are NaN, consider the first value to be better.
pub fn is_comparison_better(value: f64, comparison: f64, maximize: bool) -> bool {
    match (value.is_nan(), comparison.is_nan()) {
        (true, true) | (false, true) => false,
        (true, false) => true,
        (false, false) => {
            if maximize {
                value < comparison
            } else {
                value > comparison
            }
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Accuracy,
    RootMeanSquaredError,
    MeanAbsoluteError,
}

impl FromStr for Metric {
    type Err = CanopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accuracy" => Ok(Metric::Accuracy),
            "RootMeanSquaredError" => Ok(Metric::RootMeanSquaredError),
            "MeanAbsoluteError" => Ok(Metric::MeanAbsoluteError),
            _ => Err(CanopyError::ParseString(
                s.to_string(),
                "Metric".to_string(),
                items_to_strings(vec!["Accuracy", "RootMeanSquaredError", "MeanAbsoluteError"]),
            )),
        }
    }
}

pub fn metric_callables(metric_type: &Metric) -> (MetricFn, bool) {
    match metric_type {
        Metric::Accuracy => (accuracy, true),
        Metric::RootMeanSquaredError => (root_mean_squared_error, false),
        Metric::MeanAbsoluteError => (mean_absolute_error, false),
    }
}

fn check_lengths(y: &[f64], yhat: &[f64]) -> Result<(), CanopyError> {
    if y.len() != yhat.len() {
        return Err(CanopyError::LengthMismatch(y.len(), yhat.len()));
    }
    Ok(())
}

/// Share of positions where the prediction equals the true value exactly.
///
/// Two empty sequences score 0.
pub fn accuracy(y: &[f64], yhat: &[f64]) -> Result<f64, CanopyError> {
    check_lengths(y, yhat)?;
    if y.is_empty() {
        return Ok(0.0);
    }
    let correct = y.iter().zip(yhat).filter(|(y_, yhat_)| y_ == yhat_).count();
    Ok(correct as f64 / y.len() as f64)
}

pub fn root_mean_squared_error(y: &[f64], yhat: &[f64]) -> Result<f64, CanopyError> {
    check_lengths(y, yhat)?;
    if y.is_empty() {
        return Ok(0.0);
    }
    let res = y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).powi(2)).sum::<f64>();
    Ok((res / y.len() as f64).sqrt())
}

pub fn mean_absolute_error(y: &[f64], yhat: &[f64]) -> Result<f64, CanopyError> {
    check_lengths(y, yhat)?;
    if y.is_empty() {
        return Ok(0.0);
    }
    let res = y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).abs()).sum::<f64>();
    Ok(res / y.len() as f64)
}
