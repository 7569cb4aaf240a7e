//! Comparison of an estimated disparity map against ground truth.
//!
//! This evaluator is independent from the fundamental matrix pipeline and only
//! shares the error type with it.

use serde::{Deserialize, Serialize};

use crate::error::EpipolarError;

/// Error statistics of a disparity map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisparityErrors {
    /// Mean absolute error.
    pub average: f64,
    /// Median absolute error.
    pub median: f64,
    /// Percentage of pixels with an absolute error above 0.5.
    pub bad_0_5: f64,
    /// Percentage of pixels with an absolute error above 4.
    pub bad_4: f64,
}

/// Compute error statistics of a disparity map.
///
/// # Arguments
///
/// * `disparity` - The estimated disparities, flattened.
/// * `ground_truth` - The ground truth values, flattened in the same order.
/// * `gt_scale` - Factor the ground truth is stored with; values are divided by it.
pub fn disparity_errors(
    disparity: &[f64],
    ground_truth: &[f64],
    gt_scale: f64,
) -> Result<DisparityErrors, EpipolarError> {
    if disparity.len() != ground_truth.len() {
        return Err(EpipolarError::DisparitySizeMismatch(
            disparity.len(),
            ground_truth.len(),
        ));
    }
    if disparity.is_empty() {
        return Err(EpipolarError::EmptyDisparity);
    }

    let mut errors = disparity
        .iter()
        .zip(ground_truth)
        .map(|(d, gt)| (gt / gt_scale - d).abs())
        .collect::<Vec<_>>();

    let n = errors.len() as f64;
    let average = errors.iter().sum::<f64>() / n;
    let bad_0_5 = errors.iter().filter(|e| **e > 0.5).count() as f64 / n * 100.0;
    let bad_4 = errors.iter().filter(|e| **e > 4.0).count() as f64 / n * 100.0;

    errors.sort_by(|a, b| a.total_cmp(b));
    let mid = errors.len() / 2;
    let median = if errors.len() % 2 == 0 {
        (errors[mid - 1] + errors[mid]) / 2.0
    } else {
        errors[mid]
    };

    Ok(DisparityErrors {
        average,
        median,
        bad_0_5,
        bad_4,
    })
}
