use serde::{Deserialize, Serialize};

use crate::fundamental::FundamentalMatrix;
use crate::linalg::dot_product3;
use crate::points::{dehomogenize, Correspondences};

/// Epipolar lines of every correspondence in both images.
#[derive(Debug, Clone)]
pub struct EpipolarLines {
    /// Lines `F^T * x2` in the left image, one per correspondence.
    pub left: Vec<[f64; 3]>,
    /// Lines `F * x1` in the right image, one per correspondence.
    pub right: Vec<[f64; 3]>,
}

/// Compute the epipolar lines of all correspondences.
///
/// The right image line of a left point is `F * x1` and the left image line of
/// a right point is `F^T * x2`.
pub fn epipolar_lines(f: &FundamentalMatrix, correspondences: &Correspondences) -> EpipolarLines {
    let (mut left, mut right) = (
        Vec::with_capacity(correspondences.len()),
        Vec::with_capacity(correspondences.len()),
    );
    for (x1, x2) in correspondences.iter() {
        right.push(f.epipolar_line_right(&dehomogenize(x1)));
        left.push(f.epipolar_line_left(&dehomogenize(x2)));
    }
    EpipolarLines { left, right }
}

/// Mean absolute residual `|x2^T * F * x1|` over all correspondences.
///
/// The value depends on the scale of `F` and on the pixel units.
pub fn algebraic_distance(f: &FundamentalMatrix, correspondences: &Correspondences) -> f64 {
    if correspondences.is_empty() {
        return 0.0;
    }
    let sum = correspondences
        .iter()
        .map(|(x1, x2)| {
            let line_right = f.epipolar_line_right(&dehomogenize(x1));
            dot_product3(&dehomogenize(x2), &line_right).abs()
        })
        .sum::<f64>();
    sum / correspondences.len() as f64
}

/// Squared distance of a point to the line `a*x + b*y + c = 0`.
///
/// Returns infinity when the line has no finite normal.
pub fn squared_point_line_distance(point: &[f64; 3], line: &[f64; 3]) -> f64 {
    let norm_sq = line[0] * line[0] + line[1] * line[1];
    if norm_sq <= f64::EPSILON * f64::EPSILON {
        return f64::INFINITY;
    }
    dot_product3(point, line).powi(2) / norm_sq
}

/// Mean symmetric epipolar distance over all correspondences.
///
/// For each correspondence the squared distance of the left point to its left
/// epipolar line and of the right point to its right epipolar line are summed;
/// the sums are averaged over the number of correspondences.
pub fn symmetric_epipolar_distance(
    f: &FundamentalMatrix,
    correspondences: &Correspondences,
) -> f64 {
    if correspondences.is_empty() {
        return 0.0;
    }
    let sum = correspondences
        .iter()
        .map(|(x1, x2)| {
            let (x1, x2) = (dehomogenize(x1), dehomogenize(x2));
            let line_left = f.epipolar_line_left(&x2);
            let line_right = f.epipolar_line_right(&x1);
            squared_point_line_distance(&x1, &line_left)
                + squared_point_line_distance(&x2, &line_right)
        })
        .sum::<f64>();
    sum / correspondences.len() as f64
}

/// Both error metrics of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    /// Mean symmetric epipolar distance in squared pixels.
    pub symmetric_epipolar: f64,
    /// Mean algebraic distance.
    pub algebraic: f64,
}

/// Evaluate a fundamental matrix against a set of correspondences.
pub fn evaluate(f: &FundamentalMatrix, correspondences: &Correspondences) -> DistanceReport {
    let report = DistanceReport {
        symmetric_epipolar: symmetric_epipolar_distance(f, correspondences),
        algebraic: algebraic_distance(f, correspondences),
    };
    log::debug!("{report:?}");
    report
}
