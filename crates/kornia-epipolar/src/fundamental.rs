use serde::{Deserialize, Serialize};

use crate::constraint::constraint_matrix;
use crate::error::EpipolarError;
use crate::linalg::{dot_product3, frobenius_norm33, mat33_mul_vec3, transpose_mat33, Svd33};
use crate::normalize::normalize_points;
use crate::points::{Correspondences, PointInput, PointLayout};
use crate::solver::{denormalize, enforce_rank2, solve_nullspace};

/// Parameters of the 8-point estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalParams {
    /// Apply isotropic normalization to both point sets before solving.
    pub normalize: bool,
    /// Warn when `s[7] / s[0]` of the constraint matrix falls below this ratio.
    pub degeneracy_ratio: f64,
}

impl Default for FundamentalParams {
    fn default() -> Self {
        Self {
            normalize: true,
            degeneracy_ratio: 1e-8,
        }
    }
}

impl FundamentalParams {
    /// Parameters for the plain, unnormalized 8-point algorithm.
    pub fn unnormalized() -> Self {
        Self {
            normalize: false,
            ..Default::default()
        }
    }
}

/// A 3x3 rank-2 matrix such that `x2^T * F * x1 = 0` for corresponding points.
///
/// The matrix is defined up to a non-zero scale and stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMatrix([[f64; 3]; 3]);

impl FundamentalMatrix {
    /// Wrap a row-major 3x3 matrix.
    pub fn new(m: [[f64; 3]; 3]) -> Self {
        Self(m)
    }

    /// The matrix entries in row-major order.
    pub fn as_array(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    /// Epipolar line `F * x1` in the right image for a left image point.
    pub fn epipolar_line_right(&self, x1: &[f64; 3]) -> [f64; 3] {
        mat33_mul_vec3(&self.0, x1)
    }

    /// Epipolar line `F^T * x2` in the left image for a right image point.
    pub fn epipolar_line_left(&self, x2: &[f64; 3]) -> [f64; 3] {
        mat33_mul_vec3(&transpose_mat33(&self.0), x2)
    }

    /// Residual `x2^T * F * x1` of the epipolar constraint.
    pub fn residual(&self, x1: &[f64; 3], x2: &[f64; 3]) -> f64 {
        dot_product3(x2, &self.epipolar_line_right(x1))
    }

    /// Singular values in non-increasing order.
    pub fn singular_values(&self) -> [f64; 3] {
        Svd33::new(&self.0).s
    }

    /// Scale the matrix to unit Frobenius norm with a positive largest-magnitude entry.
    pub fn normalized(&self) -> Self {
        let norm = frobenius_norm33(&self.0);
        if norm == 0.0 {
            return *self;
        }
        let pivot = self
            .0
            .iter()
            .flatten()
            .copied()
            .fold(0.0f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
        let s = pivot.signum() / norm;
        let mut m = self.0;
        m.iter_mut().flatten().for_each(|v| *v *= s);
        Self(m)
    }

    /// Frobenius distance between two matrices after scaling both to unit norm.
    ///
    /// The sign ambiguity is resolved by taking the smaller of `|a - b|` and
    /// `|a + b|`, so estimates of the same geometry are close to zero.
    pub fn distance_up_to_scale(&self, other: &FundamentalMatrix) -> f64 {
        let (na, nb) = (frobenius_norm33(&self.0), frobenius_norm33(&other.0));
        if na == 0.0 || nb == 0.0 {
            return f64::INFINITY;
        }
        let (mut minus, mut plus) = (0.0, 0.0);
        for (a, b) in self.0.iter().flatten().zip(other.0.iter().flatten()) {
            minus += (a / na - b / nb).powi(2);
            plus += (a / na + b / nb).powi(2);
        }
        minus.min(plus).sqrt()
    }
}

impl From<FundamentalMatrix> for [[f64; 3]; 3] {
    fn from(f: FundamentalMatrix) -> Self {
        f.0
    }
}

/// Estimate the fundamental matrix from borrowed point arrays.
///
/// # Arguments
///
/// * `input` - The correspondences as two arrays or one combined array.
/// * `layout` - The coordinate layout of the arrays.
/// * `params` - The estimator parameters.
///
/// # Returns
///
/// The rank-2 fundamental matrix in the coordinates of the input points.
pub fn estimate_fundamental_matrix(
    input: PointInput<'_>,
    layout: PointLayout,
    params: &FundamentalParams,
) -> Result<FundamentalMatrix, EpipolarError> {
    let correspondences = Correspondences::from_input(input, layout)?;
    fundamental_8point(&correspondences, params)
}

/// Estimate the fundamental matrix from lists of pixel coordinates.
///
/// - `x1`: points in image 1 (length >= 8)
/// - `x2`: corresponding points in image 2 (same length)
pub fn fundamental_from_points(
    x1: &[[f64; 2]],
    x2: &[[f64; 2]],
    params: &FundamentalParams,
) -> Result<FundamentalMatrix, EpipolarError> {
    let correspondences = Correspondences::from_points(x1, x2)?;
    fundamental_8point(&correspondences, params)
}

/// Estimate the fundamental matrix with the (normalized) 8-point algorithm.
pub fn fundamental_8point(
    correspondences: &Correspondences,
    params: &FundamentalParams,
) -> Result<FundamentalMatrix, EpipolarError> {
    let (x1, x2) = (correspondences.left(), correspondences.right());

    let normalized = if params.normalize {
        let (x1n, t1) = normalize_points(x1)?;
        let (x2n, t2) = normalize_points(x2)?;
        Some((x1n, t1, x2n, t2))
    } else {
        None
    };

    let a = match &normalized {
        Some((x1n, _, x2n, _)) => constraint_matrix(x1n, x2n),
        None => constraint_matrix(x1, x2),
    };

    let solution = solve_nullspace(a.as_ref())?;
    if solution.conditioning < params.degeneracy_ratio {
        log::warn!(
            "constraint matrix is close to rank deficient (s[7]/s[0] = {:e}), \
             the correspondences may be degenerate",
            solution.conditioning
        );
    }

    let f = enforce_rank2(&solution.matrix);

    let f = match &normalized {
        Some((_, t1, _, t2)) => denormalize(&f, t1, t2),
        None => f,
    };

    Ok(FundamentalMatrix(f))
}
