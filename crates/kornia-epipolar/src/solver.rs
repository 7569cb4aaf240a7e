use faer::MatRef;

use crate::error::EpipolarError;
use crate::linalg::{matmul33, transpose_mat33, Svd33};
use crate::normalize::TransformMatrix;
use crate::points::MIN_CORRESPONDENCES;

/// Solution of the homogeneous system `A * vec(F) = 0`.
#[derive(Debug, Clone)]
pub struct NullSpaceSolution {
    /// Right singular vector of the smallest singular value reshaped row-major to 3x3.
    pub matrix: [[f64; 3]; 3],
    /// Ratio `s[7] / s[0]` of the constraint matrix singular values.
    ///
    /// Values close to zero mean the null space has more than one dimension and
    /// the solution is not unique, e.g. for near-coplanar scene points.
    pub conditioning: f64,
}

/// Solve `A * vec(F) = 0` subject to `|vec(F)| = 1` in the least squares sense.
///
/// # Arguments
///
/// * `a` - The constraint matrix built by [`crate::constraint::constraint_matrix`].
///
/// # Errors
///
/// [`EpipolarError::InvalidDimensionality`] if `a` does not have 9 columns and
/// [`EpipolarError::InsufficientPoints`] if it has fewer than 8 rows.
pub fn solve_nullspace(a: MatRef<'_, f64>) -> Result<NullSpaceSolution, EpipolarError> {
    if a.ncols() != 9 {
        return Err(EpipolarError::InvalidDimensionality {
            shape: (a.nrows(), a.ncols()),
            expected: "constraint matrix must be Nx9",
        });
    }
    if a.nrows() < MIN_CORRESPONDENCES {
        return Err(EpipolarError::InsufficientPoints {
            required: MIN_CORRESPONDENCES,
            actual: a.nrows(),
        });
    }

    let svd = a.svd();
    let s = svd.s_diagonal();
    let conditioning = if s.read(0) > 0.0 {
        s.read(7) / s.read(0)
    } else {
        0.0
    };
    log::debug!(
        "constraint singular values: max {}, s[7] {}, conditioning {conditioning}",
        s.read(0),
        s.read(7)
    );

    // the last column of V spans the (approximate) null space
    let fvec = svd.v().col(8);
    let matrix = [
        [fvec[0], fvec[1], fvec[2]],
        [fvec[3], fvec[4], fvec[5]],
        [fvec[6], fvec[7], fvec[8]],
    ];

    Ok(NullSpaceSolution {
        matrix,
        conditioning,
    })
}

/// Ratio of the eighth to the first singular value of a constraint matrix.
pub fn constraint_conditioning(a: MatRef<'_, f64>) -> Result<f64, EpipolarError> {
    Ok(solve_nullspace(a)?.conditioning)
}

/// Project a 3x3 matrix onto the closest rank-2 matrix in Frobenius norm.
///
/// Only the smallest singular value is zeroed, even when the second one is
/// already close to zero.
pub fn enforce_rank2(f: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let svd = Svd33::new(f);
    log::debug!("rank-2 projection, singular values {:?}", svd.s);
    svd.compose(&[svd.s[0], svd.s[1], 0.0])
}

/// Map a fundamental matrix from normalized to original coordinates.
///
/// Computes `T2^T * F * T1`.
///
/// # Arguments
///
/// * `f` - The fundamental matrix estimated from normalized points.
/// * `t1` - The transform applied to the left points.
/// * `t2` - The transform applied to the right points.
pub fn denormalize(
    f: &[[f64; 3]; 3],
    t1: &TransformMatrix,
    t2: &TransformMatrix,
) -> [[f64; 3]; 3] {
    let mut tmp = [[0.0; 3]; 3];
    matmul33(&transpose_mat33(t2), f, &mut tmp);
    let mut out = [[0.0; 3]; 3];
    matmul33(&tmp, t1, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::constraint_matrix;
    use crate::points::HomogeneousPoints;
    use approx::assert_relative_eq;

    fn generic_points(n: usize) -> HomogeneousPoints {
        let pts = (0..n)
            .map(|i| {
                let i = i as f64;
                [(1.3 * i).sin() * 1.5, (2.1 * i).cos() * 1.2]
            })
            .collect::<Vec<_>>();
        HomogeneousPoints::from_euclidean(&pts)
    }

    // second view translated by t = (0.5, -0.2, 0.1), so F = [t]_x
    fn translated_views(n: usize) -> (HomogeneousPoints, HomogeneousPoints) {
        let t = [0.5, -0.2, 0.1];
        let (mut x1, mut x2) = (Vec::new(), Vec::new());
        for i in 0..n {
            let i = i as f64;
            let p = [
                (1.3 * i).sin() * 1.5,
                (2.1 * i).cos() * 1.2,
                5.0 + (0.7 * i + 1.0).sin() * 1.5,
            ];
            let q = [p[0] + t[0], p[1] + t[1], p[2] + t[2]];
            x1.push([p[0] / p[2], p[1] / p[2]]);
            x2.push([q[0] / q[2], q[1] / q[2]]);
        }
        (
            HomogeneousPoints::from_euclidean(&x1),
            HomogeneousPoints::from_euclidean(&x2),
        )
    }

    #[test]
    fn test_solve_nullspace_exact_system() -> Result<(), EpipolarError> {
        let (x1, x2) = translated_views(10);
        let a = constraint_matrix(&x1, &x2);
        let solution = solve_nullspace(a.as_ref())?;

        // unit norm null vector of [t]_x
        let t = [0.5, -0.2, 0.1];
        let expected = [[0.0, -t[2], t[1]], [t[2], 0.0, -t[0]], [-t[1], t[0], 0.0]];
        let norm = crate::linalg::frobenius_norm33(&expected);
        let sign = if solution.matrix[2][1] > 0.0 { 1.0 } else { -1.0 };
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(
                    solution.matrix[i][j],
                    sign * expected[i][j] / norm,
                    epsilon = 1e-9
                );
            }
        }
        assert!(solution.conditioning > 1e-8);
        Ok(())
    }

    #[test]
    fn test_conditioning_separates_degenerate_sets() -> Result<(), EpipolarError> {
        let x = generic_points(12);
        // identical views: several columns of A coincide and the null space grows
        let degenerate = constraint_conditioning(constraint_matrix(&x, &x).as_ref())?;
        assert!(degenerate < 1e-8, "conditioning {degenerate}");

        let (x1, x2) = translated_views(12);
        let generic = constraint_conditioning(constraint_matrix(&x1, &x2).as_ref())?;
        assert!(generic > 1e-8, "conditioning {generic}");
        Ok(())
    }

    #[test]
    fn test_solve_nullspace_rejects_bad_shapes() {
        let short = faer::Mat::<f64>::zeros(7, 9);
        assert_eq!(
            solve_nullspace(short.as_ref()).err(),
            Some(EpipolarError::InsufficientPoints {
                required: 8,
                actual: 7
            })
        );

        let wide = faer::Mat::<f64>::zeros(10, 8);
        assert!(matches!(
            constraint_conditioning(wide.as_ref()),
            Err(EpipolarError::InvalidDimensionality { .. })
        ));
    }

    #[test]
    fn test_enforce_rank2() {
        let f = [[1.0, 2.0, 3.0], [0.5, -1.0, 4.0], [2.0, 0.1, 1.0]];
        let f2 = enforce_rank2(&f);
        let svd = Svd33::new(&f2);
        assert!(svd.s[2] < 1e-12 * svd.s[0]);

        let orig = Svd33::new(&f);
        assert_relative_eq!(svd.s[0], orig.s[0], epsilon = 1e-10);
        assert_relative_eq!(svd.s[1], orig.s[1], epsilon = 1e-10);
    }

    #[test]
    fn test_enforce_rank2_keeps_rank2_input() {
        let f = [[0.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        let f2 = enforce_rank2(&f);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(f2[i][j], f[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_denormalize_identity() {
        let f = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let eye = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(denormalize(&f, &eye, &eye), f);
    }

    #[test]
    fn test_denormalize_scaling() {
        let f = [[0.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        let t1 = [[2.0, 0.0, -1.0], [0.0, 2.0, -3.0], [0.0, 0.0, 1.0]];
        let t2 = [[0.5, 0.0, 4.0], [0.0, 0.5, 1.0], [0.0, 0.0, 1.0]];
        let out = denormalize(&f, &t1, &t2);

        // x2^T (T2^T F T1) x1 == (T2 x2)^T F (T1 x1)
        let x1 = [3.0, -2.0, 1.0];
        let x2 = [1.5, 6.0, 1.0];
        let lhs: f64 = (0..3)
            .map(|i| (0..3).map(|j| x2[i] * out[i][j] * x1[j]).sum::<f64>())
            .sum();
        let y1 = crate::linalg::mat33_mul_vec3(&t1, &x1);
        let y2 = crate::linalg::mat33_mul_vec3(&t2, &x2);
        let rhs: f64 = (0..3)
            .map(|i| (0..3).map(|j| y2[i] * f[i][j] * y1[j]).sum::<f64>())
            .sum();
        assert_relative_eq!(lhs, rhs, epsilon = 1e-12);
    }
}
