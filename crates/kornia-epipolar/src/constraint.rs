use faer::Mat;

use crate::points::{dehomogenize, HomogeneousPoints};

/// Build the `Nx9` design matrix of the epipolar constraint `x2^T * F * x1 = 0`.
///
/// Row `i` is `[x2*x1, x2*y1, x2, y2*x1, y2*y1, y2, x1, y1, 1]` for the
/// de-homogenized points, so that `A * vec(F) = 0` with `F` in row-major order.
/// Points at infinity keep their `w = 0` in place of the unit entries.
///
/// PRECONDITION: `x1` and `x2` hold the same number of points.
///
/// # Arguments
///
/// * `x1` - Points in the left image.
/// * `x2` - Corresponding points in the right image.
pub fn constraint_matrix(x1: &HomogeneousPoints, x2: &HomogeneousPoints) -> Mat<f64> {
    debug_assert_eq!(x1.len(), x2.len());

    let n = x1.len();
    let mut a = Mat::<f64>::zeros(n, 9);
    for (i, (p1, p2)) in x1.iter().zip(x2.iter()).enumerate() {
        let [x, y, w] = dehomogenize(p1);
        let [xp, yp, wp] = dehomogenize(p2);
        a.write(i, 0, xp * x);
        a.write(i, 1, xp * y);
        a.write(i, 2, xp * w);
        a.write(i, 3, yp * x);
        a.write(i, 4, yp * y);
        a.write(i, 5, yp * w);
        a.write(i, 6, wp * x);
        a.write(i, 7, wp * y);
        a.write(i, 8, wp * w);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_row_layout() {
        let x1 = HomogeneousPoints::from_euclidean(&[[2.0, 3.0]]);
        let x2 = HomogeneousPoints::from_homogeneous(&[[10.0, 14.0, 2.0]]);
        let a = constraint_matrix(&x1, &x2);

        assert_eq!(a.nrows(), 1);
        assert_eq!(a.ncols(), 9);
        let row = (0..9).map(|j| a.read(0, j)).collect::<Vec<_>>();
        assert_eq!(row, vec![10.0, 15.0, 5.0, 14.0, 21.0, 7.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_constraint_annihilates_true_fundamental() {
        // F = [t]_x for a pure translation t = (1, 0, 0): x2^T F x1 = y1 - y2 for w = 1
        let f = [0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0];
        let x1 = HomogeneousPoints::from_euclidean(&[[1.0, 2.0], [4.0, -1.0], [0.5, 7.0]]);
        let x2 = HomogeneousPoints::from_euclidean(&[[3.0, 2.0], [-2.0, -1.0], [9.0, 7.0]]);
        let a = constraint_matrix(&x1, &x2);

        for i in 0..a.nrows() {
            let r = (0..9).map(|j| a.read(i, j) * f[j]).sum::<f64>();
            assert_eq!(r, 0.0);
        }
    }
}
