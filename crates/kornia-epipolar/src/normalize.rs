use faer::Mat;

use crate::error::EpipolarError;
use crate::points::HomogeneousPoints;

/// A 3x3 similarity transform `[[s, 0, -s*cx], [0, s, -s*cy], [0, 0, 1]]`.
pub type TransformMatrix = [[f64; 3]; 3];

/// Normalize a homogeneous point set with an isotropic similarity transform.
///
/// Finite points are moved so that their centroid lies at the origin and their
/// mean distance from it is `sqrt(2)`, which improves the conditioning of the
/// 8-point system (Hartley, PAMI 1997). Points at infinity are left out of the
/// centroid and scale computation but are still mapped by the transform.
///
/// # Arguments
///
/// * `points` - The point set to normalize. It is not modified.
///
/// # Returns
///
/// The normalized point set together with the transform that produced it.
///
/// # Errors
///
/// [`EpipolarError::DegenerateInput`] if there are no finite points or all of
/// them coincide.
pub fn normalize_points(
    points: &HomogeneousPoints,
) -> Result<(HomogeneousPoints, TransformMatrix), EpipolarError> {
    let finite = points
        .iter()
        .filter(|p| p[2].abs() > f64::EPSILON)
        .map(|p| [p[0] / p[2], p[1] / p[2]])
        .collect::<Vec<_>>();

    if finite.is_empty() {
        return Err(EpipolarError::DegenerateInput(
            "no finite points to compute the centroid",
        ));
    }

    let num_finite = finite.len() as f64;
    let (mut cx, mut cy) = (0.0, 0.0);
    for p in &finite {
        cx += p[0];
        cy += p[1];
    }
    cx /= num_finite;
    cy /= num_finite;

    let mean_dist = finite
        .iter()
        .map(|p| ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt())
        .sum::<f64>()
        / num_finite;

    if mean_dist <= f64::EPSILON {
        return Err(EpipolarError::DegenerateInput(
            "all finite points coincide, the scale is undefined",
        ));
    }

    let scale = std::f64::consts::SQRT_2 / mean_dist;
    log::debug!(
        "normalize: {} finite points, centroid ({cx}, {cy}), scale {scale}",
        finite.len()
    );

    let t = [
        [scale, 0.0, -scale * cx],
        [0.0, scale, -scale * cy],
        [0.0, 0.0, 1.0],
    ];

    // finite points are brought to w = 1 before applying the transform
    let data = Mat::<f64>::from_fn(3, points.len(), |i, j| {
        let p = points.point(j);
        let (x, y, w) = if p[2].abs() > f64::EPSILON {
            (p[0] / p[2], p[1] / p[2], 1.0)
        } else {
            (p[0], p[1], p[2])
        };
        t[i][0] * x + t[i][1] * y + t[i][2] * w
    });

    Ok((HomogeneousPoints::from_mat(data), t))
}
