use faer::{Mat, MatRef};

use crate::error::EpipolarError;

/// Minimum number of correspondences required by the 8-point algorithm.
pub const MIN_CORRESPONDENCES: usize = 8;

/// Coordinate layout of the points stored in an input array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointLayout {
    /// Guess the layout from the smaller array dimension.
    ///
    /// 2 (or 4 when combined) selects [`PointLayout::Euclidean`], 3 (or 6 when
    /// combined) selects [`PointLayout::Homogeneous`].
    #[default]
    Infer,
    /// Pixel coordinates `(x, y)`.
    Euclidean,
    /// Homogeneous coordinates `(x, y, w)`.
    Homogeneous,
}

impl PointLayout {
    fn coords(self) -> Option<usize> {
        match self {
            PointLayout::Infer => None,
            PointLayout::Euclidean => Some(2),
            PointLayout::Homogeneous => Some(3),
        }
    }

    fn from_coords(coords: usize) -> Option<Self> {
        match coords {
            2 => Some(PointLayout::Euclidean),
            3 => Some(PointLayout::Homogeneous),
            _ => None,
        }
    }
}

/// Borrowed point arrays in one of the accepted forms.
///
/// Arrays may store one point per column (`2xN`, `3xN`, `4xN`, `6xN`) or one
/// point per row (`Nx2`, `Nx3`, `Nx4`, `Nx6`).
#[derive(Debug, Clone, Copy)]
pub enum PointInput<'a> {
    /// Separate left and right arrays of identical shape.
    Pair(MatRef<'a, f64>, MatRef<'a, f64>),
    /// A single array holding the left coordinates followed by the right ones.
    Combined(MatRef<'a, f64>),
}

/// A set of points stored as a `3xN` homogeneous matrix.
#[derive(Debug, Clone)]
pub struct HomogeneousPoints {
    data: Mat<f64>,
}

impl HomogeneousPoints {
    /// Build a point set from pixel coordinates, appending `w = 1`.
    pub fn from_euclidean(points: &[[f64; 2]]) -> Self {
        let data = Mat::<f64>::from_fn(3, points.len(), |i, j| match i {
            2 => 1.0,
            _ => points[j][i],
        });
        Self { data }
    }

    /// Build a point set from homogeneous coordinates.
    pub fn from_homogeneous(points: &[[f64; 3]]) -> Self {
        let data = Mat::<f64>::from_fn(3, points.len(), |i, j| points[j][i]);
        Self { data }
    }

    pub(crate) fn from_mat(data: Mat<f64>) -> Self {
        debug_assert_eq!(data.nrows(), 3);
        Self { data }
    }

    /// Number of points in the set.
    pub fn len(&self) -> usize {
        self.data.ncols()
    }

    /// Whether the set holds no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The i-th point as `[x, y, w]`.
    pub fn point(&self, i: usize) -> [f64; 3] {
        [
            self.data.read(0, i),
            self.data.read(1, i),
            self.data.read(2, i),
        ]
    }

    /// Iterate over the points as `[x, y, w]`.
    pub fn iter(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        (0..self.len()).map(|i| self.point(i))
    }

    /// View of the underlying `3xN` matrix.
    pub fn as_mat(&self) -> MatRef<'_, f64> {
        self.data.as_ref()
    }
}

/// Scale a homogeneous point to `w = 1`.
///
/// Points at infinity (`|w|` below machine epsilon) are returned unchanged.
pub fn dehomogenize(p: [f64; 3]) -> [f64; 3] {
    if p[2].abs() > f64::EPSILON {
        [p[0] / p[2], p[1] / p[2], 1.0]
    } else {
        p
    }
}

/// Left and right point sets where index `i` is the same scene point in both views.
#[derive(Debug, Clone)]
pub struct Correspondences {
    left: HomogeneousPoints,
    right: HomogeneousPoints,
}

impl Correspondences {
    /// Pair two homogeneous point sets.
    ///
    /// Fails with [`EpipolarError::ShapeMismatch`] if the cardinalities differ and with
    /// [`EpipolarError::InsufficientPoints`] if fewer than eight points are given.
    pub fn new(left: HomogeneousPoints, right: HomogeneousPoints) -> Result<Self, EpipolarError> {
        if left.len() != right.len() {
            return Err(EpipolarError::ShapeMismatch {
                left: (3, left.len()),
                right: (3, right.len()),
            });
        }
        check_point_count(left.len())?;
        Ok(Self { left, right })
    }

    /// Pair two lists of pixel coordinates.
    pub fn from_points(x1: &[[f64; 2]], x2: &[[f64; 2]]) -> Result<Self, EpipolarError> {
        if x1.len() != x2.len() {
            return Err(EpipolarError::ShapeMismatch {
                left: (x1.len(), 2),
                right: (x2.len(), 2),
            });
        }
        Self::new(
            HomogeneousPoints::from_euclidean(x1),
            HomogeneousPoints::from_euclidean(x2),
        )
    }

    /// Canonicalize borrowed point arrays into two `3xN` homogeneous sets.
    ///
    /// The input arrays are never modified; the result owns fresh copies.
    ///
    /// # Arguments
    ///
    /// * `input` - The two-array or combined-array form of the correspondences.
    /// * `layout` - The coordinate layout, or [`PointLayout::Infer`] to derive it from the shape.
    pub fn from_input(input: PointInput<'_>, layout: PointLayout) -> Result<Self, EpipolarError> {
        match input {
            PointInput::Pair(x1, x2) => {
                let shape = (x1.nrows(), x1.ncols());
                if shape != (x2.nrows(), x2.ncols()) {
                    return Err(EpipolarError::ShapeMismatch {
                        left: shape,
                        right: (x2.nrows(), x2.ncols()),
                    });
                }
                let (n, d) = point_count_and_width(shape)?;
                let layout = resolve_layout(layout, d, shape, PAIR_SHAPES)?;
                let by_columns = shape.0 == d;
                log::debug!(
                    "pair input {shape:?}: {n} points, {layout:?}, by_columns={by_columns}"
                );

                Ok(Self {
                    left: canonicalize(x1, 0, layout, by_columns, n),
                    right: canonicalize(x2, 0, layout, by_columns, n),
                })
            }
            PointInput::Combined(x) => {
                let shape = (x.nrows(), x.ncols());
                let (n, d) = point_count_and_width(shape)?;
                if d % 2 != 0 {
                    return Err(EpipolarError::InvalidDimensionality {
                        shape,
                        expected: COMBINED_SHAPES,
                    });
                }
                let layout = resolve_layout(layout, d / 2, shape, COMBINED_SHAPES)?;
                let by_columns = shape.0 == d;
                log::debug!(
                    "combined input {shape:?}: {n} points, {layout:?}, by_columns={by_columns}"
                );

                Ok(Self {
                    left: canonicalize(x, 0, layout, by_columns, n),
                    right: canonicalize(x, d / 2, layout, by_columns, n),
                })
            }
        }
    }

    /// The points observed in the left view.
    pub fn left(&self) -> &HomogeneousPoints {
        &self.left
    }

    /// The points observed in the right view.
    pub fn right(&self) -> &HomogeneousPoints {
        &self.right
    }

    /// Number of correspondences.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether there are no correspondences.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Iterate over `(left, right)` point pairs.
    pub fn iter(&self) -> impl Iterator<Item = ([f64; 3], [f64; 3])> + '_ {
        self.left.iter().zip(self.right.iter())
    }
}

const PAIR_SHAPES: &str = "x1 and x2 must be 2xN or Nx2 or 3xN or Nx3";
const COMBINED_SHAPES: &str = "single argument x must be 4xN or Nx4 or 6xN or Nx6";

fn check_point_count(n: usize) -> Result<(), EpipolarError> {
    if n < MIN_CORRESPONDENCES {
        return Err(EpipolarError::InsufficientPoints {
            required: MIN_CORRESPONDENCES,
            actual: n,
        });
    }
    Ok(())
}

// the larger dimension counts points, the smaller one coordinates
fn point_count_and_width(shape: (usize, usize)) -> Result<(usize, usize), EpipolarError> {
    let n = shape.0.max(shape.1);
    check_point_count(n)?;
    Ok((n, shape.0.min(shape.1)))
}

fn resolve_layout(
    layout: PointLayout,
    coords: usize,
    shape: (usize, usize),
    expected: &'static str,
) -> Result<PointLayout, EpipolarError> {
    let resolved = match layout.coords() {
        None => PointLayout::from_coords(coords),
        Some(c) if c == coords => Some(layout),
        Some(_) => None,
    };
    resolved.ok_or(EpipolarError::InvalidDimensionality { shape, expected })
}

fn canonicalize(
    x: MatRef<'_, f64>,
    offset: usize,
    layout: PointLayout,
    by_columns: bool,
    n: usize,
) -> HomogeneousPoints {
    let coords = layout.coords().unwrap_or(3);
    let read = |k: usize, j: usize| {
        if by_columns {
            x.read(offset + k, j)
        } else {
            x.read(j, offset + k)
        }
    };
    let data = Mat::<f64>::from_fn(3, n, |i, j| {
        if i < coords {
            read(i, j)
        } else {
            1.0
        }
    });
    HomogeneousPoints::from_mat(data)
}
