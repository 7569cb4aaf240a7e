#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia Epipolar
//!
//! Estimation of the fundamental matrix between two uncalibrated views with the
//! (optionally normalized) 8-point algorithm, plus the error metrics used to
//! validate the estimate.
//!
//! ## Example
//!
//! ```rust
//! use kornia_epipolar::{fundamental_from_points, FundamentalParams};
//!
//! let x1 = vec![
//!     [207.0, 13.0], [279.0, 130.0], [309.0, 268.0], [408.0, 438.0], [377.0, 243.0],
//!     [419.0, 272.0], [483.0, 144.0], [587.0, 128.0], [610.0, 185.0], [727.0, 63.0],
//! ];
//! let x2 = vec![
//!     [265.0, 1.0], [313.0, 91.0], [389.0, 198.0], [536.0, 281.0], [385.0, 182.0],
//!     [446.0, 199.0], [458.0, 96.0], [541.0, 82.0], [562.0, 127.0], [655.0, 35.0],
//! ];
//!
//! let f = fundamental_from_points(&x1, &x2, &FundamentalParams::default())?;
//! let s = f.singular_values();
//! assert!(s[2] <= 1e-9 * s[0]);
//! # Ok::<(), kornia_epipolar::EpipolarError>(())
//! ```

/// Error types for the epipolar pipeline.
pub mod error;
pub use error::EpipolarError;

/// Ground-truth evaluation of disparity maps.
pub mod disparity;

/// Estimation pipeline and the fundamental matrix type.
pub mod fundamental;
pub use fundamental::*;

/// Small 3x3 linear algebra helpers.
pub mod linalg;

/// Rendering geometry for epipolar lines.
pub mod lines;

/// Algebraic and symmetric epipolar error metrics.
pub mod metrics;

/// Isotropic normalization of homogeneous point sets.
pub mod normalize;

/// Canonicalization of point correspondence layouts.
pub mod points;

/// Linear constraint system of the 8-point algorithm.
pub mod constraint;

/// SVD based solver, rank-2 enforcement and denormalization.
pub mod solver;
