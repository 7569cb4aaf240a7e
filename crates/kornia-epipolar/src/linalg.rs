/// Compute the dot product of two 3-vectors.
pub fn dot_product3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Multiply a 3x3 matrix with a 3-vector.
///
/// # Arguments
///
/// * `m` - The row-major 3x3 matrix.
/// * `v` - The 3-vector.
///
/// # Returns
///
/// The product `m * v`.
pub fn mat33_mul_vec3(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        dot_product3(&m[0], v),
        dot_product3(&m[1], v),
        dot_product3(&m[2], v),
    ]
}

/// Transpose a 3x3 matrix.
pub fn transpose_mat33(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut t = [[0.0; 3]; 3];
    for (i, row) in m.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            t[j][i] = *value;
        }
    }
    t
}

/// Multiply two 3x3 matrices.
///
/// # Arguments
///
/// * `a` - The left matrix.
/// * `b` - The right matrix.
/// * `m` - The output matrix `a * b`.
pub fn matmul33(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3], m: &mut [[f64; 3]; 3]) {
    let bt = transpose_mat33(b);
    for i in 0..3 {
        for j in 0..3 {
            m[i][j] = dot_product3(&a[i], &bt[j]);
        }
    }
}

/// Frobenius norm of a 3x3 matrix.
pub fn frobenius_norm33(m: &[[f64; 3]; 3]) -> f64 {
    m.iter().flatten().map(|v| v * v).sum::<f64>().sqrt()
}

/// Singular value decomposition of a 3x3 matrix `m = u * diag(s) * v^T`.
///
/// The singular values are sorted in non-increasing order.
#[derive(Debug, Clone)]
pub struct Svd33 {
    /// Left singular vectors as columns.
    pub u: [[f64; 3]; 3],
    /// Singular values.
    pub s: [f64; 3],
    /// Right singular vectors as columns.
    pub v: [[f64; 3]; 3],
}

impl Svd33 {
    /// Decompose a row-major 3x3 matrix.
    pub fn new(m: &[[f64; 3]; 3]) -> Self {
        let mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| m[i][j]);
        let svd = mat.svd();
        let (u, v, s) = (svd.u(), svd.v(), svd.s_diagonal());

        let mut out = Self {
            u: [[0.0; 3]; 3],
            s: [0.0; 3],
            v: [[0.0; 3]; 3],
        };
        for i in 0..3 {
            out.s[i] = s.read(i);
            for j in 0..3 {
                out.u[i][j] = u.read(i, j);
                out.v[i][j] = v.read(i, j);
            }
        }
        out
    }

    /// Rebuild `u * diag(s) * v^T` with the given singular values.
    pub fn compose(&self, s: &[f64; 3]) -> [[f64; 3]; 3] {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.u[i][k] * s[k] * self.v[j][k]).sum();
            }
        }
        m
    }
}
