//! 3×3 rotation matrices.
//!
//! Storage is row-major: `m[(i, j)]` is row `i`, column `j`, and a vector
//! is transformed as `out = M · v` with `v` a column vector.
//!
//! Elementary rotations follow the passive (frame-rotating) convention and
//! always *pre-multiply*: `m.rotate_z(ψ)` returns `Rz(ψ) · m`. Building a
//! product `A · B · C` therefore starts from the identity and applies `C`
//! first.

use std::ops::{Index, Mul};

/// An immutable 3×3 rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    rows: [[f64; 3]; 3],
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationMatrix {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Matrix from row-major elements. Orthogonality is not checked.
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.rows
    }

    /// `Rx(phi) · self`.
    pub fn rotate_x(self, phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        let [r0, r1, r2] = self.rows;
        Self::from_rows([r0, combine(c, r1, s, r2), combine(-s, r1, c, r2)])
    }

    /// `Ry(theta) · self`.
    pub fn rotate_y(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        let [r0, r1, r2] = self.rows;
        Self::from_rows([combine(c, r0, -s, r2), r1, combine(s, r0, c, r2)])
    }

    /// `Rz(psi) · self`.
    pub fn rotate_z(self, psi: f64) -> Self {
        let (s, c) = psi.sin_cos();
        let [r0, r1, r2] = self.rows;
        Self::from_rows([combine(c, r0, s, r1), combine(-s, r0, c, r1), r2])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.rows;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// `self · v`.
    #[inline]
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.rows;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    /// Elements row by row: `[m00, m01, m02, m10, ...]`.
    pub fn to_row_major(&self) -> [f64; 9] {
        let m = &self.rows;
        [
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        ]
    }

    /// Elements column by column: `out[i + 3 * j] = m[(i, j)]`.
    pub fn to_column_major(&self) -> [f64; 9] {
        self.transpose().to_row_major()
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|v| v.is_finite())
    }

    /// Largest absolute element of `Mᵀ·M − I`.
    pub fn orthogonality_error(&self) -> f64 {
        let product = self.transpose() * *self;
        let mut worst = 0.0_f64;
        for (i, row) in product.rows.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((v - expected).abs());
            }
        }
        worst
    }
}

#[inline]
fn combine(a: f64, x: [f64; 3], b: f64, y: [f64; 3]) -> [f64; 3] {
    [
        a * x[0] + b * y[0],
        a * x[1] + b * y[1],
        a * x[2] + b * y[2],
    ]
}

impl Mul for RotationMatrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (&self.rows, &rhs.rows);
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Self::from_rows(out)
    }
}

impl Index<(usize, usize)> for RotationMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.rows[row][col]
    }
}

impl From<RotationMatrix> for [[f64; 3]; 3] {
    fn from(m: RotationMatrix) -> Self {
        m.rows
    }
}

impl std::fmt::Display for RotationMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:+.16e} {:+.16e} {:+.16e}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-15)
    }

    #[test]
    fn quarter_turn_about_z_is_passive() {
        let m = RotationMatrix::IDENTITY.rotate_z(FRAC_PI_2);
        assert!(close(m.apply([1.0, 0.0, 0.0]), [0.0, -1.0, 0.0]));
    }

    #[test]
    fn quarter_turns_about_x_and_y() {
        let mx = RotationMatrix::IDENTITY.rotate_x(FRAC_PI_2);
        assert!(close(mx.apply([0.0, 1.0, 0.0]), [0.0, 0.0, -1.0]));
        let my = RotationMatrix::IDENTITY.rotate_y(FRAC_PI_2);
        assert!(close(my.apply([0.0, 0.0, 1.0]), [-1.0, 0.0, 0.0]));
    }

    #[test]
    fn rotations_pre_multiply() {
        let a = RotationMatrix::IDENTITY.rotate_x(0.3);
        let b = RotationMatrix::IDENTITY.rotate_z(0.7);
        let chained = a.rotate_z(0.7);
        let product = b * a;
        for (r1, r2) in chained.rows().iter().zip(product.rows()) {
            assert!(close(*r1, *r2));
        }
    }

    #[test]
    fn transpose_inverts() {
        let m = RotationMatrix::IDENTITY
            .rotate_z(0.1)
            .rotate_y(-0.4)
            .rotate_x(1.2);
        assert!(m.orthogonality_error() < 1e-15);
        let p = m * m.transpose();
        assert!((p[(0, 0)] - 1.0).abs() < 1e-15);
        assert!(p[(0, 1)].abs() < 1e-15);
    }

    #[test]
    fn flattening_orders() {
        let m = RotationMatrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m.to_row_major(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let col = m.to_column_major();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(col[i + 3 * j], m[(i, j)]);
            }
        }
    }

    #[test]
    fn non_finite_detected() {
        let m = RotationMatrix::IDENTITY.rotate_x(f64::NAN);
        assert!(!m.is_finite());
        assert!(RotationMatrix::default().is_finite());
    }
}
